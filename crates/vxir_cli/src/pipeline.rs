//! Shared pipeline helpers for CLI commands: configuration lookup and the
//! read-and-build step.

use std::path::Path;

use vxir_builder::build_unit;
use vxir_config::{load_config, ParserConfig, CONFIG_FILE_NAME};
use vxir_ir::Unit;

use crate::GlobalArgs;

/// Loads the parser configuration.
///
/// Uses `--config` when given. Otherwise reads `vxir.toml` from the current
/// directory if it exists, and falls back to the defaults.
pub fn resolve_config(global: &GlobalArgs) -> Result<ParserConfig, Box<dyn std::error::Error>> {
    match global.config {
        Some(ref path) => Ok(load_config(Path::new(path))?),
        None => config_in_dir(&std::env::current_dir()?),
    }
}

fn config_in_dir(dir: &Path) -> Result<ParserConfig, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.is_file() {
        tracing::debug!(path = %path.display(), "using configuration file");
        Ok(load_config(&path)?)
    } else {
        Ok(ParserConfig::default())
    }
}

/// Reads `path` and builds its unit.
pub fn build_file(path: &Path, config: &ParserConfig) -> Result<Unit, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let unit = build_unit(&source, config)?;
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0" ?>
<verilator_xml>
  <netlist>
    <module name="top"/>
  </netlist>
</verilator_xml>
"#;

    #[test]
    fn defaults_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in_dir(dir.path()).unwrap();
        assert_eq!(config, ParserConfig::default());
    }

    #[test]
    fn config_file_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[parser]\nresolve_varrefs = true\n",
        )
        .unwrap();
        let config = config_in_dir(dir.path()).unwrap();
        assert!(config.parser.resolve_varrefs);
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[types.QData]\nleft = 63\n").unwrap();
        let global = GlobalArgs {
            quiet: false,
            verbose: false,
            config: Some(path.display().to_string()),
        };
        let config = resolve_config(&global).unwrap();
        assert!(config.types.contains_key("QData"));
    }

    #[test]
    fn build_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Vtop.xml");
        std::fs::write(&path, DOC).unwrap();
        let unit = build_file(&path, &ParserConfig::default()).unwrap();
        assert!(unit.module_named("top").is_some());
    }

    #[test]
    fn missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_file(&dir.path().join("nope.xml"), &ParserConfig::default()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }

    #[test]
    fn build_errors_propagate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.xml");
        std::fs::write(&path, "<?xml?><verilator_xml><bogus/></verilator_xml>").unwrap();
        let err = build_file(&path, &ParserConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "unknown tag <bogus>");
    }
}
