//! Structural errors raised while reading a document.

/// A structural failure in the document. Every variant is fatal to the read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// A close tag does not match the innermost open tag.
    #[error("mismatch close tag: expected </{open}>, found </{close}> on line {line}")]
    MismatchedClose {
        /// The tag that is currently open.
        open: String,
        /// The name in the close tag.
        close: String,
        /// 1-based line of the close tag.
        line: usize,
    },

    /// A close tag appeared with no element left to close.
    #[error("unexpected close tag </{tag}> on line {line}")]
    UnexpectedClose {
        /// The name in the close tag.
        tag: String,
        /// 1-based line of the close tag.
        line: usize,
    },

    /// The document ended while elements were still open.
    #[error("tag not closed: {}", open.join(", "))]
    Unclosed {
        /// The still-open tags, outermost first, excluding the root.
        open: Vec<String>,
    },

    /// The document contains no elements at all.
    #[error("empty document")]
    Empty,

    /// The root element is not the `<?xml ...?>` declaration.
    #[error("?xml needs to be first element, found <{found}>")]
    MissingDeclaration {
        /// The tag found at the root.
        found: String,
    },

    /// Markup that cannot be tokenized.
    #[error("malformed document on line {line}: {message}")]
    Malformed {
        /// What was wrong.
        message: String,
        /// 1-based line where the problem starts.
        line: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_names_both_tags() {
        let err = TreeError::MismatchedClose {
            open: "module".to_string(),
            close: "var".to_string(),
            line: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("</module>"));
        assert!(msg.contains("</var>"));
        assert!(msg.contains("line 4"));
    }

    #[test]
    fn unclosed_lists_tags() {
        let err = TreeError::Unclosed {
            open: vec!["verilator_xml".to_string(), "netlist".to_string()],
        };
        assert_eq!(err.to_string(), "tag not closed: verilator_xml, netlist");
    }
}
