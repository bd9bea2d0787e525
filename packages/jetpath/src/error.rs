//! Error types for streaming JSONPath extraction.
//!
//! All errors are terminal for the session that raised them: once a decode
//! loop fails, the error is stored in the session's sticky slot and every
//! further operation short-circuits until the session is reset.

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

/// Result type for decode operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Error type a [`StreamHandler`](crate::StreamHandler) callback may return.
///
/// Callback errors halt the decode loop and surface through
/// [`StreamError::Callback`] unchanged.
pub type HandlerError = Box<dyn Error + Send + Sync>;

/// A JSON syntax violation, with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Human-readable description, e.g. `invalid character ']' after object key`.
    pub msg: String,
    /// Byte offset into the scanned stream.
    pub offset: u64,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.msg, self.offset)
    }
}

impl Error for SyntaxError {}

/// Terminal error raised by a decode session.
#[derive(Debug, Clone)]
pub enum StreamError {
    /// The input violated the JSON grammar.
    Syntax(SyntaxError),
    /// The underlying reader failed.
    Io(Arc<io::Error>),
    /// A handler callback returned an error; surfaced unchanged.
    Callback(Arc<dyn Error + Send + Sync>),
    /// The session's cancel token fired.
    Canceled,
    /// A selector failed to compile as a glob.
    Selector {
        /// Byte position of the offending token inside the selector.
        pos: usize,
        /// Description from the glob compiler.
        msg: String,
    },
}

impl StreamError {
    pub(crate) fn syntax(msg: impl Into<String>, offset: u64) -> Self {
        Self::Syntax(SyntaxError {
            msg: msg.into(),
            offset,
        })
    }

    pub(crate) fn io(err: io::Error) -> Self {
        Self::Io(Arc::new(err))
    }

    pub(crate) fn callback(err: HandlerError) -> Self {
        Self::Callback(Arc::from(err))
    }

    pub(crate) fn unexpected_eof() -> Self {
        Self::io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "unexpected end of JSON input",
        ))
    }

    /// True when this error was produced by cancellation rather than input.
    #[must_use]
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// True for grammar violations in the input stream.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax(_))
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "syntax error: {e}"),
            Self::Io(e) => write!(f, "read error: {e}"),
            Self::Callback(e) => write!(f, "handler error: {e}"),
            Self::Canceled => f.write_str("decode canceled"),
            Self::Selector { pos, msg } => {
                write!(f, "invalid selector at position {pos}: {msg}")
            }
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Syntax(e) => Some(e),
            Self::Io(e) => Some(e.as_ref()),
            Self::Callback(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        Self::io(err)
    }
}

impl From<glob::PatternError> for StreamError {
    fn from(err: glob::PatternError) -> Self {
        Self::Selector {
            pos: err.pos,
            msg: err.msg.to_string(),
        }
    }
}

/// Format a byte the way scanner diagnostics quote it, e.g. `'x'` or `'\n'`.
pub(crate) fn quote_char(c: u8) -> String {
    match c {
        b'\'' => r"'\''".to_string(),
        b'"' => "'\"'".to_string(),
        _ => {
            let escaped: String = (c as char).escape_default().collect();
            format!("'{escaped}'")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_display_includes_offset() {
        let err = StreamError::syntax("invalid character ',' after top-level value", 17);
        assert_eq!(
            err.to_string(),
            "syntax error: invalid character ',' after top-level value at offset 17"
        );
        assert!(err.is_syntax());
    }

    #[test]
    fn quoting_control_and_plain_bytes() {
        assert_eq!(quote_char(b'x'), "'x'");
        assert_eq!(quote_char(b'\n'), r"'\n'");
        assert_eq!(quote_char(b'"'), "'\"'");
    }

    #[test]
    fn io_errors_convert_and_expose_source() {
        let err: StreamError = io::Error::new(io::ErrorKind::Other, "boom").into();
        assert!(err.source().is_some());
        assert!(!err.is_canceled());
    }
}
