//! Error types for SVG loading.

use std::fmt;

/// Malformed number list, e.g. `"1..2"` or `"1,,2"`.
///
/// `partial` holds the numbers parsed before the offending character.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberSyntaxError {
    pub character: char,
    /// Character index into the input.
    pub index: usize,
    pub partial: Vec<f32>,
}

impl fmt::Display for NumberSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected character \"{}\" at index {}",
            self.character, self.index
        )
    }
}

impl std::error::Error for NumberSyntaxError {}

/// Errors that abort loading a document.
#[derive(Debug)]
pub enum SvgError {
    /// The file could not be read.
    Io(std::io::Error),
    /// The input is not well-formed XML.
    Xml(roxmltree::Error),
    /// A numeric list in path data or a transform could not be parsed.
    Syntax(NumberSyntaxError),
    /// The document element is not `<svg>`.
    NotSvg(String),
}

impl fmt::Display for SvgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SvgError::Io(e) => write!(f, "I/O error: {}", e),
            SvgError::Xml(e) => write!(f, "XML error: {}", e),
            SvgError::Syntax(e) => write!(f, "syntax error: {}", e),
            SvgError::NotSvg(name) => write!(f, "root element is <{}>, expected <svg>", name),
        }
    }
}

impl std::error::Error for SvgError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SvgError::Io(e) => Some(e),
            SvgError::Xml(e) => Some(e),
            SvgError::Syntax(e) => Some(e),
            SvgError::NotSvg(_) => None,
        }
    }
}

impl From<std::io::Error> for SvgError {
    fn from(err: std::io::Error) -> Self {
        SvgError::Io(err)
    }
}

impl From<roxmltree::Error> for SvgError {
    fn from(err: roxmltree::Error) -> Self {
        SvgError::Xml(err)
    }
}

impl From<NumberSyntaxError> for SvgError {
    fn from(err: NumberSyntaxError) -> Self {
        SvgError::Syntax(err)
    }
}

/// Result type for SVG loading.
pub type SvgResult<T> = Result<T, SvgError>;
