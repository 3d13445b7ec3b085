//! Unified error handling.
//!
//! Every failure in the engine — reader, literal matching, bounded argument
//! types, dispatch, suggestion lookup — is an [`EdictError`]: a kind plus the
//! command input and the cursor at the point of failure. The kind is the
//! machine-readable classification; the wrapper implements
//! [`miette::Diagnostic`] so CLI surfaces get a labeled span into the input.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};
use thiserror::Error;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// Classification of an engine failure, with the offending detail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    // Reader: quoted-string path
    #[error("expected start of quote")]
    ExpectedStartOfQuote,
    #[error("expected end of quote")]
    ExpectedEndOfQuote,
    #[error("invalid escape character {0:?}")]
    InvalidEscape(char),

    // Reader: number and bool paths
    #[error("expected integer")]
    ExpectedInt,
    #[error("invalid integer {0:?}")]
    InvalidInt(String),
    #[error("expected float")]
    ExpectedFloat,
    #[error("invalid float {0:?}")]
    InvalidFloat(String),
    #[error("expected bool")]
    ExpectedBool,
    #[error("invalid bool {0:?}")]
    InvalidBool(String),

    // Bounded argument types
    #[error("integer too low ({value} < {min})")]
    IntegerTooLow { value: i64, min: i64 },
    #[error("integer too high ({value} > {max})")]
    IntegerTooHigh { value: i64, max: i64 },
    #[error("float too low ({value} < {min})")]
    FloatTooLow { value: f64, min: f64 },
    #[error("float too high ({value} > {max})")]
    FloatTooHigh { value: f64, max: f64 },

    // Tree matching and dispatch
    #[error("incorrect literal {0:?}")]
    IncorrectLiteral(String),
    #[error("expected argument separator")]
    ExpectedArgumentSeparator,
    #[error("unknown command")]
    UnknownCommand,
    #[error("unknown argument")]
    UnknownArgument,

    // Suggestion context lookup
    #[error("cannot find node before cursor")]
    NoNodeBeforeCursor,

    // Command-supplied failures
    #[error("{0}")]
    Failure(String),
}

impl ErrorKind {
    /// Stable diagnostic code suffix for this kind.
    pub const fn code_name(&self) -> &'static str {
        match self {
            Self::ExpectedStartOfQuote => "expected_start_of_quote",
            Self::ExpectedEndOfQuote => "expected_end_of_quote",
            Self::InvalidEscape(_) => "invalid_escape",
            Self::ExpectedInt => "expected_int",
            Self::InvalidInt(_) => "invalid_int",
            Self::ExpectedFloat => "expected_float",
            Self::InvalidFloat(_) => "invalid_float",
            Self::ExpectedBool => "expected_bool",
            Self::InvalidBool(_) => "invalid_bool",
            Self::IntegerTooLow { .. } => "integer_too_low",
            Self::IntegerTooHigh { .. } => "integer_too_high",
            Self::FloatTooLow { .. } => "float_too_low",
            Self::FloatTooHigh { .. } => "float_too_high",
            Self::IncorrectLiteral(_) => "incorrect_literal",
            Self::ExpectedArgumentSeparator => "expected_argument_separator",
            Self::UnknownCommand => "unknown_command",
            Self::UnknownArgument => "unknown_argument",
            Self::NoNodeBeforeCursor => "no_node_before_cursor",
            Self::Failure(_) => "failure",
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// An engine failure: what went wrong, in which input, and where.
#[derive(Debug, Clone)]
pub struct EdictError {
    kind: ErrorKind,
    input: String,
    cursor: usize,
}

impl EdictError {
    pub fn new(kind: ErrorKind, input: String, cursor: usize) -> Self {
        Self {
            kind,
            input,
            cursor,
        }
    }

    /// A command-supplied failure with no input position.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Failure(message.into()),
            input: String::new(),
            cursor: 0,
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The command input the failure occurred in. Empty for failures raised
    /// outside of parsing (e.g. command bodies).
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Byte offset of the failure within [`Self::input`].
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The input consumed up to the failure point.
    pub fn context(&self) -> &str {
        &self.input[..self.cursor.min(self.input.len())]
    }
}

impl fmt::Display for EdictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.input.is_empty() {
            write!(f, " at position {}", self.cursor)?;
        }
        Ok(())
    }
}

impl std::error::Error for EdictError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl Diagnostic for EdictError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("edict::{}", self.kind.code_name())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.kind {
            ErrorKind::UnknownCommand => {
                Some(Box::new("no registered command matches this input"))
            }
            ErrorKind::ExpectedArgumentSeparator => {
                Some(Box::new("arguments are separated by a single space"))
            }
            _ => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        if self.input.is_empty() {
            return None;
        }
        let len = if self.cursor < self.input.len() { 1 } else { 0 };
        let label = LabeledSpan::new(Some("here".to_string()), self.cursor, len);
        Some(Box::new(std::iter::once(label)))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        if self.input.is_empty() {
            None
        } else {
            Some(&self.input)
        }
    }
}

/// Prints an error as a full miette report on stderr.
pub fn print_error(error: EdictError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
