//! Argument types and parsed values.
//!
//! An [`ArgumentType`] knows how to decode one argument from the reader.
//! Built-in types cover bools, bounded 32/64-bit integers and floats, and the
//! three string forms. User-defined types implement the same trait and stash
//! their result in [`ArgValue::Other`].

use std::any::Any;
use std::rc::Rc;

use crate::errors::{EdictError, ErrorKind};
use crate::reader::StringReader;
use crate::suggest::SuggestionsBuilder;

// ============================================================================
// PARSED VALUES
// ============================================================================

/// A parsed argument value.
///
/// The engine keeps values as a tagged sum so command contexts stay
/// homogeneous; typed accessors on the context downcast and fall back to the
/// type's zero value when absent or mismatched.
#[derive(Clone)]
pub enum ArgValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    /// Carrier for user-defined argument types.
    Other(Rc<dyn Any>),
}

impl ArgValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ArgValue::Bool(_) => "bool",
            ArgValue::Int32(_) => "int32",
            ArgValue::Int64(_) => "int64",
            ArgValue::Float32(_) => "float32",
            ArgValue::Float64(_) => "float64",
            ArgValue::String(_) => "string",
            ArgValue::Other(_) => "other",
        }
    }
}

impl std::fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgValue::Bool(v) => write!(f, "Bool({v})"),
            ArgValue::Int32(v) => write!(f, "Int32({v})"),
            ArgValue::Int64(v) => write!(f, "Int64({v})"),
            ArgValue::Float32(v) => write!(f, "Float32({v})"),
            ArgValue::Float64(v) => write!(f, "Float64({v})"),
            ArgValue::String(v) => write!(f, "String({v:?})"),
            ArgValue::Other(_) => write!(f, "Other(..)"),
        }
    }
}

// ============================================================================
// ARGUMENT TYPE CONTRACT
// ============================================================================

/// A parsable argument type.
pub trait ArgumentType {
    /// Decodes one value from the reader, advancing its cursor on success.
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError>;

    /// The name of the type, for display purposes.
    fn name(&self) -> &str;

    /// Adds completion proposals for this type. Default: none.
    fn suggest(&self, _builder: &mut SuggestionsBuilder) {}
}

// ============================================================================
// BUILT-IN TYPES
// ============================================================================

/// `true` / `false`, case-insensitive.
pub struct BoolArgument;

impl ArgumentType for BoolArgument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        Ok(ArgValue::Bool(reader.read_bool()?))
    }

    fn name(&self) -> &str {
        "bool"
    }

    fn suggest(&self, builder: &mut SuggestionsBuilder) {
        if "true".starts_with(builder.remaining_lowercase()) {
            builder.suggest("true");
        } else if "false".starts_with(builder.remaining_lowercase()) {
            builder.suggest("false");
        }
    }
}

/// A 32-bit integer within inclusive bounds.
pub struct Int32Argument {
    pub min: i32,
    pub max: i32,
}

impl Default for Int32Argument {
    fn default() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }
}

impl ArgumentType for Int32Argument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        let start = reader.cursor();
        let value = reader.read_i32()?;
        if value < self.min {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::IntegerTooLow {
                    value: value.into(),
                    min: self.min.into(),
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        if value > self.max {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::IntegerTooHigh {
                    value: value.into(),
                    max: self.max.into(),
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        Ok(ArgValue::Int32(value))
    }

    fn name(&self) -> &str {
        "int32"
    }
}

/// A 64-bit integer within inclusive bounds.
pub struct Int64Argument {
    pub min: i64,
    pub max: i64,
}

impl Default for Int64Argument {
    fn default() -> Self {
        Self {
            min: i64::MIN,
            max: i64::MAX,
        }
    }
}

impl ArgumentType for Int64Argument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        let start = reader.cursor();
        let value = reader.read_i64()?;
        if value < self.min {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::IntegerTooLow {
                    value,
                    min: self.min,
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        if value > self.max {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::IntegerTooHigh {
                    value,
                    max: self.max,
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        Ok(ArgValue::Int64(value))
    }

    fn name(&self) -> &str {
        "int64"
    }
}

/// A 32-bit float within inclusive bounds.
pub struct Float32Argument {
    pub min: f32,
    pub max: f32,
}

impl Default for Float32Argument {
    fn default() -> Self {
        Self {
            min: f32::MIN,
            max: f32::MAX,
        }
    }
}

impl ArgumentType for Float32Argument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        let start = reader.cursor();
        let value = reader.read_f32()?;
        if value < self.min {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::FloatTooLow {
                    value: value.into(),
                    min: self.min.into(),
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        if value > self.max {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::FloatTooHigh {
                    value: value.into(),
                    max: self.max.into(),
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        Ok(ArgValue::Float32(value))
    }

    fn name(&self) -> &str {
        "float32"
    }
}

/// A 64-bit float within inclusive bounds.
pub struct Float64Argument {
    pub min: f64,
    pub max: f64,
}

impl Default for Float64Argument {
    fn default() -> Self {
        Self {
            min: f64::MIN,
            max: f64::MAX,
        }
    }
}

impl ArgumentType for Float64Argument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        let start = reader.cursor();
        let value = reader.read_f64()?;
        if value < self.min {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::FloatTooLow {
                    value,
                    min: self.min,
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        if value > self.max {
            reader.set_cursor(start);
            return Err(EdictError::new(
                ErrorKind::FloatTooHigh {
                    value,
                    max: self.max,
                },
                reader.string().to_string(),
                reader.cursor(),
            ));
        }
        Ok(ArgValue::Float64(value))
    }

    fn name(&self) -> &str {
        "float64"
    }
}

/// How a string argument consumes input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    /// A single unquoted word.
    SingleWord,
    /// A word, or a quoted phrase with escapes.
    QuotablePhrase,
    /// The entire remaining input.
    Greedy,
}

/// A string argument in one of the three forms.
pub struct StringArgument(pub StringKind);

impl ArgumentType for StringArgument {
    fn parse(&self, reader: &mut StringReader) -> Result<ArgValue, EdictError> {
        let text = match self.0 {
            StringKind::Greedy => {
                let text = reader.remaining().to_string();
                reader.set_cursor(reader.total_len());
                text
            }
            StringKind::SingleWord => reader.read_unquoted_string().to_string(),
            StringKind::QuotablePhrase => reader.read_string()?,
        };
        Ok(ArgValue::String(text))
    }

    fn name(&self) -> &str {
        "string"
    }
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// A bool argument type.
pub fn boolean() -> Rc<dyn ArgumentType> {
    Rc::new(BoolArgument)
}

/// An i32 argument type over the full range.
pub fn integer() -> Rc<dyn ArgumentType> {
    Rc::new(Int32Argument::default())
}

/// An i32 argument type within `[min, max]`.
pub fn integer_in(min: i32, max: i32) -> Rc<dyn ArgumentType> {
    Rc::new(Int32Argument { min, max })
}

/// An i64 argument type over the full range.
pub fn long() -> Rc<dyn ArgumentType> {
    Rc::new(Int64Argument::default())
}

/// An i64 argument type within `[min, max]`.
pub fn long_in(min: i64, max: i64) -> Rc<dyn ArgumentType> {
    Rc::new(Int64Argument { min, max })
}

/// An f32 argument type over the full range.
pub fn float() -> Rc<dyn ArgumentType> {
    Rc::new(Float32Argument::default())
}

/// An f32 argument type within `[min, max]`.
pub fn float_in(min: f32, max: f32) -> Rc<dyn ArgumentType> {
    Rc::new(Float32Argument { min, max })
}

/// An f64 argument type over the full range.
pub fn double() -> Rc<dyn ArgumentType> {
    Rc::new(Float64Argument::default())
}

/// An f64 argument type within `[min, max]`.
pub fn double_in(min: f64, max: f64) -> Rc<dyn ArgumentType> {
    Rc::new(Float64Argument { min, max })
}

/// A single-word string argument type.
pub fn word() -> Rc<dyn ArgumentType> {
    Rc::new(StringArgument(StringKind::SingleWord))
}

/// A quotable-phrase string argument type.
pub fn phrase() -> Rc<dyn ArgumentType> {
    Rc::new(StringArgument(StringKind::QuotablePhrase))
}

/// A greedy string argument type consuming the rest of the input.
pub fn greedy() -> Rc<dyn ArgumentType> {
    Rc::new(StringArgument(StringKind::Greedy))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(ty: &dyn ArgumentType, input: &str) -> Result<ArgValue, EdictError> {
        let mut reader = StringReader::new(input);
        ty.parse(&mut reader)
    }

    #[test]
    fn test_bool_parses() {
        assert!(matches!(
            parse_with(&BoolArgument, "true rest").unwrap(),
            ArgValue::Bool(true)
        ));
        assert!(matches!(
            parse_with(&BoolArgument, "False").unwrap(),
            ArgValue::Bool(false)
        ));
    }

    #[test]
    fn test_int32_bounds() {
        let ty = Int32Argument { min: 0, max: 100 };
        assert!(matches!(
            parse_with(&ty, "42").unwrap(),
            ArgValue::Int32(42)
        ));

        let err = parse_with(&ty, "-1").unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::IntegerTooLow { value: -1, min: 0 }
        );
        assert_eq!(err.cursor(), 0);

        let err = parse_with(&ty, "101").unwrap_err();
        assert_eq!(
            *err.kind(),
            ErrorKind::IntegerTooHigh {
                value: 101,
                max: 100
            }
        );
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_int64_full_range() {
        let ty = Int64Argument::default();
        assert!(matches!(
            parse_with(&ty, "9999999999").unwrap(),
            ArgValue::Int64(9999999999)
        ));
    }

    #[test]
    fn test_float64_bounds() {
        let ty = Float64Argument { min: 0.0, max: 1.0 };
        assert!(matches!(
            parse_with(&ty, "0.5").unwrap(),
            ArgValue::Float64(v) if v == 0.5
        ));

        let err = parse_with(&ty, "1.5").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::FloatTooHigh { .. }));
        assert_eq!(err.cursor(), 0);
    }

    #[test]
    fn test_string_kinds() {
        let mut reader = StringReader::new("hello world");
        StringArgument(StringKind::Greedy)
            .parse(&mut reader)
            .unwrap();
        assert!(!reader.can_read());

        let mut reader = StringReader::new("hello world");
        let value = StringArgument(StringKind::SingleWord)
            .parse(&mut reader)
            .unwrap();
        assert!(matches!(value, ArgValue::String(s) if s == "hello"));
        assert_eq!(reader.remaining(), " world");

        let mut reader = StringReader::new("\"hello world\" tail");
        let value = StringArgument(StringKind::QuotablePhrase)
            .parse(&mut reader)
            .unwrap();
        assert!(matches!(value, ArgValue::String(s) if s == "hello world"));
        assert_eq!(reader.remaining(), " tail");
    }

    #[test]
    fn test_bool_suggestions() {
        let mut builder = SuggestionsBuilder::new("t", 0);
        BoolArgument.suggest(&mut builder);
        let suggestions = builder.build();
        assert_eq!(suggestions.suggestions.len(), 1);
        assert_eq!(suggestions.suggestions[0].text, "true");
    }
}
