use std::fmt::Display;

use crate::KdlError;

const NUMERIC_ANNOTATIONS: [&str; 10] = [
    "i8", "i16", "i32", "i64", "u8", "u16", "u32", "u64", "f32", "f64",
];

/// A KDL value: the payload of an argument or property.
///
/// Numbers are stored at the width their type annotation selects a family
/// for: signed integers in an `i64`, unsigned integers in a `u64`, floats in
/// an `f64`. Narrower annotations (`i8`, `u16`, `f32`, …) are range-checked
/// during parsing; a literal that does not fit rejects the whole document.
#[derive(Debug, Clone, PartialEq)]
pub enum KdlValue {
    /// A signed integer. The default for unannotated integer literals.
    Integer(i64),
    /// An unsigned integer, produced by `u8`/`u16`/`u32`/`u64` annotations.
    UnsignedInteger(u64),
    /// A 64-bit float. The default for unannotated float literals.
    Float(f64),
    /// A string, from a quoted or raw literal.
    String(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`. Never combined with a type annotation.
    Null,
}

impl KdlValue {
    /// Returns `true` if the value is a [`KdlValue::Integer`].
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(..))
    }

    /// Returns `true` if the value is a [`KdlValue::UnsignedInteger`].
    pub fn is_unsigned_integer(&self) -> bool {
        matches!(self, Self::UnsignedInteger(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Float`].
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(..))
    }

    /// Returns `true` if the value is a [`KdlValue::String`].
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Bool`].
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is a [`KdlValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns `Some(i64)` if the value is a [`KdlValue::Integer`].
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `Some(u64)` if the value is a [`KdlValue::UnsignedInteger`].
    pub fn as_unsigned_integer(&self) -> Option<u64> {
        match self {
            Self::UnsignedInteger(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `Some(f64)` if the value is a [`KdlValue::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns `Some(&str)` if the value is a [`KdlValue::String`].
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `Some(bool)` if the value is a [`KdlValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl KdlValue {
    /// Coerces a canonical integer literal under an optional type
    /// annotation, range-checking against the annotated width.
    pub(crate) fn integer(literal: &str, ty: Option<&str>) -> Result<Self, KdlError> {
        match ty {
            None | Some("i64") => Ok(Self::Integer(literal.parse()?)),
            Some("i8") => Ok(Self::Integer(i64::from(literal.parse::<i8>()?))),
            Some("i16") => Ok(Self::Integer(i64::from(literal.parse::<i16>()?))),
            Some("i32") => Ok(Self::Integer(i64::from(literal.parse::<i32>()?))),
            Some(ty @ ("u8" | "u16" | "u32" | "u64")) => {
                if literal.starts_with('-') {
                    return Err(KdlError::NegativeUnsignedError);
                }
                let value = match ty {
                    "u8" => u64::from(literal.parse::<u8>()?),
                    "u16" => u64::from(literal.parse::<u16>()?),
                    "u32" => u64::from(literal.parse::<u32>()?),
                    _ => literal.parse::<u64>()?,
                };
                Ok(Self::UnsignedInteger(value))
            }
            Some(other) => Err(KdlError::InvalidIntegerAnnotation(other.into())),
        }
    }

    /// Coerces a float literal under an optional type annotation.
    pub(crate) fn float(literal: &str, ty: Option<&str>) -> Result<Self, KdlError> {
        match ty {
            None | Some("f64") => Ok(Self::Float(literal.parse()?)),
            Some("f32") => Ok(Self::Float(f64::from(literal.parse::<f32>()?))),
            Some(other) => Err(KdlError::InvalidFloatAnnotation(other.into())),
        }
    }

    /// Wraps a string value, rejecting numeric annotations. Free-form
    /// annotations are carried through by the caller.
    pub(crate) fn string(value: String, ty: Option<&str>) -> Result<Self, KdlError> {
        if let Some(ty) = ty {
            if NUMERIC_ANNOTATIONS.contains(&ty) {
                return Err(KdlError::InvalidStringAnnotation(ty.into()));
            }
        }
        Ok(Self::String(value))
    }
}

impl Display for KdlValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::UnsignedInteger(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", float_repr(*value)),
            Self::String(_) => self.write_string(f),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Null => write!(f, "null"),
        }
    }
}

impl KdlValue {
    fn write_string(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(string) = self.as_string() else {
            return Ok(());
        };
        write!(f, "\"")?;
        for char in string.chars() {
            match char {
                '\\' | '"' => write!(f, "\\{}", char)?,
                '\n' => write!(f, "\\n")?,
                '\r' => write!(f, "\\r")?,
                '\t' => write!(f, "\\t")?,
                '\u{08}' => write!(f, "\\b")?,
                '\u{0C}' => write!(f, "\\f")?,
                _ => write!(f, "{}", char)?,
            }
        }
        write!(f, "\"")
    }
}

/// Renders a float so that it scans as a float again: the literal always
/// contains a decimal point, including in exponent form.
fn float_repr(value: f64) -> String {
    let repr = format!("{:?}", value);
    if let Some(pos) = repr.find('e') {
        if !repr[..pos].contains('.') {
            return format!("{}.0{}", &repr[..pos], &repr[pos..]);
        }
    }
    repr
}

impl From<i64> for KdlValue {
    fn from(value: i64) -> Self {
        KdlValue::Integer(value)
    }
}

impl From<u64> for KdlValue {
    fn from(value: u64) -> Self {
        KdlValue::UnsignedInteger(value)
    }
}

impl From<f64> for KdlValue {
    fn from(value: f64) -> Self {
        KdlValue::Float(value)
    }
}

impl From<&str> for KdlValue {
    fn from(value: &str) -> Self {
        KdlValue::String(value.to_string())
    }
}

impl From<String> for KdlValue {
    fn from(value: String) -> Self {
        KdlValue::String(value)
    }
}

impl From<bool> for KdlValue {
    fn from(value: bool) -> Self {
        KdlValue::Bool(value)
    }
}

impl<T> From<Option<T>> for KdlValue
where
    T: Into<KdlValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => value.into(),
            None => KdlValue::Null,
        }
    }
}
