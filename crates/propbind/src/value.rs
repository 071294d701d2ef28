// crates/propbind/src/value.rs
// ============================================================================
// Module: Value Types and Coercion
// Description: Declared value types, typed field values, and string coercion.
// Purpose: Convert raw property strings into semantic field values.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Every bindable field declares a [`ValueType`]. Raw strings are converted
//! with [`PropertyValue::coerce`]; the resulting typed value is reported back
//! to the engine as a type-neutral [`FieldValue`] for comparison, rendering,
//! and documentation.
//!
//! Coercion rules:
//! - boolean: case-insensitive `true`/`false`.
//! - enum: case-insensitive match against declared member names.
//! - optional string: presence (including the empty string) yields a value.
//! - string list: split on [`LIST_DELIMITER`], elements trimmed, empty input
//!   yields an empty list.
//! - integer: decimal, range-checked against the target type.
//!
//! Coercion errors describe the expected shape and never echo the input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Delimiter used to split list-valued properties.
pub const LIST_DELIMITER: char = ',';

// ============================================================================
// SECTION: Value Model
// ============================================================================

/// Declared value type of a bindable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Plain string.
    String,
    /// Boolean flag.
    Boolean,
    /// Enumeration with a fixed member set.
    Enum {
        /// Rust type name used in diagnostics and docs.
        type_name: &'static str,
        /// Canonical member names.
        members: Vec<&'static str>,
    },
    /// String that may be absent.
    OptionalString,
    /// Delimited list of strings.
    StringList,
    /// Signed integer with inclusive bounds.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
}

impl ValueType {
    /// Returns a short label used in docs and diagnostics.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::Enum {
                type_name, ..
            } => format!("enum({type_name})"),
            Self::OptionalString => "optional<string>".to_string(),
            Self::StringList => "list<string>".to_string(),
            Self::Integer {
                ..
            } => "integer".to_string(),
        }
    }
}

/// Type-neutral value of a bound field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Plain string value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Canonical enum member name.
    Enum(&'static str),
    /// Optional string value.
    OptionalString(Option<String>),
    /// List of strings.
    StringList(Vec<String>),
    /// Integer value.
    Integer(i64),
}

impl FieldValue {
    /// Returns true when the value is representable as the given type.
    #[must_use]
    pub fn conforms_to(&self, value_type: &ValueType) -> bool {
        match (self, value_type) {
            (Self::String(_), ValueType::String)
            | (Self::Boolean(_), ValueType::Boolean)
            | (Self::OptionalString(_), ValueType::OptionalString)
            | (Self::StringList(_), ValueType::StringList) => true,
            (
                Self::Enum(name),
                ValueType::Enum {
                    members, ..
                },
            ) => members.contains(name),
            (
                Self::Integer(value),
                ValueType::Integer {
                    min,
                    max,
                },
            ) => (*min ..= *max).contains(value),
            _ => false,
        }
    }

    /// Returns true for an optional value that is absent.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::OptionalString(None))
    }

    /// Renders the value as the property string that would bind back to it.
    ///
    /// Returns `None` for an unset optional value.
    #[must_use]
    pub fn to_property_string(&self) -> Option<String> {
        match self {
            Self::String(value) => Some(value.clone()),
            Self::Boolean(value) => Some(value.to_string()),
            Self::Enum(name) => Some((*name).to_string()),
            Self::OptionalString(value) => value.clone(),
            Self::StringList(values) => Some(values.join(&LIST_DELIMITER.to_string())),
            Self::Integer(value) => Some(value.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Raw string could not be converted to the declared type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    /// Boolean input was not `true` or `false`.
    #[error("expected `true` or `false`")]
    InvalidBoolean,
    /// Enum input matched no declared member.
    #[error("expected one of [{}] for {type_name}", .valid.join(", "))]
    InvalidEnum {
        /// Rust type name of the enum.
        type_name: &'static str,
        /// Accepted member names.
        valid: Vec<&'static str>,
    },
    /// Integer input was not a decimal integer.
    #[error("expected an integer")]
    InvalidInteger,
    /// Integer input was outside the accepted range.
    #[error("expected an integer between {min} and {max}")]
    OutOfRange {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
}

// ============================================================================
// SECTION: Traits
// ============================================================================

/// A Rust type that can be bound from a property string.
pub trait PropertyValue: Sized + Send + Sync + 'static {
    /// Declared value type of this Rust type.
    fn value_type() -> ValueType;

    /// Converts a raw property string into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] when the input is not representable.
    fn coerce(raw: &str) -> Result<Self, CoercionError>;

    /// Converts the typed value into its type-neutral form.
    fn to_field_value(&self) -> FieldValue;
}

/// A fieldless enum that binds by case-insensitive member name.
pub trait ConfigEnum: Copy + Send + Sync + 'static {
    /// Type name used in diagnostics and docs.
    const TYPE_NAME: &'static str;
    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// Canonical member name.
    fn name(self) -> &'static str;
}

/// Returns the canonical member names of a config enum.
pub(crate) fn enum_member_names<E: ConfigEnum>() -> Vec<&'static str> {
    E::MEMBERS.iter().map(|member| member.name()).collect()
}

// ============================================================================
// SECTION: Implementations
// ============================================================================

impl PropertyValue for String {
    fn value_type() -> ValueType {
        ValueType::String
    }

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        Ok(raw.to_string())
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl PropertyValue for bool {
    fn value_type() -> ValueType {
        ValueType::Boolean
    }

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(CoercionError::InvalidBoolean)
        }
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Boolean(*self)
    }
}

impl PropertyValue for Option<String> {
    fn value_type() -> ValueType {
        ValueType::OptionalString
    }

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        Ok(Some(raw.to_string()))
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::OptionalString(self.clone())
    }
}

impl PropertyValue for Vec<String> {
    fn value_type() -> ValueType {
        ValueType::StringList
    }

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(raw.split(LIST_DELIMITER).map(|element| element.trim().to_string()).collect())
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::StringList(self.clone())
    }
}

impl<E: ConfigEnum> PropertyValue for E {
    fn value_type() -> ValueType {
        ValueType::Enum {
            type_name: E::TYPE_NAME,
            members: enum_member_names::<E>(),
        }
    }

    fn coerce(raw: &str) -> Result<Self, CoercionError> {
        E::MEMBERS.iter().copied().find(|member| member.name().eq_ignore_ascii_case(raw)).ok_or_else(
            || CoercionError::InvalidEnum {
                type_name: E::TYPE_NAME,
                valid: enum_member_names::<E>(),
            },
        )
    }

    fn to_field_value(&self) -> FieldValue {
        FieldValue::Enum(self.name())
    }
}

/// Classifies an unparseable integer as malformed or merely too wide.
fn integer_parse_error(raw: &str, min: i64, max: i64) -> CoercionError {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
        CoercionError::OutOfRange {
            min,
            max,
        }
    } else {
        CoercionError::InvalidInteger
    }
}

/// Implements [`PropertyValue`] for integer types that widen into `i64`.
macro_rules! integer_property_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn value_type() -> ValueType {
                    ValueType::Integer {
                        min: i64::from(<$ty>::MIN),
                        max: i64::from(<$ty>::MAX),
                    }
                }

                fn coerce(raw: &str) -> Result<Self, CoercionError> {
                    let min = i64::from(<$ty>::MIN);
                    let max = i64::from(<$ty>::MAX);
                    let wide: i128 = raw.parse().map_err(|_| integer_parse_error(raw, min, max))?;
                    <$ty>::try_from(wide).map_err(|_| CoercionError::OutOfRange {
                        min,
                        max,
                    })
                }

                fn to_field_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::from(*self))
                }
            }
        )*
    };
}

integer_property_value!(u16, u32, i64);
