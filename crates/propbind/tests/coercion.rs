//! Type coercion tests for propbind.
// crates/propbind/tests/coercion.rs
// =============================================================================
// Module: Coercion Tests
// Description: Validate raw string conversion for every value type.
// Purpose: Ensure coercion accepts canonical forms and rejects the rest.
// =============================================================================

use propbind::CoercionError;
use propbind::FieldValue;
use propbind::PropertyValue;
use propbind::ValueType;

mod common;
use crate::common::Mode;

type TestResult = Result<(), String>;

#[test]
fn boolean_accepts_any_case() -> TestResult {
    for raw in ["true", "TRUE", "True", "tRuE"] {
        if bool::coerce(raw) != Ok(true) {
            return Err(format!("{raw} should coerce to true"));
        }
    }
    for raw in ["false", "FALSE", "False"] {
        if bool::coerce(raw) != Ok(false) {
            return Err(format!("{raw} should coerce to false"));
        }
    }
    Ok(())
}

#[test]
fn boolean_rejects_other_spellings() -> TestResult {
    for raw in ["yes", "1", "", " true", "truee"] {
        if bool::coerce(raw) != Err(CoercionError::InvalidBoolean) {
            return Err(format!("{raw:?} should be rejected"));
        }
    }
    Ok(())
}

#[test]
fn enum_matches_member_names_case_insensitively() -> TestResult {
    if Mode::coerce("fast") != Ok(Mode::Fast) || Mode::coerce("SAFE") != Ok(Mode::Safe) {
        return Err("enum coercion should ignore case".to_string());
    }
    match Mode::coerce("turbo") {
        Err(CoercionError::InvalidEnum {
            type_name,
            valid,
        }) if type_name == "Mode" && valid == vec!["FAST", "SAFE"] => Ok(()),
        other => Err(format!("unexpected result: {other:?}")),
    }
}

#[test]
fn enum_error_message_lists_members_without_echoing_input() -> TestResult {
    let error = Mode::coerce("hunter2").err().ok_or("expected error")?;
    let message = error.to_string();
    if !message.contains("FAST") || !message.contains("SAFE") {
        return Err(format!("message missing members: {message}"));
    }
    if message.contains("hunter2") {
        return Err(format!("message echoes input: {message}"));
    }
    Ok(())
}

#[test]
fn string_list_splits_and_trims() -> TestResult {
    let parsed = Vec::<String>::coerce(" a , b,c ").map_err(|err| err.to_string())?;
    if parsed != vec!["a", "b", "c"] {
        return Err(format!("unexpected list: {parsed:?}"));
    }
    Ok(())
}

#[test]
fn string_list_empty_input_is_empty_list() -> TestResult {
    for raw in ["", "   "] {
        let parsed = Vec::<String>::coerce(raw).map_err(|err| err.to_string())?;
        if !parsed.is_empty() {
            return Err(format!("{raw:?} should produce an empty list"));
        }
    }
    Ok(())
}

#[test]
fn string_list_keeps_inner_empty_elements() -> TestResult {
    let parsed = Vec::<String>::coerce("a,,b").map_err(|err| err.to_string())?;
    if parsed != vec!["a", "", "b"] {
        return Err(format!("unexpected list: {parsed:?}"));
    }
    Ok(())
}

#[test]
fn strings_pass_through_unchanged() -> TestResult {
    if String::coerce("  spaced  ") != Ok("  spaced  ".to_string()) {
        return Err("strings must not be trimmed".to_string());
    }
    if Option::<String>::coerce("") != Ok(Some(String::new())) {
        return Err("present optional strings are set even when empty".to_string());
    }
    Ok(())
}

#[test]
fn integers_respect_type_bounds() -> TestResult {
    if u16::coerce("65535") != Ok(65535) || i64::coerce("-42") != Ok(-42) {
        return Err("in-range integers should coerce".to_string());
    }
    if u16::coerce("65536") != Err(CoercionError::OutOfRange { min: 0, max: 65535 }) {
        return Err("u16 overflow should be out of range".to_string());
    }
    if u32::coerce("-1") != Err(CoercionError::OutOfRange { min: 0, max: i64::from(u32::MAX) }) {
        return Err("negative u32 should be out of range".to_string());
    }
    if u16::coerce("12ab") != Err(CoercionError::InvalidInteger) {
        return Err("non-digits should be invalid".to_string());
    }
    if i64::coerce("99999999999999999999999999999999999999999")
        != Err(CoercionError::OutOfRange { min: i64::MIN, max: i64::MAX })
    {
        return Err("over-wide digits should be out of range".to_string());
    }
    Ok(())
}

#[test]
fn value_types_and_labels_are_declared() -> TestResult {
    let cases = [
        (String::value_type(), "string"),
        (bool::value_type(), "boolean"),
        (Mode::value_type(), "enum(Mode)"),
        (Option::<String>::value_type(), "optional<string>"),
        (Vec::<String>::value_type(), "list<string>"),
        (u16::value_type(), "integer"),
    ];
    for (value_type, label) in cases {
        if value_type.label() != label {
            return Err(format!("expected {label}, got {}", value_type.label()));
        }
    }
    if u16::value_type() != (ValueType::Integer { min: 0, max: 65535 }) {
        return Err("u16 bounds should be declared".to_string());
    }
    Ok(())
}

#[test]
fn field_values_render_as_bindable_strings() -> TestResult {
    let cases = [
        (FieldValue::Boolean(true), Some("true")),
        (FieldValue::Enum("ICEBERG"), Some("ICEBERG")),
        (FieldValue::OptionalString(None), None),
        (FieldValue::StringList(vec!["a".to_string(), "b".to_string()]), Some("a,b")),
        (FieldValue::StringList(Vec::new()), Some("")),
        (FieldValue::Integer(-3), Some("-3")),
    ];
    for (value, expected) in cases {
        if value.to_property_string().as_deref() != expected {
            return Err(format!("unexpected rendering for {value:?}"));
        }
    }
    Ok(())
}
