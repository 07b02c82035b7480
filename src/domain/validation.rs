use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

pub fn new_validation_error(code: &'static str, msg: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(msg.into());
    err
}

/// Rejects values that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(new_validation_error("blank", "This field may not be blank."));
    }
    Ok(())
}

/// Accepts absolute http(s) URLs only.
pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some() => Ok(()),
        _ => Err(new_validation_error("invalid_url", "Enter a valid URL.")),
    }
}

/// Blank values are allowed and later stored as absent.
pub fn validate_optional_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    validate_url(value.trim())
}

pub fn validate_tech_stack(stack: &[String]) -> Result<(), ValidationError> {
    if stack.len() > 50 {
        return Err(new_validation_error("too_many_items", "At most 50 technologies are allowed."));
    }
    if stack.iter().any(|t| t.trim().is_empty() || t.len() > 50) {
        return Err(new_validation_error(
            "invalid_tech",
            "Technologies must be non-empty and at most 50 characters.",
        ));
    }
    Ok(())
}

/// Length check on characters rather than bytes.
pub fn check_length(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) {
    let len = value.chars().count();
    if len < min || len > max {
        errors.add(
            field,
            new_validation_error(
                "length",
                format!("Ensure this field has between {} and {} characters.", min, max),
            ),
        );
    }
}

/// Folds a custom validator result into an error set.
pub fn collect(
    errors: &mut ValidationErrors,
    field: &'static str,
    result: Result<(), ValidationError>,
) {
    if let Err(err) = result {
        errors.add(field, err);
    }
}

/// Trims a value and maps blanks to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
