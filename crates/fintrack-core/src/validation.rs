use crate::{CoreError, CoreResult};

pub(crate) fn validate_name(kind: &str, name: &str) -> CoreResult<()> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(format!("{kind} name cannot be empty")));
    }
    Ok(())
}

pub(crate) fn validate_amount(field: &str, value: f64) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} cannot be negative (got {value})"
        )));
    }
    Ok(())
}

/// Case-insensitive, whitespace-trimmed comparison used for uniqueness checks.
pub(crate) fn same_name(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}
