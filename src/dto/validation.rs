//! Validation helpers for DTOs.

use validator::ValidationError;

/// Maximum accepted length for an employee handle.
const EMPLOYEE_ID_MAX_LEN: usize = 32;

/// Validates that an employee ID is 1 to 32 ASCII alphanumeric characters.
///
/// # Examples
///
/// ```ignore
/// validate_employee_id("EMP042")    // Ok
/// validate_employee_id("emp 042")   // Err - space
/// validate_employee_id("")          // Err - empty
/// ```
pub fn validate_employee_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > EMPLOYEE_ID_MAX_LEN {
        let mut err = ValidationError::new("employee_id_length");
        err.message = Some(
            format!(
                "Employee ID must be between 1 and {} characters (got {})",
                EMPLOYEE_ID_MAX_LEN,
                id.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        let mut err = ValidationError::new("employee_id_format");
        err.message = Some("Employee ID must contain only ASCII letters and digits".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a free-text field carries at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("Field must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_employee_id_valid() {
        assert!(validate_employee_id("EMP042").is_ok());
        assert!(validate_employee_id("a").is_ok());
        assert!(validate_employee_id("ADMIN001").is_ok());
    }

    #[test]
    fn test_validate_employee_id_invalid_length() {
        assert!(validate_employee_id("").is_err());
        assert!(validate_employee_id(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_employee_id_invalid_format() {
        assert!(validate_employee_id("emp 042").is_err()); // space
        assert!(validate_employee_id("emp-042").is_err()); // dash
        assert!(validate_employee_id("émp042").is_err()); // non-ASCII
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("do a dance").is_ok());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank("   \t").is_err());
    }
}
