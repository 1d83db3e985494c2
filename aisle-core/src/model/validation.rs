use std::fmt::Display;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
    },

    #[error("{field} {id} does not exist")]
    MissingReference { field: &'static str, id: i64 },

    #[error("{0}")]
    Patch(String),
}

/// Required text with a maximum length in characters
pub fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Inclusive numeric range
pub fn check_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<(), ValidationError>
where
    T: PartialOrd + Display,
{
    // NaN fails both comparisons, so test for containment.
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: min.to_string(),
            max: max.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_text() {
        assert!(check_text("Name", "Milk", 50).is_ok());
        assert_eq!(
            check_text("Name", "   ", 50),
            Err(ValidationError::Required { field: "Name" })
        );
        assert_eq!(
            check_text("Name", &"x".repeat(51), 50),
            Err(ValidationError::TooLong { field: "Name", max: 50 })
        );
        // Length is counted in characters, not bytes.
        assert!(check_text("Name", &"ø".repeat(50), 50).is_ok());
    }

    #[test]
    fn test_check_range() {
        assert!(check_range("Price", 0.0, 0.0, 10000.0).is_ok());
        assert!(check_range("Price", 10000.0, 0.0, 10000.0).is_ok());
        assert!(check_range("Price", -0.5, 0.0, 10000.0).is_err());
        assert!(check_range("Price", f64::NAN, 0.0, 10000.0).is_err());
        let err = check_range("NumberOfStaff", 10001, 0, 10000).unwrap_err();
        assert_eq!(err.to_string(), "NumberOfStaff must be between 0 and 10000");
    }
}
