//! Form validation
//!
//! Checks run before any network call. The first failing check wins.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub const INVALID_PASSKEY: &str = "Invalid passkey. Access denied.";
pub const INVALID_NAME: &str = "Please enter a valid name (at least 2 characters).";
pub const INVALID_EMPLOYEE_ID: &str = "Please enter a valid Employee ID (minimum 3 characters).";
pub const INVALID_NAME_CHARS: &str = "Name should contain only letters and spaces.";

const MIN_NAME_LEN: usize = 2;
const MIN_EMPLOYEE_ID_LEN: usize = 3;

fn name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z\s]+$").ok())
        .as_ref()
}

/// A rejected form field
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", INVALID_PASSKEY)]
    Passkey,

    #[error("{}", INVALID_NAME)]
    Name,

    #[error("{}", INVALID_EMPLOYEE_ID)]
    EmployeeId,

    #[error("{}", INVALID_NAME_CHARS)]
    NameCharacters,
}

impl ValidationError {
    /// The status message shown for this failure
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::Passkey => INVALID_PASSKEY,
            ValidationError::Name => INVALID_NAME,
            ValidationError::EmployeeId => INVALID_EMPLOYEE_ID,
            ValidationError::NameCharacters => INVALID_NAME_CHARS,
        }
    }
}

/// Registration form input after normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub passkey: String,
    pub name: String,
    pub employee_id: String,
}

/// Live feedback for the employee-id field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHint {
    Valid,
    Invalid,
}

/// Trim and upper-case an employee id
pub fn normalize_employee_id(input: &str) -> String {
    input.trim().to_uppercase()
}

pub fn check_passkey(passkey: &str, allowed: &[String]) -> Result<(), ValidationError> {
    let passkey = passkey.trim();
    if allowed.iter().any(|p| p == passkey) {
        Ok(())
    } else {
        Err(ValidationError::Passkey)
    }
}

/// Normalize an employee id and check its length
pub fn check_employee_id(input: &str) -> Result<String, ValidationError> {
    let id = normalize_employee_id(input);
    if id.chars().count() < MIN_EMPLOYEE_ID_LEN {
        return Err(ValidationError::EmployeeId);
    }
    Ok(id)
}

/// Validate the registration form in order: passkey, name length,
/// employee id, name characters
pub fn validate_registration(
    passkey: &str,
    name: &str,
    employee_id: &str,
    allowed: &[String],
) -> Result<RegistrationForm, ValidationError> {
    check_passkey(passkey, allowed)?;

    let name = name.trim();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(ValidationError::Name);
    }

    let employee_id = check_employee_id(employee_id)?;

    if !name_pattern().is_some_and(|re| re.is_match(name)) {
        return Err(ValidationError::NameCharacters);
    }

    Ok(RegistrationForm {
        passkey: passkey.trim().to_string(),
        name: name.to_string(),
        employee_id,
    })
}

pub fn employee_id_hint(input: &str) -> FieldHint {
    if input.trim().chars().count() >= MIN_EMPLOYEE_ID_LEN {
        FieldHint::Valid
    } else {
        FieldHint::Invalid
    }
}
