use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::domain::{InvalidLicenseNumber, InvalidUsername};

/// Key under which errors that concern the form as a whole are recorded.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// A reason a submitted field value was rejected.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FieldError {
    /// A required field was missing or empty.
    #[error("This field is required.")]
    Required,

    /// The value has more characters than the field allows.
    #[error("Ensure this value has at most {max} characters (it has {actual}).")]
    MaxLength {
        /// The maximum allowed number of characters.
        max: usize,
        /// The number of characters submitted.
        actual: usize,
    },

    /// The value is not a well-formed license number.
    #[error(transparent)]
    LicenseNumber(#[from] InvalidLicenseNumber),

    /// The value is not a valid username.
    #[error(transparent)]
    Username(#[from] InvalidUsername),

    /// The username belongs to an existing account.
    #[error("A user with that username already exists.")]
    DuplicateUsername,

    /// The password confirmation differs from the password.
    #[error("The two password fields didn't match.")]
    PasswordMismatch,

    /// The password is shorter than the configured minimum.
    #[error("This password is too short. It must contain at least {min} characters.")]
    PasswordTooShort {
        /// The minimum number of characters.
        min: usize,
    },

    /// The password consists only of digits.
    #[error("This password is entirely numeric.")]
    PasswordEntirelyNumeric,

    /// The value is not among the field's choices.
    #[error("Select a valid choice. {0} is not one of the available choices.")]
    InvalidChoice(String),
}

/// Every error found while cleaning a form, grouped by field name.
///
/// Errors that are not tied to a single field are stored under
/// [`NON_FIELD_ERRORS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, Vec<FieldError>>);

impl FormErrors {
    /// Records an error against `field`.
    pub fn add(&mut self, field: impl Into<String>, error: FieldError) {
        self.0.entry(field.into()).or_default().push(error);
    }

    /// Records the outcome of cleaning a single field.
    ///
    /// Returns the cleaned value on success; on failure the errors are
    /// recorded and `None` is returned.
    pub fn collect<T>(&mut self, field: &str, result: Result<T, Vec<FieldError>>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(errors) => {
                self.0.entry(field.to_string()).or_default().extend(errors);
                None
            }
        }
    }

    /// Returns `true` if no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if at least one error was recorded against `field`.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Returns the errors recorded against `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> &[FieldError] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates over fields with errors, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldError])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Returns the number of fields with errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (field, errors) in &self.0 {
            for error in errors {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{field}: {error}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FormErrors {}

impl Serialize for FormErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, errors) in &self.0 {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            map.serialize_entry(field, &messages)?;
        }
        map.end()
    }
}
