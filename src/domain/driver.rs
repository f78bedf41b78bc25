use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LicenseNumber;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// A validated account name.
///
/// Usernames are non-empty and contain only letters, digits and the
/// characters `@`, `.`, `+`, `-` and `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(NonEmptyString);

impl Username {
    /// Creates a new `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidUsername`] if the string is empty or contains a
    /// character outside the allowed set.
    pub fn new(s: String) -> Result<Self, InvalidUsername> {
        if !USERNAME_PATTERN.is_match(&s) {
            return Err(InvalidUsername(s));
        }
        let non_empty = NonEmptyString::new(s).map_err(InvalidUsername)?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Username {
    type Error = InvalidUsername;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Username {
    type Err = InvalidUsername;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0.as_str().to_owned()
    }
}

impl Deref for Username {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid username.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error(
    "Invalid username '{0}': may contain only letters, numbers, and @/./+/-/_ characters"
)]
pub struct InvalidUsername(String);

/// A driver account.
///
/// Drivers are users of the fleet application who additionally hold a
/// license number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique identifier assigned by the storage layer.
    pub id: Uuid,
    /// The account name used to sign in.
    pub username: Username,
    /// Given name; may be empty.
    #[serde(default)]
    pub first_name: String,
    /// Family name; may be empty.
    #[serde(default)]
    pub last_name: String,
    /// The driver's license number.
    pub license_number: LicenseNumber,
}

impl Driver {
    /// Returns the driver's full name, falling back to the username when no
    /// name was given.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_string()
        }
    }
}

/// A driver that has passed the creation form but has not been stored yet.
///
/// The password is carried in plain text and never serialized; hashing is
/// the storage layer's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDriver {
    /// The account name used to sign in.
    pub username: Username,
    /// The chosen password.
    #[serde(skip_serializing)]
    pub password: String,
    /// Given name; may be empty.
    pub first_name: String,
    /// Family name; may be empty.
    pub last_name: String,
    /// The driver's license number.
    pub license_number: LicenseNumber,
}

impl NewDriver {
    /// Assigns an identifier, producing the stored record.
    ///
    /// The password is dropped.
    #[must_use]
    pub fn into_driver(self, id: Uuid) -> Driver {
        Driver {
            id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            license_number: self.license_number,
        }
    }
}
