use std::{fmt, ops::Deref, str::FromStr};

use serde::{Deserialize, Serialize};

/// Total number of characters in a license number.
pub const LENGTH: usize = 8;

/// Number of leading uppercase letters.
pub const PREFIX_LENGTH: usize = 3;

/// Error returned when a string is not a well-formed license number.
///
/// The message is fixed; it lists all three rules regardless of which one
/// failed.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
#[error(
    "The license number must be 8 characters long, The first 3 characters are capital letters, \
     The last 5 characters are numbers."
)]
pub struct InvalidLicenseNumber;

/// Checks that `value` is a driver's license number.
///
/// A license number is exactly 8 characters long. The first 3 characters are
/// uppercase ASCII letters and the last 5 are ASCII digits. The input is not
/// trimmed or case-folded.
///
/// On success the input is returned unchanged.
///
/// # Errors
///
/// Returns [`InvalidLicenseNumber`] if any of the three rules fails.
///
/// # Examples
///
/// ```
/// use taxi::domain::license_number::validate_license_number;
///
/// assert_eq!(validate_license_number("ABC12345"), Ok("ABC12345"));
/// assert!(validate_license_number("abc12345").is_err());
/// ```
pub fn validate_license_number(value: &str) -> Result<&str, InvalidLicenseNumber> {
    let valid_length = value.chars().count() == LENGTH;

    let mut prefix = value.chars().take(PREFIX_LENGTH).peekable();
    let valid_prefix = prefix.peek().is_some() && prefix.all(|c| c.is_ascii_uppercase());

    let mut suffix = value.chars().skip(PREFIX_LENGTH).peekable();
    let valid_suffix = suffix.peek().is_some() && suffix.all(|c| c.is_ascii_digit());

    if valid_length && valid_prefix && valid_suffix {
        Ok(value)
    } else {
        tracing::debug!(value, "rejected license number");
        Err(InvalidLicenseNumber)
    }
}

/// A validated driver's license number, e.g. `ABC12345`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicenseNumber(String);

impl LicenseNumber {
    /// Creates a new `LicenseNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidLicenseNumber`] if the string is not a well-formed
    /// license number.
    pub fn new(s: String) -> Result<Self, InvalidLicenseNumber> {
        validate_license_number(&s)?;
        Ok(Self(s))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the three-letter prefix.
    #[must_use]
    pub fn letters(&self) -> &str {
        // the invariant guarantees ASCII, so byte offsets are char offsets
        &self.0[..PREFIX_LENGTH]
    }

    /// Returns the five-digit suffix.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0[PREFIX_LENGTH..]
    }
}

impl TryFrom<String> for LicenseNumber {
    type Error = InvalidLicenseNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LicenseNumber {
    type Error = InvalidLicenseNumber;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl FromStr for LicenseNumber {
    type Err = InvalidLicenseNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl From<LicenseNumber> for String {
    fn from(value: LicenseNumber) -> Self {
        value.0
    }
}

impl AsRef<str> for LicenseNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for LicenseNumber {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("ABC12345"; "canonical")]
    #[test_case("ZZZ00000"; "all zeros")]
    #[test_case("XYZ99999"; "all nines")]
    fn accepts_valid(value: &str) {
        assert_eq!(validate_license_number(value), Ok(value));
    }

    #[test_case("abc12345"; "lowercase prefix")]
    #[test_case("AbC12345"; "mixed case prefix")]
    #[test_case("AB123456"; "two letters six digits")]
    #[test_case("ABCDE123"; "letters in suffix")]
    #[test_case("ABC1234"; "too short")]
    #[test_case("ABC123456"; "too long")]
    #[test_case(""; "empty")]
    #[test_case("AB"; "shorter than prefix")]
    #[test_case(" ABC12345"; "leading whitespace")]
    #[test_case("ABC12345 "; "trailing whitespace")]
    #[test_case("ABC 1234"; "inner whitespace")]
    #[test_case("12345ABC"; "reversed")]
    #[test_case("ÄBC12345"; "non-ascii letter")]
    #[test_case("ABC1234٥"; "non-ascii digit")]
    fn rejects_invalid(value: &str) {
        assert_eq!(validate_license_number(value), Err(InvalidLicenseNumber));
    }

    fn strings_over(alphabet: &[char], max_len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut frontier = vec![String::new()];
        for _ in 0..max_len {
            frontier = frontier
                .iter()
                .flat_map(|s| {
                    alphabet.iter().map(move |c| {
                        let mut next = s.clone();
                        next.push(*c);
                        next
                    })
                })
                .collect();
            all.extend(frontier.iter().cloned());
        }
        all
    }

    #[test]
    fn accepts_exactly_the_license_format() {
        for s in strings_over(&['A', 'z', '7', ' '], 8) {
            let bytes = s.as_bytes();
            let expected = bytes.len() == 8
                && bytes[..3].iter().all(u8::is_ascii_uppercase)
                && bytes[3..].iter().all(u8::is_ascii_digit);
            assert_eq!(validate_license_number(&s).is_ok(), expected, "{s:?}");
        }
    }

    #[test]
    fn validation_is_idempotent() {
        let first = validate_license_number("QWE54321").unwrap();
        let second = validate_license_number(first).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn error_message_is_fixed() {
        assert_eq!(
            InvalidLicenseNumber.to_string(),
            "The license number must be 8 characters long, The first 3 characters are capital \
             letters, The last 5 characters are numbers."
        );
    }

    #[test]
    fn accessors_split_prefix_and_digits() {
        let license: LicenseNumber = "ABC12345".parse().unwrap();
        assert_eq!(license.letters(), "ABC");
        assert_eq!(license.digits(), "12345");
        assert_eq!(license.as_str(), "ABC12345");
        assert_eq!(license.to_string(), "ABC12345");
    }

    #[test]
    fn conversions_share_the_rule() {
        assert!(LicenseNumber::try_from("abc12345").is_err());
        assert!(LicenseNumber::try_from("ABC12345".to_string()).is_ok());
        assert!("ABC1234".parse::<LicenseNumber>().is_err());
    }

    #[test]
    fn serde_validates_on_deserialize() {
        let license: LicenseNumber = serde_json::from_str("\"DEF67890\"").unwrap();
        assert_eq!(serde_json::to_string(&license).unwrap(), "\"DEF67890\"");

        assert!(serde_json::from_str::<LicenseNumber>("\"def67890\"").is_err());
    }
}
