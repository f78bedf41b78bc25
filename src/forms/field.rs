use std::fmt;

use serde::{Serialize, Serializer};

use super::{FieldError, FormData};
use crate::domain::{Username, validate_license_number};

/// How a field is presented to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    /// A single-line text box.
    #[default]
    TextInput,
    /// A text box whose contents are masked.
    PasswordInput,
    /// A drop-down with exactly one selection.
    Select,
    /// A list of checkboxes allowing any number of selections.
    CheckboxSelectMultiple,
}

impl fmt::Display for Widget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::TextInput => "text",
            Self::PasswordInput => "password",
            Self::Select => "select",
            Self::CheckboxSelectMultiple => "checkbox-multiple",
        };
        f.write_str(name)
    }
}

/// A named check run against every submitted value of a field.
#[derive(Clone, Copy)]
pub struct Validator {
    name: &'static str,
    check: fn(&str) -> Result<(), FieldError>,
}

impl Validator {
    /// Creates a validator from a name and a check function.
    #[must_use]
    pub const fn new(name: &'static str, check: fn(&str) -> Result<(), FieldError>) -> Self {
        Self { name, check }
    }

    /// Returns the validator's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Runs the check against `value`.
    ///
    /// # Errors
    ///
    /// Returns the check's [`FieldError`] if the value is rejected.
    pub fn validate(&self, value: &str) -> Result<(), FieldError> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name).finish()
    }
}

impl Serialize for Validator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// The driver license-number rule, as a field validator.
pub const LICENSE_NUMBER: Validator = Validator::new("license_number", check_license_number);

/// The username character rule, as a field validator.
pub const USERNAME: Validator = Validator::new("username", check_username);

fn check_license_number(value: &str) -> Result<(), FieldError> {
    validate_license_number(value)?;
    Ok(())
}

fn check_username(value: &str) -> Result<(), FieldError> {
    Username::new(value.to_string())?;
    Ok(())
}

/// One selectable option of a choice field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// The submitted value identifying the option.
    pub value: String,
    /// The text shown to the user.
    pub label: String,
}

/// The declaration of a single form field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    /// The key under which the value is submitted.
    pub name: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Whether an empty submission is an error.
    pub required: bool,
    /// Maximum number of characters, if limited.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// How the field is presented.
    pub widget: Widget,
    /// Checks run against each non-empty value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
    /// The allowed values, for choice fields.
    ///
    /// `None` means any value is accepted; an empty list accepts nothing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
}

impl FieldSpec {
    /// Creates an optional text field with no limits.
    #[must_use]
    pub const fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            max_length: None,
            widget: Widget::TextInput,
            validators: Vec::new(),
            choices: None,
        }
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Limits the number of characters.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the widget.
    #[must_use]
    pub const fn widget(mut self, widget: Widget) -> Self {
        self.widget = widget;
        self
    }

    /// Attaches a validator.
    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Restricts the field to the given choices.
    #[must_use]
    pub fn choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Cleans a single-valued field.
    ///
    /// Returns `Ok(None)` for an empty optional field. Values are not
    /// trimmed.
    ///
    /// # Errors
    ///
    /// Returns every error found: [`FieldError::Required`] on its own, or
    /// the length error followed by each failing validator.
    pub fn clean<'a>(&self, data: &'a FormData) -> Result<Option<&'a str>, Vec<FieldError>> {
        let value = match data.get(self.name) {
            Some(value) if !value.is_empty() => value,
            _ if self.required => return Err(vec![FieldError::Required]),
            _ => return Ok(None),
        };

        let errors = self.check(value);
        if errors.is_empty() {
            Ok(Some(value))
        } else {
            tracing::debug!(field = self.name, ?errors, "field rejected");
            Err(errors)
        }
    }

    /// Cleans a single-valued field that must be present.
    ///
    /// # Errors
    ///
    /// As [`FieldSpec::clean`], and [`FieldError::Required`] if the value is
    /// empty even though the field is declared optional.
    pub fn clean_required<'a>(&self, data: &'a FormData) -> Result<&'a str, Vec<FieldError>> {
        self.clean(data)?.ok_or_else(|| vec![FieldError::Required])
    }

    /// Cleans a multi-valued field, such as a checkbox list.
    ///
    /// Empty values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Required`] if the field is required and nothing
    /// was selected, otherwise every error found across all values.
    pub fn clean_multiple<'a>(&self, data: &'a FormData) -> Result<Vec<&'a str>, Vec<FieldError>> {
        let values: Vec<&str> = data
            .get_all(self.name)
            .iter()
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .collect();

        if values.is_empty() && self.required {
            return Err(vec![FieldError::Required]);
        }

        let errors: Vec<FieldError> = values.iter().flat_map(|v| self.check(v)).collect();
        if errors.is_empty() {
            Ok(values)
        } else {
            tracing::debug!(field = self.name, ?errors, "field rejected");
            Err(errors)
        }
    }

    fn check(&self, value: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if let Some(max) = self.max_length {
            let actual = value.chars().count();
            if actual > max {
                errors.push(FieldError::MaxLength { max, actual });
            }
        }

        let offered = |choices: &Vec<Choice>| choices.iter().any(|c| c.value == value);
        if self.choices.as_ref().is_some_and(|choices| !offered(choices)) {
            errors.push(FieldError::InvalidChoice(value.to_string()));
        }

        errors.extend(self.validators.iter().filter_map(|v| v.validate(value).err()));
        errors
    }
}
