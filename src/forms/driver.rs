use std::collections::BTreeSet;

use tracing::instrument;

use super::{
    FieldError, FieldSpec, Form, FormData, FormErrors, Widget,
    field::{LICENSE_NUMBER, USERNAME},
};
use crate::domain::{Config, Driver, LicenseNumber, NewDriver, Username, license_number};

const NAME_MAX_LENGTH: usize = 150;

fn license_number_field() -> FieldSpec {
    FieldSpec::new("license_number", "License number")
        .required()
        .max_length(license_number::LENGTH)
        .validator(LICENSE_NUMBER)
}

fn clean_license_number(data: &FormData) -> Result<LicenseNumber, Vec<FieldError>> {
    let value = license_number_field().clean_required(data)?;
    LicenseNumber::new(value.to_string()).map_err(|e| vec![e.into()])
}

/// Sign-up form for a new driver account.
///
/// Carries the account fields (username and a confirmed password) followed
/// by the driver's name and license number.
#[derive(Debug, Clone, Default)]
pub struct DriverCreateForm {
    config: Config,
    taken: BTreeSet<String>,
}

impl DriverCreateForm {
    /// Creates the form with the given account rules.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            taken: BTreeSet::new(),
        }
    }

    /// Declares usernames that already belong to an account.
    ///
    /// Matching ignores case, so `JDoe` is taken once `jdoe` exists.
    #[must_use]
    pub fn with_taken_usernames<I, S>(mut self, usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(
            usernames
                .into_iter()
                .map(|username| Into::<String>::into(username).to_lowercase()),
        );
        self
    }

    fn username_field(&self) -> FieldSpec {
        FieldSpec::new("username", "Username")
            .required()
            .max_length(self.config.username_max_length())
            .validator(USERNAME)
    }

    fn clean_username(&self, data: &FormData) -> Result<Username, Vec<FieldError>> {
        let value = self.username_field().clean_required(data)?;
        if self.taken.contains(&value.to_lowercase()) {
            return Err(vec![FieldError::DuplicateUsername]);
        }
        Username::new(value.to_string()).map_err(|e| vec![e.into()])
    }

    fn password_errors(&self, password: &str) -> Vec<FieldError> {
        let mut errors = Vec::new();

        let min = self.config.min_password_length();
        if password.chars().count() < min {
            errors.push(FieldError::PasswordTooShort { min });
        }

        if !self.config.allow_numeric_passwords && password.chars().all(|c| c.is_ascii_digit()) {
            errors.push(FieldError::PasswordEntirelyNumeric);
        }

        errors
    }
}

impl Form for DriverCreateForm {
    type Output = NewDriver;

    fn name(&self) -> &'static str {
        "driver-create"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            self.username_field(),
            FieldSpec::new("password1", "Password")
                .required()
                .widget(Widget::PasswordInput),
            FieldSpec::new("password2", "Password confirmation")
                .required()
                .widget(Widget::PasswordInput),
            FieldSpec::new("first_name", "First name").max_length(NAME_MAX_LENGTH),
            FieldSpec::new("last_name", "Last name").max_length(NAME_MAX_LENGTH),
            license_number_field(),
        ]
    }

    #[instrument(level = "debug", skip_all, fields(form = self.name()))]
    fn clean(&self, data: &FormData) -> Result<NewDriver, FormErrors> {
        let fields = self.fields();
        let mut errors = FormErrors::default();

        let username = errors.collect("username", self.clean_username(data));
        let password1 = errors.collect("password1", fields[1].clean_required(data));
        let password2 = errors.collect("password2", fields[2].clean_required(data));
        let first_name = errors.collect("first_name", fields[3].clean(data));
        let last_name = errors.collect("last_name", fields[4].clean(data));
        let license_number = errors.collect("license_number", clean_license_number(data));

        let password = match (password1, password2) {
            (Some(p1), Some(p2)) if p1 != p2 => {
                errors.add("password2", FieldError::PasswordMismatch);
                None
            }
            (Some(p1), Some(_)) => {
                let problems = self.password_errors(p1);
                if problems.is_empty() {
                    Some(p1)
                } else {
                    for problem in problems {
                        errors.add("password2", problem);
                    }
                    None
                }
            }
            _ => None,
        };

        match (username, password, first_name, last_name, license_number) {
            (Some(username), Some(password), Some(first), Some(last), Some(license_number))
                if errors.is_empty() =>
            {
                tracing::info!(%username, "driver form accepted");
                Ok(NewDriver {
                    username,
                    password: password.to_string(),
                    first_name: first.unwrap_or_default().to_string(),
                    last_name: last.unwrap_or_default().to_string(),
                    license_number,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Form that changes an existing driver's license number.
#[derive(Debug, Clone, Copy, Default)]
pub struct DriverLicenseUpdateForm;

impl DriverLicenseUpdateForm {
    /// Returns the submission that pre-fills the form for `driver`.
    #[must_use]
    pub fn initial(driver: &Driver) -> FormData {
        FormData::new().with("license_number", driver.license_number.as_str())
    }

    /// Validates a submission and writes the new license number to `driver`.
    ///
    /// The driver is left untouched if the submission is invalid.
    ///
    /// # Errors
    ///
    /// Returns the field errors if the submission is invalid.
    pub fn apply(&self, data: &FormData, driver: &mut Driver) -> Result<(), FormErrors> {
        driver.license_number = self.clean(data)?;
        Ok(())
    }
}

impl Form for DriverLicenseUpdateForm {
    type Output = LicenseNumber;

    fn name(&self) -> &'static str {
        "driver-license-update"
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![license_number_field()]
    }

    #[instrument(level = "debug", skip_all, fields(form = self.name()))]
    fn clean(&self, data: &FormData) -> Result<LicenseNumber, FormErrors> {
        let mut errors = FormErrors::default();
        match errors.collect("license_number", clean_license_number(data)) {
            Some(license_number) => Ok(license_number),
            None => Err(errors),
        }
    }
}
