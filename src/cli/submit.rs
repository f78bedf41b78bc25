use std::path::PathBuf;

use clap::Parser;
use serde::Serialize;
use taxi::{Config, DriverLicenseUpdateForm, Form, FormData, FormErrors, forms::FieldValue};
use tracing::instrument;

use super::{
    Choices, FormKind,
    terminal::{Colorize, Target},
};

#[derive(Debug, Parser)]
#[command(about = "Clean a form submission and print the resulting record as JSON")]
pub struct Submit {
    /// The form to submit
    form: FormKind,

    /// A submitted value, as NAME=VALUE (repeat for several values)
    #[arg(long = "field", short, value_name = "NAME=VALUE")]
    fields: Vec<FieldValue>,

    /// JSON file with the manufacturers and drivers offered as choices
    ///
    /// Drivers listed here also count as taken usernames for the
    /// driver-create form.
    #[arg(long, value_name = "FILE")]
    choices: Option<PathBuf>,

    /// Usernames that already belong to an account
    #[arg(long, value_name = "USERNAME", value_delimiter = ',')]
    taken: Vec<String>,

    /// Format of the error report
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Submit {
    #[instrument(level = "debug", skip(self, config), fields(form = ?self.form))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let choices = Choices::load(self.choices.as_deref())?;
        let data: FormData = self.fields.iter().cloned().collect();

        let result = match self.form {
            FormKind::DriverCreate => {
                let form = choices
                    .driver_create_form(config)
                    .with_taken_usernames(self.taken.iter().cloned());
                render(form.clean(&data))
            }
            FormKind::DriverLicenseUpdate => render(DriverLicenseUpdateForm.clean(&data)),
            FormKind::Car => render(choices.car_form().clean(&data)),
        };

        match result? {
            Ok(json) => {
                println!("{json}");
                Ok(())
            }
            Err(errors) => {
                self.report(&errors)?;
                std::process::exit(2);
            }
        }
    }

    fn report(&self, errors: &FormErrors) -> anyhow::Result<()> {
        match self.output {
            OutputFormat::Json => eprintln!("{}", serde_json::to_string_pretty(errors)?),
            OutputFormat::Table => {
                eprintln!(
                    "{}",
                    format!("✗ {} field(s) rejected", errors.len()).warning(Target::Stderr)
                );
                for (field, field_errors) in errors.iter() {
                    for error in field_errors {
                        eprintln!("  {} {error}", field.info(Target::Stderr));
                    }
                }
            }
        }
        Ok(())
    }
}

fn render<T: Serialize>(
    result: Result<T, FormErrors>,
) -> anyhow::Result<Result<String, FormErrors>> {
    match result {
        Ok(output) => Ok(Ok(serde_json::to_string_pretty(&output)?)),
        Err(errors) => Ok(Err(errors)),
    }
}

#[cfg(test)]
mod tests {
    use taxi::{FormErrors, LicenseNumber, forms::FieldError};

    use super::*;

    #[test]
    fn render_serializes_accepted_record() {
        let license: LicenseNumber = "ABC12345".parse().unwrap();
        let json = render(Ok::<_, FormErrors>(license)).unwrap().unwrap();
        assert_eq!(json, "\"ABC12345\"");
    }

    #[test]
    fn render_passes_errors_through() {
        let mut errors = FormErrors::default();
        errors.add("license_number", FieldError::Required);

        let rendered = render::<LicenseNumber>(Err(errors.clone())).unwrap();
        assert_eq!(rendered, Err(errors));
    }
}
