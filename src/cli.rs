use std::path::{Path, PathBuf};

mod describe;
mod submit;
mod terminal;
mod validate;

use anyhow::Context;
use clap::ArgAction;
use describe::Describe;
use serde::Deserialize;
use submit::Submit;
use taxi::{
    CarForm, Config, Driver, DriverCreateForm, DriverLicenseUpdateForm, Form, Manufacturer,
    forms::FieldSpec,
};
use validate::Validate;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => Config::default(),
        };

        self.command.run(&config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Check license numbers
    ///
    /// A license number is 3 capital letters followed by 5 digits, e.g.
    /// ABC12345.
    Validate(Validate),

    /// Show the fields of a form
    Describe(Describe),

    /// Clean a form submission and print the resulting record
    Submit(Submit),
}

impl Command {
    fn run(self, config: &Config) -> anyhow::Result<()> {
        match self {
            Self::Validate(command) => command.run(),
            Self::Describe(command) => command.run(config),
            Self::Submit(command) => command.run(config),
        }
    }
}

/// The forms available on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum FormKind {
    /// Sign-up form for a new driver
    DriverCreate,
    /// Change an existing driver's license number
    DriverLicenseUpdate,
    /// Create or edit a car and its drivers
    Car,
}

impl FormKind {
    fn fields(self, config: &Config, choices: Choices) -> Vec<FieldSpec> {
        match self {
            Self::DriverCreate => choices.driver_create_form(config).fields(),
            Self::DriverLicenseUpdate => DriverLicenseUpdateForm.fields(),
            Self::Car => choices.car_form().fields(),
        }
    }
}

/// Records that populate the choice fields of a form.
#[derive(Debug, Default, Deserialize)]
struct Choices {
    #[serde(default)]
    manufacturers: Vec<Manufacturer>,
    #[serde(default)]
    drivers: Vec<Driver>,
}

impl Choices {
    fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read choices from {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse choices in {}", path.display()))
    }

    fn driver_create_form(&self, config: &Config) -> DriverCreateForm {
        DriverCreateForm::new(config.clone())
            .with_taken_usernames(self.drivers.iter().map(|d| d.username.to_string()))
    }

    fn car_form(self) -> CarForm {
        CarForm::new(self.manufacturers, self.drivers)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parses_validate() {
        let cli = Cli::try_parse_from(["taxi", "-vv", "validate", "ABC12345", "abc"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Validate(_)));
    }

    #[test]
    fn parses_submit_fields() {
        let cli = Cli::try_parse_from([
            "taxi",
            "submit",
            "driver-license-update",
            "--field",
            "license_number=ABC12345",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Submit(_)));
    }

    #[test]
    fn rejects_malformed_field() {
        let result = Cli::try_parse_from(["taxi", "submit", "car", "--field", "model"]);
        assert!(result.is_err());
    }

    #[test]
    fn choices_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("choices.json");
        std::fs::write(
            &path,
            r#"{"manufacturers":[{"id":"67e55044-10b1-426f-9247-bb680e5fe0c8","name":"Toyota"}]}"#,
        )
        .unwrap();

        let choices = Choices::load(Some(path.as_path())).unwrap();
        assert_eq!(choices.manufacturers.len(), 1);
        assert!(choices.drivers.is_empty());
    }

    #[test]
    fn choices_default_when_absent() {
        let choices = Choices::load(None).unwrap();
        assert!(choices.manufacturers.is_empty());
    }

    fn write_choices(dir: &Path) -> PathBuf {
        let path = dir.join("choices.json");
        std::fs::write(
            &path,
            r#"{
                "manufacturers": [
                    {"id": "67e55044-10b1-426f-9247-bb680e5fe0c8", "name": "Toyota"}
                ],
                "drivers": [
                    {
                        "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
                        "username": "alice",
                        "license_number": "ABC12345"
                    }
                ]
            }"#,
        )
        .unwrap();
        path
    }

    #[test]
    fn validate_run_accepts_valid_values() {
        let command = Validate::try_parse_from(["validate", "ABC12345", "XYZ00000"]).unwrap();
        command.run().unwrap();
    }

    #[test]
    fn describe_run_prints_json() {
        let command =
            Describe::try_parse_from(["describe", "driver-create", "--output", "json"]).unwrap();
        command.run(&Config::default()).unwrap();
    }

    #[test]
    fn describe_run_prints_table_with_choices() {
        let dir = tempfile::tempdir().unwrap();
        let choices = write_choices(dir.path());

        let command = Describe::try_parse_from([
            "describe",
            "car",
            "--choices",
            choices.to_str().unwrap(),
        ])
        .unwrap();
        command.run(&Config::default()).unwrap();
    }

    #[test]
    fn describe_run_reports_bad_choices_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");

        let command = Describe::try_parse_from([
            "describe",
            "car",
            "--choices",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        let error = command.run(&Config::default()).unwrap_err();
        assert!(error.to_string().starts_with("failed to read choices from"));
    }

    #[test]
    fn submit_run_accepts_license_update() {
        let command = Submit::try_parse_from([
            "submit",
            "driver-license-update",
            "--field",
            "license_number=ABC12345",
        ])
        .unwrap();
        command.run(&Config::default()).unwrap();
    }

    #[test]
    fn submit_run_accepts_car_from_choices() {
        let dir = tempfile::tempdir().unwrap();
        let choices = write_choices(dir.path());

        let command = Submit::try_parse_from([
            "submit",
            "car",
            "--choices",
            choices.to_str().unwrap(),
            "--field",
            "model=Corolla",
            "--field",
            "manufacturer=67e55044-10b1-426f-9247-bb680e5fe0c8",
            "--field",
            "drivers=0f8fad5b-d9cb-469f-a165-70867728950e",
        ])
        .unwrap();
        command.run(&Config::default()).unwrap();
    }

    #[test]
    fn choices_drivers_count_as_taken_usernames() {
        let dir = tempfile::tempdir().unwrap();
        let choices = Choices::load(Some(write_choices(dir.path()).as_path())).unwrap();

        let data = taxi::FormData::new()
            .with("username", "Alice")
            .with("password1", "correct-horse")
            .with("password2", "correct-horse")
            .with("license_number", "XYZ54321");
        let errors = choices
            .driver_create_form(&Config::default())
            .clean(&data)
            .unwrap_err();
        assert!(errors.has("username"));
    }
}
