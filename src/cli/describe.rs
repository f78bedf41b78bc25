use std::path::PathBuf;

use clap::Parser;
use taxi::{Config, forms::FieldSpec};
use tracing::instrument;

use super::{
    Choices, FormKind,
    terminal::{Colorize, Target, is_narrow},
};

#[derive(Debug, Parser)]
#[command(about = "Show the fields a form declares")]
pub struct Describe {
    /// The form to describe
    form: FormKind,

    /// JSON file with the manufacturers and drivers offered as choices
    #[arg(long, value_name = "FILE")]
    choices: Option<PathBuf>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Describe {
    #[instrument(level = "debug", skip(self, config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let choices = Choices::load(self.choices.as_deref())?;
        let fields = self.form.fields(config, choices);

        match self.output {
            OutputFormat::Table => output_table(&fields),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&fields)?),
        }

        Ok(())
    }
}

fn output_table(fields: &[FieldSpec]) {
    let narrow = is_narrow();

    for field in fields {
        let required = if field.required { "required" } else { "optional" };
        println!("{}", field.name.info(Target::Stdout));

        if narrow {
            println!("  {} ({required})", field.widget);
            continue;
        }

        println!("  {}", field.label);
        let mut detail = format!("  {}, {required}", field.widget);
        if let Some(max) = field.max_length {
            detail.push_str(&format!(", max {max} chars"));
        }
        for validator in &field.validators {
            detail.push_str(&format!(", {} rule", validator.name()));
        }
        println!("{}", detail.dim(Target::Stdout));

        for choice in field.choices.iter().flatten() {
            println!("    • {} {}", choice.label, choice.value.dim(Target::Stdout));
        }
    }
}
