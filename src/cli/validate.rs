use clap::Parser;
use taxi::validate_license_number;
use tracing::instrument;

use super::terminal::{Colorize, Target};

#[derive(Debug, Parser)]
#[command(about = "Check that values are well-formed license numbers")]
pub struct Validate {
    /// The license numbers to check
    #[arg(required = true, value_name = "LICENSE_NUMBER")]
    values: Vec<String>,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

impl Validate {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let mut invalid = 0;

        for value in &self.values {
            match validate_license_number(value) {
                Ok(valid) => {
                    if !self.quiet {
                        println!("{}", format!("✓ {valid}").success(Target::Stdout));
                    }
                }
                Err(e) => {
                    invalid += 1;
                    eprintln!("{}", format!("✗ {value:?}: {e}").warning(Target::Stderr));
                }
            }
        }

        if invalid > 0 {
            tracing::info!(invalid, total = self.values.len(), "invalid license numbers");
            std::process::exit(2);
        }

        Ok(())
    }
}
