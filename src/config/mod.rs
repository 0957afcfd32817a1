pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate, MANIFEST_EXTENSIONS};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_BUNDLE_FILENAME: &str = "boarding_output.zip";

/// 各輸出格式的預設檔名
pub fn default_filename(format: &str) -> String {
    match format {
        "tsv" => "boarding_sequence.txt".to_string(),
        "csv" => "boarding_details.csv".to_string(),
        "json" => "boarding_sequence.json".to_string(),
        "map" => "seat_map.txt".to_string(),
        other => format!("boarding_sequence.{}", other),
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "bus-boarding")]
#[command(about = "Compute a furthest-seat-first boarding order from a booking manifest")]
pub struct CliConfig {
    /// Booking manifest (.txt, .tsv or .csv)
    #[arg(short, long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Output formats: tsv, csv, json, map
    #[arg(long, value_delimiter = ',', default_value = "tsv")]
    pub formats: Vec<String>,

    #[arg(long, help = "Write all outputs into a single ZIP archive")]
    pub bundle: bool,

    #[arg(long, default_value = DEFAULT_BUNDLE_FILENAME)]
    pub bundle_name: String,

    #[arg(long, help = "Also print the boarding sequence table")]
    pub stdout: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory per stage")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn bundle_filename(&self) -> Option<String> {
        self.bundle.then(|| self.bundle_name.clone())
    }

    fn output_filename(&self, format: &str) -> String {
        default_filename(format)
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &MANIFEST_EXTENSIONS)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_output_formats("formats", &self.formats)?;
        if self.bundle {
            validation::validate_non_empty_string("bundle_name", &self.bundle_name)?;
        }
        Ok(())
    }
}
