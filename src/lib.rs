pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    engine::{BoardingEngine, RunReport},
    export::render_tsv,
    parser::parse,
    pipeline::BoardingPipeline,
    sequencer::sequence,
};
pub use crate::domain::model::{BoardingSequenceEntry, Booking};
pub use crate::utils::error::{BoardingError, Result};
