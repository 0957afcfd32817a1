pub mod engine;
pub mod export;
pub mod parser;
pub mod pipeline;
pub mod sequencer;

pub use crate::domain::model::{BoardingSequenceEntry, Booking, SequenceResult};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
