//! Post-processing for model-transcribed chess scoresheets.
//!
//! Takes the free-text PGN a vision model produced for a scoresheet photo and
//! turns it into headers, a corrected transcript, and a legality verdict.

pub mod artifacts;
pub mod error;
pub mod game_data;
pub mod notation;
pub mod pgn;
pub mod pipeline;
pub mod record;
pub mod validate;

pub use artifacts::ArtifactStore;
pub use error::PipelineError;
pub use game_data::{GameHeaders, ValidationVerdict, UNKNOWN};
pub use notation::NotationTable;
pub use pipeline::Pipeline;
pub use record::ResultRecord;
