//! Transcription → record driver.

use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::error::PipelineError;
use crate::notation::NotationTable;
use crate::pgn::extract_pgn_details;
use crate::record::ResultRecord;
use crate::validate::validate_moves;

#[derive(Clone, Debug)]
pub struct Pipeline {
    table: NotationTable,
    store: ArtifactStore,
}

impl Pipeline {
    pub fn new(table: NotationTable, store: ArtifactStore) -> Self {
        Self { table, store }
    }

    pub fn table(&self) -> NotationTable {
        self.table
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Build the record for a transcription and persist its artifacts.
    ///
    /// Blank input is rejected before anything runs or is written.
    pub fn process(&self, transcription: &str) -> Result<ResultRecord, PipelineError> {
        let record = self.assemble(transcription)?;
        self.store.persist(&record)?;
        Ok(record)
    }

    /// Same as [`Pipeline::process`] without touching the artifact store.
    pub fn assemble(&self, transcription: &str) -> Result<ResultRecord, PipelineError> {
        if transcription.trim().is_empty() {
            return Err(PipelineError::UpstreamEmpty);
        }

        let (details, moves) = extract_pgn_details(transcription);
        let missing = details.missing();
        if !missing.is_empty() {
            info!(?missing, "Headers defaulted to Unknown");
        }

        let fixed = self.table.apply(transcription);

        // Raw movetext: the legacy table rewrites move numbers such as `43.`.
        let verdict = validate_moves(&moves);
        if !verdict.is_valid {
            warn!(table = self.table.name(), "{}", verdict.message);
        }

        Ok(ResultRecord::assemble(transcription, fixed, details, verdict))
    }
}
