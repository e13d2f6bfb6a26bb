//! On-disk artifacts for a processed transcription.
//!
//! Each run overwrites the same three files; concurrent runs against one
//! directory race and the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::PipelineError;
use crate::record::{ResultRecord, FALLBACK_PGN};

pub const FIXED_PGN_FILE: &str = "chess_game_fixed.pgn";
pub const FALLBACK_PGN_FILE: &str = "chess_game_fallback.pgn";
pub const RECORD_JSON_FILE: &str = "chess_game.json";

#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
}

/// Paths written by [`ArtifactStore::persist`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersistedArtifacts {
    pub fixed_pgn: PathBuf,
    pub fallback_pgn: PathBuf,
    pub record_json: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn fixed_pgn_path(&self) -> PathBuf {
        self.dir.join(FIXED_PGN_FILE)
    }

    pub fn fallback_pgn_path(&self) -> PathBuf {
        self.dir.join(FALLBACK_PGN_FILE)
    }

    pub fn record_json_path(&self) -> PathBuf {
        self.dir.join(RECORD_JSON_FILE)
    }

    /// Write the normalized PGN, the fallback PGN and the full record.
    pub fn persist(&self, record: &ResultRecord) -> Result<PersistedArtifacts, PipelineError> {
        fs::create_dir_all(&self.dir).map_err(|source| PipelineError::Artifact {
            path: self.dir.clone(),
            source,
        })?;

        let artifacts = PersistedArtifacts {
            fixed_pgn: self.fixed_pgn_path(),
            fallback_pgn: self.fallback_pgn_path(),
            record_json: self.record_json_path(),
        };

        write_file(&artifacts.fixed_pgn, &record.fixed_pgn)?;
        write_file(&artifacts.fallback_pgn, FALLBACK_PGN)?;
        write_file(&artifacts.record_json, &record.to_json_pretty()?)?;

        info!("JSON file saved as {}", artifacts.record_json.display());
        info!("Fixed PGN saved as {}", artifacts.fixed_pgn.display());
        info!("Fallback PGN saved as {}", artifacts.fallback_pgn.display());

        Ok(artifacts)
    }

    /// Read back the last persisted record, if any.
    pub fn load_record(&self) -> Result<Option<ResultRecord>, PipelineError> {
        let path = self.record_json_path();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(PipelineError::Artifact { path, source }),
        };
        Ok(Some(serde_json::from_str(&text)?))
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|source| PipelineError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}
