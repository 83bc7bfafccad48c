//! Save/load for simulation logs.
//!
//! Binary saves use bincode with a version field checked on load. A pretty
//! JSON export mirrors the in-memory log shape for external consumers
//! (charting, notebooks); no schema evolution is promised for either form.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;

use crate::engine::SimulationLog;
use crate::model::SyntaxModel;

/// Version number for the save format (increment when the format changes).
const SAVE_VERSION: u32 = 1;

/// Serializable snapshot of a completed run.
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    model: SyntaxModel,
    log: SimulationLog,
}

/// A run restored from a save.
#[derive(Debug)]
pub struct LoadedLog {
    pub model: SyntaxModel,
    pub log: SimulationLog,
}

/// Errors that can occur during save/load.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Bincode(#[from] Box<bincode::ErrorKind>),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Write a completed run (taxonomy plus log) to a writer.
pub fn save_log<W: Write>(
    writer: W,
    model: &SyntaxModel,
    log: &SimulationLog,
) -> Result<(), SaveError> {
    let data = SaveData {
        version: SAVE_VERSION,
        model: model.clone(),
        log: log.clone(),
    };
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Read a run back from a reader, checking the format version.
pub fn load_log<R: Read>(reader: R) -> Result<LoadedLog, SaveError> {
    let data: SaveData = bincode::deserialize_from(reader)?;
    if data.version != SAVE_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SAVE_VERSION,
            found: data.version,
        });
    }
    Ok(LoadedLog {
        model: data.model,
        log: data.log,
    })
}

/// Write the log as pretty JSON, nested arrays/objects mirroring the
/// in-memory shape.
pub fn export_log_json<W: Write>(writer: W, log: &SimulationLog) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, log)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Simulation;
    use crate::model::dql_syntax_model;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample_run() -> (SyntaxModel, SimulationLog) {
        let model = dql_syntax_model();
        let mut rng = StdRng::seed_from_u64(41);
        let log = Simulation::new(model.clone(), 4, 2).run(&mut rng).unwrap();
        (model, log)
    }

    #[test]
    fn save_load_roundtrip() {
        let (model, log) = sample_run();
        let mut buffer = Vec::new();
        save_log(&mut buffer, &model, &log).unwrap();

        let loaded = load_log(buffer.as_slice()).unwrap();
        assert_eq!(loaded.model, model);
        assert_eq!(loaded.log, log);
    }

    #[test]
    fn version_mismatch_rejected() {
        let (model, log) = sample_run();
        let data = SaveData {
            version: SAVE_VERSION + 1,
            model,
            log,
        };
        let bytes = bincode::serialize(&data).unwrap();
        let err = load_log(bytes.as_slice()).unwrap_err();
        assert!(matches!(
            err,
            SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                ..
            }
        ));
    }

    #[test]
    fn json_export_parses_back() {
        let (_, log) = sample_run();
        let mut buffer = Vec::new();
        export_log_json(&mut buffer, &log).unwrap();

        let back: SimulationLog = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn truncated_save_is_an_error() {
        let (model, log) = sample_run();
        let mut buffer = Vec::new();
        save_log(&mut buffer, &model, &log).unwrap();
        buffer.truncate(buffer.len() / 2);
        assert!(load_log(buffer.as_slice()).is_err());
    }
}
