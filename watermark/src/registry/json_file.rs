//! JSON-file-backed registration ledger.
//!
//! Persists every record in a single JSON document: an array of entries
//! holding the hex image digest, the image path, and the ground-truth
//! matrix as a nested array of integers. Records are loaded once at
//! open time and written through on every mutation.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::RegistryConfig;
use crate::registry::{RegisteredWatermark, RegistryError, WatermarkRegistry};
use crate::types::{DIGEST_LEN, GroundTruth, ImageDigest};

/// On-disk layout of one ledger entry.
#[derive(Debug, Serialize, Deserialize)]
struct RecordDto {
    image_digest: String,
    image_path: String,
    watermark_matrix: Vec<Vec<i8>>,
}

impl From<&RegisteredWatermark> for RecordDto {
    fn from(record: &RegisteredWatermark) -> Self {
        RecordDto {
            image_digest: record.image_digest.to_hex(),
            image_path: record.image_path.clone(),
            watermark_matrix: record.ground_truth.to_nested(),
        }
    }
}

impl RecordDto {
    fn into_record(self) -> Result<RegisteredWatermark, RegistryError> {
        let bytes = hex::decode(&self.image_digest).map_err(|_| {
            RegistryError::CorruptedRecord(crate::error::WatermarkError::InvalidInput(
                "image digest is not valid hex".to_string(),
            ))
        })?;
        if bytes.len() != DIGEST_LEN {
            return Err(RegistryError::CorruptedRecord(
                crate::error::WatermarkError::InvalidInput(format!(
                    "image digest has {} bytes, expected {DIGEST_LEN}",
                    bytes.len()
                )),
            ));
        }
        let mut digest = [0u8; DIGEST_LEN];
        digest.copy_from_slice(&bytes);

        let ground_truth = GroundTruth::from_nested(self.watermark_matrix)
            .map_err(RegistryError::CorruptedRecord)?;

        Ok(RegisteredWatermark {
            image_digest: ImageDigest(digest),
            image_path: self.image_path,
            ground_truth,
        })
    }
}

/// JSON-file implementation of [`WatermarkRegistry`].
pub struct JsonFileRegistry {
    path: PathBuf,
    records: Vec<RegisteredWatermark>,
}

impl JsonFileRegistry {
    /// Opens (or starts) a ledger at the configured path.
    ///
    /// A missing file yields an empty ledger when `create_if_missing` is
    /// set and an error otherwise; the file itself is only created on
    /// the first write.
    pub fn open(cfg: &RegistryConfig) -> Result<Self, RegistryError> {
        let path = Path::new(&cfg.path).to_path_buf();

        let records = match fs::read(&path) {
            Ok(bytes) => {
                let dtos: Vec<RecordDto> = serde_json::from_slice(&bytes)?;
                dtos.into_iter()
                    .map(RecordDto::into_record)
                    .collect::<Result<_, _>>()?
            }
            Err(e) if e.kind() == ErrorKind::NotFound && cfg.create_if_missing => Vec::new(),
            Err(e) => return Err(RegistryError::Io(e)),
        };

        Ok(Self { path, records })
    }

    /// Number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<(), RegistryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let dtos: Vec<RecordDto> = self.records.iter().map(RecordDto::from).collect();
        let bytes = serde_json::to_vec_pretty(&dtos)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl WatermarkRegistry for JsonFileRegistry {
    fn register(&mut self, record: RegisteredWatermark) -> Result<(), RegistryError> {
        match self
            .records
            .iter_mut()
            .find(|r| r.image_digest == record.image_digest)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.persist()
    }

    fn get(&self, digest: &ImageDigest) -> Option<RegisteredWatermark> {
        self.records
            .iter()
            .find(|r| &r.image_digest == digest)
            .cloned()
    }

    fn retrieve_all(&self) -> Vec<RegisteredWatermark> {
        self.records.clone()
    }
}
