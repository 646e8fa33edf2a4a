//! In-memory registration ledger.
//!
//! Useful for unit tests and single-process wiring. Keeps all records in
//! a `HashMap` keyed by image digest.

use std::collections::HashMap;

use crate::registry::{RegisteredWatermark, RegistryError, WatermarkRegistry};
use crate::types::ImageDigest;

/// In-memory implementation of [`WatermarkRegistry`].
#[derive(Default)]
pub struct InMemoryRegistry {
    records: HashMap<ImageDigest, RegisteredWatermark>,
}

impl InMemoryRegistry {
    /// Creates a new, empty in-memory ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl WatermarkRegistry for InMemoryRegistry {
    fn register(&mut self, record: RegisteredWatermark) -> Result<(), RegistryError> {
        self.records.insert(record.image_digest, record);
        Ok(())
    }

    fn get(&self, digest: &ImageDigest) -> Option<RegisteredWatermark> {
        self.records.get(digest).cloned()
    }

    fn retrieve_all(&self) -> Vec<RegisteredWatermark> {
        self.records.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GroundTruth;
    use ndarray::arr2;

    fn dummy_record(tag: u8) -> RegisteredWatermark {
        RegisteredWatermark {
            image_digest: ImageDigest([tag; 32]),
            image_path: format!("images/{tag}.png"),
            ground_truth: GroundTruth(arr2(&[[tag as i8, 0], [0, -1]])),
        }
    }

    #[test]
    fn register_and_get_roundtrip() {
        let mut registry = InMemoryRegistry::new();
        let record = dummy_record(1);

        registry.register(record.clone()).unwrap();
        let fetched = registry.get(&record.image_digest).expect("record present");

        assert_eq!(fetched, record);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn reregistration_replaces_the_record() {
        let mut registry = InMemoryRegistry::new();
        let mut record = dummy_record(2);
        registry.register(record.clone()).unwrap();

        record.image_path = "images/renamed.png".to_string();
        registry.register(record.clone()).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(&record.image_digest).unwrap().image_path,
            "images/renamed.png"
        );
    }

    #[test]
    fn retrieve_all_returns_every_record() {
        let mut registry = InMemoryRegistry::new();
        registry.register(dummy_record(1)).unwrap();
        registry.register(dummy_record(2)).unwrap();

        assert_eq!(registry.retrieve_all().len(), 2);
    }
}
