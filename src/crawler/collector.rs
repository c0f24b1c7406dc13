//! Accumulation of extracted descriptors across intercepted responses.
//!
//! Response events fire concurrently with navigation and may be processed out
//! of network-arrival order; accumulation into a set keyed by `(id, name)`
//! makes processing order immaterial to the final result.

use std::collections::HashSet;

use serde_json::Value;

use super::extract::{FileDescriptor, descriptor_from_record, record_array};

/// Collects deduplicated file descriptors from observed JSON bodies, capped
/// at a fixed number of entries in first-seen order.
#[derive(Debug)]
pub struct FileCollector {
    cap: usize,
    seen: HashSet<(String, String)>,
    files: Vec<FileDescriptor>,
}

impl FileCollector {
    /// Creates an empty collector that keeps at most `cap` descriptors.
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            seen: HashSet::new(),
            files: Vec::new(),
        }
    }

    /// Extracts every file record from a decoded JSON body and accumulates
    /// the new ones. Returns the number of descriptors actually added.
    ///
    /// Bodies matching no known shape contribute nothing; re-polled
    /// duplicate records (same `(id, name)`) are ignored.
    pub fn ingest(&mut self, body: &Value) -> usize {
        let Some(records) = record_array(body) else {
            return 0;
        };

        let mut added = 0;
        for record in records {
            if let Some(descriptor) = descriptor_from_record(record) && self.push(descriptor) {
                added += 1;
            }
        }
        added
    }

    /// Adds a descriptor unless its dedup key was already seen or the cap is
    /// reached. Returns whether the descriptor was kept.
    pub fn push(&mut self, descriptor: FileDescriptor) -> bool {
        if !self.seen.insert(descriptor.dedup_key()) {
            return false;
        }
        if self.files.len() >= self.cap {
            return false;
        }
        self.files.push(descriptor);
        true
    }

    /// Number of descriptors collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Consumes the collector, returning descriptors in first-seen order.
    #[must_use]
    pub fn into_files(self) -> Vec<FileDescriptor> {
        self.files
    }

    /// Takes the collected descriptors out of a shared collector, leaving it
    /// empty. Used when the collector sits behind a lock shared with a
    /// still-registered response handler.
    pub fn take_files(&mut self) -> Vec<FileDescriptor> {
        std::mem::take(&mut self.files)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ingest_same_body_twice_is_idempotent() {
        let body = json!({"list": [
            {"name": "a.txt", "fs_id": 1},
            {"name": "b.txt", "fs_id": 2}
        ]});
        let mut collector = FileCollector::new(200);
        assert_eq!(collector.ingest(&body), 2);
        assert_eq!(collector.ingest(&body), 0);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_ingest_same_name_different_id_kept_separately() {
        let body = json!({"list": [
            {"name": "a.txt", "fs_id": 1},
            {"name": "a.txt", "fs_id": 2}
        ]});
        let mut collector = FileCollector::new(200);
        assert_eq!(collector.ingest(&body), 2);
    }

    #[test]
    fn test_ingest_unknown_shape_contributes_nothing() {
        let mut collector = FileCollector::new(200);
        assert_eq!(collector.ingest(&json!({"entries": [{"name": "x"}]})), 0);
        assert!(collector.is_empty());
    }

    #[test]
    fn test_cap_enforced_in_first_seen_order() {
        let mut collector = FileCollector::new(200);
        for batch in 0..5 {
            let records: Vec<_> = (0..100)
                .map(|i| json!({"name": format!("file-{}.bin", batch * 100 + i), "fs_id": batch * 100 + i}))
                .collect();
            collector.ingest(&json!({"list": records}));
        }
        let files = collector.into_files();
        assert_eq!(files.len(), 200, "500 unique records must cap at 200");
        assert_eq!(files[0].name, "file-0.bin");
        assert_eq!(files[199].name, "file-199.bin");
    }

    #[test]
    fn test_push_past_cap_rejected() {
        let mut collector = FileCollector::new(1);
        let first = FileDescriptor {
            id: "1".to_string(),
            name: "a".to_string(),
            size: None,
            direct_url: None,
        };
        let second = FileDescriptor {
            id: "2".to_string(),
            name: "b".to_string(),
            size: None,
            direct_url: None,
        };
        assert!(collector.push(first));
        assert!(!collector.push(second));
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn test_ingest_order_independent_result() {
        let first = json!({"list": [{"name": "a", "fs_id": 1}]});
        let second = json!({"list": [{"name": "b", "fs_id": 2}, {"name": "a", "fs_id": 1}]});

        let mut forward = FileCollector::new(200);
        forward.ingest(&first);
        forward.ingest(&second);

        let mut reverse = FileCollector::new(200);
        reverse.ingest(&second);
        reverse.ingest(&first);

        let forward_keys: HashSet<_> = forward
            .into_files()
            .iter()
            .map(FileDescriptor::dedup_key)
            .collect();
        let reverse_keys: HashSet<_> = reverse
            .into_files()
            .iter()
            .map(FileDescriptor::dedup_key)
            .collect();
        assert_eq!(forward_keys, reverse_keys);
    }
}
