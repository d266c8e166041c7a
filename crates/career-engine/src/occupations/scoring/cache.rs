use crate::occupations::domain::ExposureRecord;
use crate::occupations::report::{write_json, OutputError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, warn};

/// Resolved inputs an assessment was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentFingerprint {
    pub model_version: String,
    pub exposure: Option<ExposureRecord>,
    pub growth_percent: Option<f64>,
    pub epoch_sum: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct CacheEntry {
    fingerprint: AssessmentFingerprint,
    assessed_at: DateTime<Utc>,
}

/// Previous run's assessments, keyed by record key.
///
/// Only the audit timestamp is reused: the classification itself is always recomputed,
/// and a cached timestamp survives only while the resolved inputs are unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssessmentCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl AssessmentCache {
    /// An absent or unreadable cache yields an empty one.
    pub fn load(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no assessment cache");
                return Self::default();
            }
        };

        match serde_json::from_reader::<_, BTreeMap<String, CacheEntry>>(BufReader::new(file)) {
            Ok(entries) => Self { entries },
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring unreadable assessment cache");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached timestamp when the fingerprint matches, otherwise `now`.
    pub fn timestamp_for(
        &self,
        key: &str,
        fingerprint: &AssessmentFingerprint,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        self.entries
            .get(key)
            .filter(|entry| entry.fingerprint == *fingerprint)
            .map(|entry| entry.assessed_at)
            .unwrap_or(now)
    }

    pub fn record(
        &mut self,
        key: impl Into<String>,
        fingerprint: AssessmentFingerprint,
        assessed_at: DateTime<Utc>,
    ) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                fingerprint,
                assessed_at,
            },
        );
    }

    pub fn save(&self, path: &Path) -> Result<(), OutputError> {
        write_json(path, &self.entries)
    }
}
