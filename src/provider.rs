use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;

use crate::config::VerificationMode;
use crate::errors::ConvertError;
use crate::features::ForeignFeature;
use crate::pipeline::RecordStream;
use crate::types::SplitName;
use crate::value::Value;

/// Metadata returned by a foreign metadata provider.
#[derive(Clone, Debug)]
pub struct ForeignDatasetInfo {
    /// Foreign schema tree.
    pub features: ForeignFeature,
    /// Free-form dataset description.
    pub description: String,
    /// Citation text.
    pub citation: String,
    /// License text.
    pub license: String,
    /// Input field of the supervised key pair, when declared.
    pub supervised_input: Option<String>,
    /// Output field of the supervised key pair, when declared.
    pub supervised_output: Option<String>,
    /// Foreign version string, when declared.
    pub version: Option<String>,
}

/// Collaborator that fetches foreign dataset metadata.
///
/// Implementations own networking, caching, and registry lookup; this crate
/// only consumes the returned schema and descriptive text.
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for `dataset_id`, optionally scoped to a configuration.
    fn dataset_info(
        &self,
        dataset_id: &str,
        config_name: Option<&str>,
    ) -> Result<ForeignDatasetInfo, ConvertError>;
}

/// Collaborator that fetches and validates foreign example data.
pub trait Materializer: Send + Sync {
    /// Authenticate against the foreign host.
    ///
    /// Called at most once per builder instance, lazily, before the first
    /// materialization. Implementations must be idempotent: repeated calls
    /// with the same token must not duplicate side effects.
    fn login(&self, token: Option<&str>) -> Result<(), ConvertError> {
        let _ = token;
        Ok(())
    }

    /// Fetch the dataset and return one single-pass record stream per split.
    fn materialize(
        &self,
        dataset_id: &str,
        config_name: Option<&str>,
        verification: VerificationMode,
    ) -> Result<IndexMap<SplitName, RecordStream>, ConvertError>;
}

/// In-memory metadata provider for tests and pre-fetched datasets.
pub struct InMemoryProvider {
    info: ForeignDatasetInfo,
    calls: AtomicUsize,
}

impl InMemoryProvider {
    /// Create a provider that always returns `info`.
    pub fn new(info: ForeignDatasetInfo) -> Self {
        Self {
            info,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `dataset_info` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MetadataProvider for InMemoryProvider {
    fn dataset_info(
        &self,
        _dataset_id: &str,
        _config_name: Option<&str>,
    ) -> Result<ForeignDatasetInfo, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.info.clone())
    }
}

/// In-memory materializer for tests and pre-fetched datasets.
pub struct InMemoryMaterializer {
    splits: Mutex<IndexMap<SplitName, Vec<Value>>>,
    logins: AtomicUsize,
    materializations: AtomicUsize,
}

impl InMemoryMaterializer {
    /// Create a materializer serving the given per-split records.
    pub fn new(splits: IndexMap<SplitName, Vec<Value>>) -> Self {
        Self {
            splits: Mutex::new(splits),
            logins: AtomicUsize::new(0),
            materializations: AtomicUsize::new(0),
        }
    }

    /// Number of login calls observed so far.
    pub fn login_count(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    /// Number of materialize calls observed so far.
    pub fn materialize_count(&self) -> usize {
        self.materializations.load(Ordering::SeqCst)
    }
}

impl Materializer for InMemoryMaterializer {
    fn login(&self, _token: Option<&str>) -> Result<(), ConvertError> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn materialize(
        &self,
        _dataset_id: &str,
        _config_name: Option<&str>,
        _verification: VerificationMode,
    ) -> Result<IndexMap<SplitName, RecordStream>, ConvertError> {
        self.materializations.fetch_add(1, Ordering::SeqCst);
        let splits = self
            .splits
            .lock()
            .map_err(|_| ConvertError::Materializer("split table lock poisoned".to_string()))?;
        let mut streams: IndexMap<SplitName, RecordStream> = IndexMap::with_capacity(splits.len());
        for (split, records) in splits.iter() {
            let records = records.clone();
            streams.insert(split.clone(), Box::new(records.into_iter()) as RecordStream);
        }
        Ok(streams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_info() -> ForeignDatasetInfo {
        ForeignDatasetInfo {
            features: ForeignFeature::Value {
                dtype: "int64".to_string(),
            },
            description: "sample".to_string(),
            citation: String::new(),
            license: "mit".to_string(),
            supervised_input: None,
            supervised_output: None,
            version: Some("1.0.0".to_string()),
        }
    }

    #[test]
    fn in_memory_provider_counts_calls() {
        let provider = InMemoryProvider::new(sample_info());
        assert_eq!(provider.call_count(), 0);
        provider.dataset_info("any", None).unwrap();
        provider.dataset_info("any", Some("cfg")).unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn in_memory_materializer_serves_fresh_streams_per_call() {
        let mut splits = IndexMap::new();
        splits.insert("train".to_string(), vec![Value::Int(1), Value::Int(2)]);
        let materializer = InMemoryMaterializer::new(splits);

        for _ in 0..2 {
            let mut streams = materializer
                .materialize("any", None, VerificationMode::NoChecks)
                .unwrap();
            let collected: Vec<_> = streams.swap_remove("train").unwrap().collect();
            assert_eq!(collected, vec![Value::Int(1), Value::Int(2)]);
        }
        assert_eq!(materializer.materialize_count(), 2);
    }
}
