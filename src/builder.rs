use std::sync::{Arc, Mutex};

use indexmap::IndexMap;
use tracing::debug;

use crate::config::BuilderConfig;
use crate::errors::ConvertError;
use crate::features::Feature;
use crate::pipeline::{ExampleStream, generate_examples, remove_empty_splits};
use crate::provider::{Materializer, MetadataProvider};
use crate::schema::translate_features;
use crate::types::SplitName;

/// Dataset metadata with the schema already translated, produced once per
/// builder and handed to downstream schema/serialization writers.
#[derive(Clone, Debug)]
pub struct DatasetInfo {
    /// Free-form dataset description.
    pub description: String,
    /// Citation text.
    pub citation: String,
    /// License text.
    pub license: String,
    /// Foreign version string, when declared.
    pub version: Option<String>,
    /// Supervised `(input, output)` field pair; present only when the
    /// foreign metadata declares both sides.
    pub supervised_keys: Option<(String, String)>,
    /// Translated internal schema tree.
    pub features: Arc<Feature>,
}

/// Adapts one foreign dataset into converted, split-partitioned streams.
///
/// Expensive one-time work — fetching metadata, translating the schema,
/// authenticating — happens lazily on first use and is memoized for the
/// builder's lifetime; repeated access is idempotent and safe from multiple
/// split pipelines.
pub struct DatasetBuilder {
    provider: Arc<dyn MetadataProvider>,
    materializer: Arc<dyn Materializer>,
    config: BuilderConfig,
    info: Mutex<Option<Arc<DatasetInfo>>>,
    logged_in: Mutex<bool>,
}

impl DatasetBuilder {
    /// Create a builder over the given collaborators.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        materializer: Arc<dyn Materializer>,
        config: BuilderConfig,
    ) -> Self {
        Self {
            provider,
            materializer,
            config,
            info: Mutex::new(None),
            logged_in: Mutex::new(false),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// Dataset metadata with the translated schema, fetched and translated
    /// on first access, then cached.
    pub fn info(&self) -> Result<Arc<DatasetInfo>, ConvertError> {
        let mut memo = self
            .info
            .lock()
            .map_err(|_| ConvertError::Provider("dataset info lock poisoned".to_string()))?;
        if let Some(info) = memo.as_ref() {
            return Ok(Arc::clone(info));
        }

        let foreign = self.provider.dataset_info(
            &self.config.dataset_id,
            self.config.config_name.as_deref(),
        )?;
        let features = Arc::new(translate_features(&foreign.features)?);
        debug!(
            dataset_id = %self.config.dataset_id,
            "translated foreign schema"
        );
        let supervised_keys = match (foreign.supervised_input, foreign.supervised_output) {
            (Some(input), Some(output)) => Some((input, output)),
            _ => None,
        };
        let info = Arc::new(DatasetInfo {
            description: foreign.description,
            citation: foreign.citation,
            license: foreign.license,
            version: foreign.version,
            supervised_keys,
            features,
        });
        *memo = Some(Arc::clone(&info));
        Ok(info)
    }

    /// Translated internal schema tree.
    pub fn features(&self) -> Result<Arc<Feature>, ConvertError> {
        Ok(Arc::clone(&self.info()?.features))
    }

    /// Authenticate against the foreign host at most once.
    fn ensure_session(&self) -> Result<(), ConvertError> {
        let mut logged_in = self
            .logged_in
            .lock()
            .map_err(|_| ConvertError::Materializer("session lock poisoned".to_string()))?;
        if !*logged_in {
            self.materializer.login(self.config.auth_token.as_deref())?;
            *logged_in = true;
        }
        Ok(())
    }

    /// Materialize the dataset and return one converted example stream per
    /// non-empty split.
    ///
    /// The schema is translated before any example is read, so schema
    /// errors abort here without touching the materializer. Streams are
    /// lazy and single-pass: each pair is `(index, converted value)` with
    /// indices counting from 0 in original record order, and a conversion
    /// failure anywhere aborts that split's stream.
    pub fn split_examples(&self) -> Result<IndexMap<SplitName, ExampleStream>, ConvertError> {
        let features = self.features()?;
        self.ensure_session()?;
        let streams = self.materializer.materialize(
            &self.config.dataset_id,
            self.config.config_name.as_deref(),
            self.config.verification,
        )?;
        debug!(splits = streams.len(), "materialized foreign splits");

        let mut converted: IndexMap<SplitName, ExampleStream> =
            IndexMap::with_capacity(streams.len());
        for (split, records) in streams {
            converted.insert(
                split,
                generate_examples(
                    Arc::clone(&features),
                    records,
                    self.config.conversion_workers,
                ),
            );
        }
        remove_empty_splits(converted)
    }
}
