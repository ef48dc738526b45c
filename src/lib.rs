#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Dataset builder facade tying schema, session, and streams together.
pub mod builder;
/// Builder configuration and verification modes.
pub mod config;
/// Record conversion against a translated schema.
pub mod convert;
/// Sentinel default values per feature.
pub mod defaults;
/// Internal dtypes and foreign dtype resolution.
pub mod dtype;
mod errors;
/// Foreign and internal schema trees.
pub mod features;
/// Ordered conversion pipelines and split filtering.
pub mod pipeline;
/// Metadata and materialization seams, with in-memory test doubles.
pub mod provider;
/// Foreign-to-internal schema translation.
pub mod schema;
/// Shared type aliases.
pub mod types;
/// Dynamic runtime values flowing through conversion.
pub mod value;

pub use builder::{DatasetBuilder, DatasetInfo};
pub use config::{BuilderConfig, HUB_TOKEN_ENV, VerificationMode};
pub use convert::convert_value;
pub use defaults::default_value;
pub use dtype::{Dtype, resolve_dtype};
pub use errors::ConvertError;
pub use features::{ClassLabel, Feature, ForeignFeature, ImageEncoding};
pub use pipeline::{ExampleStream, RecordStream, generate_examples, remove_empty_splits};
pub use provider::{
    ForeignDatasetInfo, InMemoryMaterializer, InMemoryProvider, Materializer, MetadataProvider,
};
pub use schema::translate_features;
pub use types::{ConfigName, DatasetId, FieldName, LanguageCode, SplitName};
pub use value::Value;
