use std::io;

use thiserror::Error;

/// Error type for schema translation, value conversion, and pipeline failures.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unrecognized foreign dtype '{dtype}'")]
    UnrecognizedDtype { dtype: String },
    #[error("unsupported foreign feature '{kind}' at '{path}'")]
    UnsupportedFeature { path: String, kind: String },
    #[error("list-encoded sequence at '{path}' must have exactly one element, found {len}")]
    SequenceArity { path: String, len: usize },
    #[error("class label at '{path}' defines no names, names file, or class count")]
    ClassLabelUnderspecified { path: String },
    #[error("no default value for feature {feature}")]
    DefaultValue { feature: String },
    #[error("cannot convert value {value} against feature {feature}")]
    UnsupportedValue { value: String, feature: String },
    #[error("audio value carries neither samples nor an existing file path: {details}")]
    MissingMedia { details: String },
    #[error("metadata provider failed: {0}")]
    Provider(String),
    #[error("materializer failed: {0}")]
    Materializer(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ConvertError {
    /// True for malformed or unrecognized foreign schema nodes.
    ///
    /// Dtype resolution failures are schema errors: they surface while a
    /// schema tree is being translated, before any example is read.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            ConvertError::UnrecognizedDtype { .. }
                | ConvertError::UnsupportedFeature { .. }
                | ConvertError::SequenceArity { .. }
                | ConvertError::ClassLabelUnderspecified { .. }
        )
    }

    /// True when a record could not be converted against its schema node.
    ///
    /// These are fatal for the whole split that produced the record.
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            ConvertError::DefaultValue { .. }
                | ConvertError::UnsupportedValue { .. }
                | ConvertError::MissingMedia { .. }
        )
    }
}
