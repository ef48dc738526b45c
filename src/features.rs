use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Serialize;

use crate::dtype::Dtype;
use crate::errors::ConvertError;
use crate::types::{FieldName, LanguageCode};

/// A node in the foreign (loosely-typed) schema tree.
///
/// Values of this type are obtained from a metadata provider or parsed from
/// the foreign JSON encoding via [`ForeignFeature::from_json`]. They are
/// immutable once obtained.
#[derive(Clone, Debug, PartialEq)]
pub enum ForeignFeature {
    /// Named, ordered child features.
    Record(IndexMap<FieldName, ForeignFeature>),
    /// Explicit sequence wrapper around an inner feature.
    Sequence(Box<ForeignFeature>),
    /// Single-element-list encoding of a sequence.
    ///
    /// The foreign side encodes `[inner]` to mean "sequence of inner"; any
    /// other list length is rejected at translation time.
    List(Vec<ForeignFeature>),
    /// Scalar value with a named primitive type.
    Value {
        /// Foreign primitive type name, e.g. `int64` or `timestamp[s]`.
        dtype: String,
    },
    /// Label enumeration backed by names, a names file, or a class count.
    ClassLabel {
        /// Explicit label names, if given.
        names: Option<Vec<String>>,
        /// Reference to a file listing label names, if given.
        names_file: Option<PathBuf>,
        /// Explicit class count, if given.
        num_classes: Option<u64>,
    },
    /// Translation over a fixed language set.
    Translation {
        /// Languages present in every example.
        languages: Vec<LanguageCode>,
    },
    /// Translation where each example carries its own language subset.
    TranslationVariableLanguages {
        /// Optional full language inventory.
        languages: Option<Vec<LanguageCode>>,
    },
    /// Image value, in the source's native encoding.
    Image,
    /// Audio value.
    Audio {
        /// Sampling rate in Hz.
        sampling_rate: u32,
    },
}

impl ForeignFeature {
    /// Parse a foreign schema node from its JSON encoding.
    ///
    /// Tagged objects (`{"_type": "Value", "dtype": "int64"}`) map to their
    /// named variants; untagged objects are records; arrays are the
    /// single-element-list sequence encoding.
    pub fn from_json(value: &serde_json::Value) -> Result<ForeignFeature, ConvertError> {
        match value {
            serde_json::Value::Object(fields) => match fields.get("_type") {
                Some(tag) => Self::from_tagged_json(tag, fields),
                None => {
                    let mut children = IndexMap::new();
                    for (name, child) in fields {
                        children.insert(name.clone(), ForeignFeature::from_json(child)?);
                    }
                    Ok(ForeignFeature::Record(children))
                }
            },
            serde_json::Value::Array(items) => {
                let parsed = items
                    .iter()
                    .map(ForeignFeature::from_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ForeignFeature::List(parsed))
            }
            other => Err(ConvertError::UnsupportedFeature {
                path: String::new(),
                kind: json_kind(other).to_string(),
            }),
        }
    }

    fn from_tagged_json(
        tag: &serde_json::Value,
        fields: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ForeignFeature, ConvertError> {
        let tag = tag.as_str().unwrap_or_default();
        match tag {
            "Value" => {
                let dtype = fields
                    .get("dtype")
                    .and_then(|dtype| dtype.as_str())
                    .ok_or_else(|| ConvertError::UnsupportedFeature {
                        path: String::new(),
                        kind: "Value without dtype".to_string(),
                    })?;
                Ok(ForeignFeature::Value {
                    dtype: dtype.to_string(),
                })
            }
            "ClassLabel" => Ok(ForeignFeature::ClassLabel {
                names: string_list(fields.get("names")),
                names_file: fields
                    .get("names_file")
                    .and_then(|file| file.as_str())
                    .map(PathBuf::from),
                num_classes: fields.get("num_classes").and_then(|count| count.as_u64()),
            }),
            "Sequence" | "LargeList" => {
                let inner = fields
                    .get("feature")
                    .ok_or_else(|| ConvertError::UnsupportedFeature {
                        path: String::new(),
                        kind: format!("{tag} without inner feature"),
                    })?;
                Ok(ForeignFeature::Sequence(Box::new(ForeignFeature::from_json(
                    inner,
                )?)))
            }
            "Translation" => {
                let languages =
                    string_list(fields.get("languages")).ok_or_else(|| {
                        ConvertError::UnsupportedFeature {
                            path: String::new(),
                            kind: "Translation without languages".to_string(),
                        }
                    })?;
                Ok(ForeignFeature::Translation { languages })
            }
            "TranslationVariableLanguages" => Ok(ForeignFeature::TranslationVariableLanguages {
                languages: string_list(fields.get("languages")),
            }),
            "Image" => Ok(ForeignFeature::Image),
            "Audio" => {
                let sampling_rate = fields
                    .get("sampling_rate")
                    .and_then(|rate| rate.as_u64())
                    .ok_or_else(|| ConvertError::UnsupportedFeature {
                        path: String::new(),
                        kind: "Audio without sampling_rate".to_string(),
                    })?;
                Ok(ForeignFeature::Audio {
                    sampling_rate: sampling_rate as u32,
                })
            }
            other => Err(ConvertError::UnsupportedFeature {
                path: String::new(),
                kind: other.to_string(),
            }),
        }
    }

    /// Short variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ForeignFeature::Record(_) => "Record",
            ForeignFeature::Sequence(_) => "Sequence",
            ForeignFeature::List(_) => "List",
            ForeignFeature::Value { .. } => "Value",
            ForeignFeature::ClassLabel { .. } => "ClassLabel",
            ForeignFeature::Translation { .. } => "Translation",
            ForeignFeature::TranslationVariableLanguages { .. } => "TranslationVariableLanguages",
            ForeignFeature::Image => "Image",
            ForeignFeature::Audio { .. } => "Audio",
        }
    }
}

fn string_list(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(item.as_str()?.to_string());
    }
    Some(out)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Backing definition of a label enumeration.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassLabel {
    /// Labels enumerated by explicit names.
    Names(Vec<String>),
    /// Labels enumerated by a names file resolved downstream.
    NamesFile(PathBuf),
    /// Labels enumerated only by count.
    NumClasses(u64),
}

impl ClassLabel {
    /// Number of classes, when derivable without reading a names file.
    pub fn num_classes(&self) -> Option<u64> {
        match self {
            ClassLabel::Names(names) => Some(names.len() as u64),
            ClassLabel::NamesFile(_) => None,
            ClassLabel::NumClasses(count) => Some(*count),
        }
    }
}

/// Raster encoding applied to every converted image downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEncoding {
    /// Lossless PNG, irrespective of the source's native encoding.
    Png,
}

/// A node in the internal (strongly-typed) schema tree.
///
/// Built once per dataset configuration by schema translation and shared
/// for the lifetime of the builder.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Named, ordered child features.
    FeaturesDict(IndexMap<FieldName, Feature>),
    /// Variable-length sequence of an inner feature.
    Sequence(Box<Feature>),
    /// Scalar leaf.
    Scalar(Dtype),
    /// Label enumeration leaf.
    ClassLabel(ClassLabel),
    /// Translation leaf over a fixed language set.
    Translation {
        /// Languages present in every example.
        languages: Vec<LanguageCode>,
    },
    /// Translation leaf with per-example language subsets.
    TranslationVariableLanguages {
        /// Optional full language inventory.
        languages: Option<Vec<LanguageCode>>,
    },
    /// Image leaf.
    Image {
        /// Fixed internal raster encoding.
        encoding: ImageEncoding,
    },
    /// Audio leaf.
    Audio {
        /// Sampling rate in Hz, carried over from the foreign schema.
        sample_rate: u32,
    },
    /// Fixed-shape tensor leaf.
    ///
    /// Never produced by schema translation; constructed directly by
    /// downstream users that already know their shapes.
    Tensor {
        /// Element dtype.
        dtype: Dtype,
        /// Dimension sizes.
        shape: Vec<u64>,
    },
}

impl Feature {
    /// Element dtype of a leaf feature, `None` for structural nodes.
    ///
    /// Media leaves report the dtype of their converted representation:
    /// class labels and audio samples are `int64`, image pixels are `uint8`.
    pub fn leaf_dtype(&self) -> Option<Dtype> {
        match self {
            Feature::Scalar(dtype) => Some(*dtype),
            Feature::ClassLabel(_) => Some(Dtype::Int64),
            Feature::Audio { .. } => Some(Dtype::Int64),
            Feature::Image { .. } => Some(Dtype::UInt8),
            Feature::Tensor { dtype, .. } => Some(*dtype),
            Feature::FeaturesDict(_)
            | Feature::Sequence(_)
            | Feature::Translation { .. }
            | Feature::TranslationVariableLanguages { .. } => None,
        }
    }

    /// Row schema of a variable-language translation: each emitted row pairs
    /// a language code with its translated text.
    pub(crate) fn translation_row() -> Feature {
        let mut fields = IndexMap::new();
        fields.insert("language".to_string(), Feature::Scalar(Dtype::Bytes));
        fields.insert("translation".to_string(), Feature::Scalar(Dtype::Bytes));
        Feature::FeaturesDict(fields)
    }

    /// Short variant name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Feature::FeaturesDict(_) => "FeaturesDict",
            Feature::Sequence(_) => "Sequence",
            Feature::Scalar(_) => "Scalar",
            Feature::ClassLabel(_) => "ClassLabel",
            Feature::Translation { .. } => "Translation",
            Feature::TranslationVariableLanguages { .. } => "TranslationVariableLanguages",
            Feature::Image { .. } => "Image",
            Feature::Audio { .. } => "Audio",
            Feature::Tensor { .. } => "Tensor",
        }
    }
}
