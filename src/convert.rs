use std::path::PathBuf;

use image::DynamicImage;
use indexmap::IndexMap;

use crate::defaults::default_value;
use crate::dtype::Dtype;
use crate::errors::ConvertError;
use crate::features::Feature;
use crate::value::Value;

/// Rewrite one foreign value to conform to its internal schema node.
///
/// Two rules take precedence over every variant-specific rule:
/// - a null foreign value yields the node's synthesized default, whatever
///   the node kind;
/// - a date/time foreign value yields its epoch-second count, whatever the
///   leaf kind.
///
/// Scalar, label, and tensor leaves pass values through untouched — the
/// foreign side is trusted to be dtype-conformant there. Structural nodes
/// recurse; media leaves apply their specific transforms (see the audio and
/// image rules below). Anything else fails with an unsupported-conversion
/// error naming both the runtime value and the schema node.
pub fn convert_value(value: Value, feature: &Feature) -> Result<Value, ConvertError> {
    match value {
        Value::Null => return default_value(feature),
        Value::DateTime(instant) => return Ok(Value::Int(instant.timestamp())),
        _ => {}
    }

    match feature {
        Feature::ClassLabel(_) | Feature::Scalar(_) | Feature::Tensor { .. } => Ok(value),
        Feature::FeaturesDict(fields) => match value {
            Value::Map(mut map) => {
                let mut converted = IndexMap::with_capacity(fields.len());
                for (name, child) in fields {
                    // An absent key counts as null and falls back to the
                    // child's default.
                    let field_value = map.swap_remove(name).unwrap_or(Value::Null);
                    converted.insert(name.clone(), convert_value(field_value, child)?);
                }
                Ok(Value::Map(converted))
            }
            other => Err(unsupported(&other, feature)),
        },
        Feature::Translation { languages } => match value {
            Value::Map(mut map) => {
                let text = Feature::Scalar(Dtype::Bytes);
                let mut converted = IndexMap::with_capacity(languages.len());
                for language in languages {
                    let entry = map.swap_remove(language).unwrap_or(Value::Null);
                    converted.insert(language.clone(), convert_value(entry, &text)?);
                }
                Ok(Value::Map(converted))
            }
            other => Err(unsupported(&other, feature)),
        },
        Feature::Sequence(inner) => convert_sequence(value, inner),
        Feature::TranslationVariableLanguages { .. } => {
            convert_sequence(value, &Feature::translation_row())
        }
        Feature::Audio { sample_rate } => convert_audio(value, *sample_rate, feature),
        Feature::Image { .. } => match value {
            Value::Image(image) => Ok(Value::Image(DynamicImage::ImageRgb8(image.into_rgb8()))),
            other => Err(unsupported(&other, feature)),
        },
    }
}

/// Sequences tolerate three foreign shapes: a named map of parallel
/// sequences (columnar form, only when the inner feature is a record), an
/// ordered sequence, or a bare scalar that gets wrapped as a one-element
/// sequence.
fn convert_sequence(value: Value, inner: &Feature) -> Result<Value, ConvertError> {
    match value {
        Value::Map(mut columns) => {
            let Feature::FeaturesDict(fields) = inner else {
                return Err(ConvertError::UnsupportedValue {
                    value: Value::Map(columns).summary(),
                    feature: format!("Sequence<{}>", feature_summary(inner)),
                });
            };
            let mut converted = IndexMap::with_capacity(fields.len());
            for (name, child) in fields {
                let column =
                    columns
                        .swap_remove(name)
                        .ok_or_else(|| ConvertError::UnsupportedValue {
                            value: format!("columnar map missing '{name}'"),
                            feature: format!("Sequence<{}>", feature_summary(inner)),
                        })?;
                let Value::List(items) = column else {
                    return Err(ConvertError::UnsupportedValue {
                        value: column.summary(),
                        feature: format!("Sequence column '{name}'"),
                    });
                };
                let items = items
                    .into_iter()
                    .map(|item| convert_value(item, child))
                    .collect::<Result<Vec<_>, _>>()?;
                converted.insert(name.clone(), Value::List(items));
            }
            Ok(Value::Map(converted))
        }
        Value::List(items) => {
            let items = items
                .into_iter()
                .map(|item| convert_value(item, inner))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::List(items))
        }
        // Producers may omit the wrapping list for cardinality one.
        single => Ok(Value::List(vec![convert_value(single, inner)?])),
    }
}

/// Audio arrives as a map carrying an in-memory sample array and/or a file
/// path. Samples are assumed normalized to [-1, 1] and are scaled by the
/// sampling rate, truncated to integers — a unit-mixing transform kept
/// intact for compatibility with existing converted datasets. An empty
/// sample array counts as absent and falls through to the path branch.
fn convert_audio(value: Value, sample_rate: u32, feature: &Feature) -> Result<Value, ConvertError> {
    let Value::Map(mut map) = value else {
        return Err(unsupported(&value, feature));
    };

    if let Some(Value::List(samples)) = map.swap_remove("array")
        && !samples.is_empty()
    {
        let mut converted = Vec::with_capacity(samples.len());
        for sample in samples {
            let amplitude = sample.as_f64().ok_or_else(|| ConvertError::UnsupportedValue {
                value: sample.summary(),
                feature: "Audio sample".to_string(),
            })?;
            converted.push(Value::Int((amplitude * sample_rate as f64) as i64));
        }
        return Ok(Value::List(converted));
    }

    let path = match map.swap_remove("path") {
        Some(Value::Str(path)) if !path.is_empty() => Some(PathBuf::from(path)),
        Some(Value::Path(path)) => Some(path),
        _ => None,
    };
    if let Some(path) = path {
        if path.exists() {
            return Ok(Value::Path(path));
        }
        return Err(ConvertError::MissingMedia {
            details: format!("audio path '{}' does not exist", path.display()),
        });
    }

    Err(ConvertError::MissingMedia {
        details: "audio value has neither a sample array nor a path".to_string(),
    })
}

fn unsupported(value: &Value, feature: &Feature) -> ConvertError {
    ConvertError::UnsupportedValue {
        value: value.summary(),
        feature: feature_summary(feature),
    }
}

fn feature_summary(feature: &Feature) -> String {
    match feature {
        Feature::Scalar(dtype) => format!("Scalar<{}>", dtype.name()),
        Feature::Tensor { dtype, .. } => format!("Tensor<{}>", dtype.name()),
        Feature::Audio { sample_rate } => format!("Audio<{sample_rate}Hz>"),
        other => other.kind().to_string(),
    }
}
