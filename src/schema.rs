use indexmap::IndexMap;

use crate::dtype::resolve_dtype;
use crate::errors::ConvertError;
use crate::features::{ClassLabel, Feature, ForeignFeature, ImageEncoding};

/// Translate a foreign schema tree into the internal schema tree.
///
/// The translation is a structural homomorphism: every record keeps its
/// field names and order, every sequence keeps its inner feature, and every
/// leaf maps onto exactly one internal leaf. Errors name the offending node
/// path.
pub fn translate_features(foreign: &ForeignFeature) -> Result<Feature, ConvertError> {
    translate_at(foreign, "")
}

fn translate_at(foreign: &ForeignFeature, path: &str) -> Result<Feature, ConvertError> {
    match foreign {
        ForeignFeature::Record(fields) => {
            let mut translated = IndexMap::with_capacity(fields.len());
            for (name, child) in fields {
                let child_path = join_path(path, name);
                translated.insert(name.clone(), translate_at(child, &child_path)?);
            }
            Ok(Feature::FeaturesDict(translated))
        }
        ForeignFeature::Sequence(inner) => {
            let inner_path = join_path(path, "[]");
            Ok(Feature::Sequence(Box::new(translate_at(inner, &inner_path)?)))
        }
        ForeignFeature::List(items) => {
            // The list encoding is shorthand for a sequence; any arity other
            // than one is ambiguous and rejected.
            if items.len() != 1 {
                return Err(ConvertError::SequenceArity {
                    path: display_path(path),
                    len: items.len(),
                });
            }
            let inner_path = join_path(path, "[]");
            Ok(Feature::Sequence(Box::new(translate_at(
                &items[0],
                &inner_path,
            )?)))
        }
        ForeignFeature::Value { dtype } => Ok(Feature::Scalar(resolve_dtype(dtype)?)),
        ForeignFeature::ClassLabel {
            names,
            names_file,
            num_classes,
        } => {
            if let Some(names) = names {
                Ok(Feature::ClassLabel(ClassLabel::Names(names.clone())))
            } else if let Some(names_file) = names_file {
                Ok(Feature::ClassLabel(ClassLabel::NamesFile(names_file.clone())))
            } else if let Some(num_classes) = num_classes {
                Ok(Feature::ClassLabel(ClassLabel::NumClasses(*num_classes)))
            } else {
                Err(ConvertError::ClassLabelUnderspecified {
                    path: display_path(path),
                })
            }
        }
        ForeignFeature::Translation { languages } => Ok(Feature::Translation {
            languages: languages.clone(),
        }),
        ForeignFeature::TranslationVariableLanguages { languages } => {
            Ok(Feature::TranslationVariableLanguages {
                languages: languages.clone(),
            })
        }
        ForeignFeature::Image => Ok(Feature::Image {
            encoding: ImageEncoding::Png,
        }),
        ForeignFeature::Audio { sampling_rate } => Ok(Feature::Audio {
            sample_rate: *sampling_rate,
        }),
    }
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}/{segment}")
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.to_string()
    }
}
