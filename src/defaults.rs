use indexmap::IndexMap;

use crate::errors::ConvertError;
use crate::features::Feature;
use crate::value::Value;

/// Synthesize the canonical placeholder value for a schema node.
///
/// The foreign side is loose about typing and freely emits nulls; this
/// placeholder stands in whenever source data is absent. Numeric leaves use
/// the minimal representable value of their width as a sentinel rather than
/// `0` or `-1`, since those may be legitimate data values — consumers must
/// treat the sentinel as a "missing" marker, not as guaranteed-absent.
pub fn default_value(feature: &Feature) -> Result<Value, ConvertError> {
    match feature {
        Feature::FeaturesDict(fields) => {
            let mut defaults = IndexMap::with_capacity(fields.len());
            for (name, child) in fields {
                defaults.insert(name.clone(), default_value(child)?);
            }
            Ok(Value::Map(defaults))
        }
        // A fixed-language translation is a record of byte-string leaves.
        Feature::Translation { languages } => {
            let mut defaults = IndexMap::with_capacity(languages.len());
            for language in languages {
                defaults.insert(language.clone(), Value::Bytes(Vec::new()));
            }
            Ok(Value::Map(defaults))
        }
        Feature::Sequence(_) | Feature::TranslationVariableLanguages { .. } => {
            Ok(Value::List(Vec::new()))
        }
        leaf => {
            let dtype = leaf.leaf_dtype().ok_or_else(|| ConvertError::DefaultValue {
                feature: leaf.kind().to_string(),
            })?;
            if dtype.is_string() {
                Ok(Value::Bytes(Vec::new()))
            } else if let Some(min) = dtype.integer_min() {
                Ok(Value::Int(min))
            } else if let Some(min) = dtype.float_min() {
                Ok(Value::Float(min))
            } else if dtype.is_bool() {
                Ok(Value::Bool(false))
            } else {
                Err(ConvertError::DefaultValue {
                    feature: format!("{}<{}>", leaf.kind(), dtype.name()),
                })
            }
        }
    }
}
