use indexmap::IndexMap;
use serde_json::json;

use crosswalk::{
    Dtype, Feature, ForeignFeature, Value, convert_value, default_value, translate_features,
};

fn translate(declaration: serde_json::Value) -> Feature {
    let foreign = ForeignFeature::from_json(&declaration).unwrap();
    translate_features(&foreign).unwrap()
}

#[test]
fn null_converts_to_the_default_at_every_depth() {
    let schema = translate(json!({
        "text": {"_type": "Value", "dtype": "string"},
        "score": {"_type": "Value", "dtype": "float32"},
        "flags": {"_type": "Sequence", "feature": {"_type": "Value", "dtype": "bool"}},
        "nested": {
            "count": {"_type": "Value", "dtype": "uint8"},
        },
    }));

    // A null record and a record of nulls both land on the same tree of
    // sentinel defaults.
    let whole = convert_value(Value::Null, &schema).unwrap();
    assert_eq!(whole, default_value(&schema).unwrap());

    let per_field = convert_value(
        Value::Map(IndexMap::from_iter([
            ("text".to_string(), Value::Null),
            ("score".to_string(), Value::Null),
            ("flags".to_string(), Value::Null),
            ("nested".to_string(), Value::Null),
        ])),
        &schema,
    )
    .unwrap();
    assert_eq!(per_field, whole);

    let Value::Map(fields) = per_field else {
        panic!("expected record map");
    };
    assert_eq!(fields["text"], Value::Bytes(Vec::new()));
    assert_eq!(fields["score"], Value::Float(f32::MIN as f64));
    assert_eq!(fields["flags"], Value::List(Vec::new()));
    assert_eq!(
        fields["nested"],
        Value::Map(IndexMap::from_iter([(
            "count".to_string(),
            Value::Int(0),
        )]))
    );
}

#[test]
fn the_three_sequence_shapes_convert_identically_for_scalars() {
    let schema = translate(json!({
        "_type": "Sequence",
        "feature": {"_type": "Value", "dtype": "int32"},
    }));

    let from_list = convert_value(Value::List(vec![Value::Int(9)]), &schema).unwrap();
    let from_bare = convert_value(Value::Int(9), &schema).unwrap();
    assert_eq!(from_list, Value::List(vec![Value::Int(9)]));
    assert_eq!(from_bare, from_list);
}

#[test]
fn columnar_sequences_convert_each_column_against_its_field() {
    let schema = translate(json!({
        "_type": "Sequence",
        "feature": {
            "token": {"_type": "Value", "dtype": "string"},
            "seen_at": {"_type": "Value", "dtype": "timestamp[s]"},
        },
    }));

    let columnar = Value::Map(IndexMap::from_iter([
        (
            "token".to_string(),
            Value::List(vec![Value::from("hello"), Value::Null]),
        ),
        (
            "seen_at".to_string(),
            Value::List(vec![Value::Null, Value::Null]),
        ),
    ]));
    let converted = convert_value(columnar, &schema).unwrap();

    let Value::Map(columns) = converted else {
        panic!("expected columnar map");
    };
    assert_eq!(
        columns["token"],
        Value::List(vec![
            Value::Str("hello".to_string()),
            Value::Bytes(Vec::new()),
        ])
    );
    assert_eq!(
        columns["seen_at"],
        Value::List(vec![Value::Int(i64::MIN), Value::Int(i64::MIN)])
    );
}

#[test]
fn dtype_aliases_resolve_through_translation() {
    let schema = translate(json!({
        "flag": {"_type": "Value", "dtype": "bool"},
        "loss": {"_type": "Value", "dtype": "float"},
        "precise": {"_type": "Value", "dtype": "double"},
        "name": {"_type": "Value", "dtype": "large_string"},
        "when": {"_type": "Value", "dtype": "timestamp[us, tz=UTC]"},
        "tiny": {"_type": "Value", "dtype": "bfloat16"},
    }));

    let Feature::FeaturesDict(fields) = schema else {
        panic!("expected features dict");
    };
    assert_eq!(fields["flag"], Feature::Scalar(Dtype::Bool));
    assert_eq!(fields["loss"], Feature::Scalar(Dtype::Float32));
    assert_eq!(fields["precise"], Feature::Scalar(Dtype::Float64));
    assert_eq!(fields["name"], Feature::Scalar(Dtype::Bytes));
    assert_eq!(fields["when"], Feature::Scalar(Dtype::Int64));
    assert_eq!(fields["tiny"], Feature::Scalar(Dtype::BFloat16));
}

#[test]
fn translations_project_onto_the_declared_language_set() {
    let schema = translate(json!({
        "_type": "Translation",
        "languages": ["en", "fr"],
    }));

    let converted = convert_value(
        Value::Map(IndexMap::from_iter([
            ("fr".to_string(), Value::from("bonjour")),
            ("en".to_string(), Value::from("hello")),
            ("de".to_string(), Value::from("hallo")),
        ])),
        &schema,
    )
    .unwrap();

    // Output follows schema language order and ignores undeclared languages.
    let Value::Map(languages) = converted else {
        panic!("expected translation map");
    };
    let keys: Vec<_> = languages.keys().cloned().collect();
    assert_eq!(keys, ["en", "fr"]);
    assert_eq!(languages["en"], Value::Str("hello".to_string()));
}

#[test]
fn audio_samples_scale_by_the_declared_rate() {
    let schema = translate(json!({
        "_type": "Audio",
        "sampling_rate": 22050,
    }));

    let converted = convert_value(
        Value::Map(IndexMap::from_iter([(
            "array".to_string(),
            Value::List(vec![Value::Float(1.0), Value::Float(-0.5)]),
        )])),
        &schema,
    )
    .unwrap();
    assert_eq!(
        converted,
        Value::List(vec![Value::Int(22050), Value::Int(-11025)])
    );
}

#[test]
fn conversion_preserves_schema_field_order_not_record_order() {
    let schema = translate(json!({
        "first": {"_type": "Value", "dtype": "int64"},
        "second": {"_type": "Value", "dtype": "int64"},
    }));

    let converted = convert_value(
        Value::Map(IndexMap::from_iter([
            ("second".to_string(), Value::Int(2)),
            ("first".to_string(), Value::Int(1)),
        ])),
        &schema,
    )
    .unwrap();

    let Value::Map(fields) = converted else {
        panic!("expected record map");
    };
    let keys: Vec<_> = fields.keys().cloned().collect();
    assert_eq!(keys, ["first", "second"]);
}
