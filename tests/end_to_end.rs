use std::sync::Arc;

use chrono::{TimeZone, Utc};
use indexmap::IndexMap;
use serde_json::json;

use crosswalk::{
    BuilderConfig, DatasetBuilder, ForeignDatasetInfo, ForeignFeature, InMemoryMaterializer,
    InMemoryProvider, Materializer, MetadataProvider, SplitName, Value,
};

fn review_features() -> ForeignFeature {
    ForeignFeature::from_json(&json!({
        "id": {"_type": "Value", "dtype": "int64"},
        "label": {"_type": "ClassLabel", "names": ["negative", "positive"]},
        "tags": {"_type": "Sequence", "feature": {"_type": "Value", "dtype": "string"}},
        "posted_at": {"_type": "Value", "dtype": "timestamp[s]"},
    }))
    .unwrap()
}

fn review_info() -> ForeignDatasetInfo {
    ForeignDatasetInfo {
        features: review_features(),
        description: "product reviews".to_string(),
        citation: "@misc{reviews}".to_string(),
        license: "cc-by-4.0".to_string(),
        supervised_input: Some("tags".to_string()),
        supervised_output: Some("label".to_string()),
        version: Some("1.0.0".to_string()),
    }
}

fn review_builder(
    splits: IndexMap<SplitName, Vec<Value>>,
    config: BuilderConfig,
) -> DatasetBuilder {
    let provider = Arc::new(InMemoryProvider::new(review_info())) as Arc<dyn MetadataProvider>;
    let materializer = Arc::new(InMemoryMaterializer::new(splits)) as Arc<dyn Materializer>;
    DatasetBuilder::new(provider, materializer, config)
}

fn review_record(id: i64, label: &str, tags: &[&str]) -> Value {
    let mut record = IndexMap::new();
    record.insert("id".to_string(), Value::Int(id));
    record.insert("label".to_string(), Value::Str(label.to_string()));
    record.insert(
        "tags".to_string(),
        Value::List(tags.iter().map(|tag| Value::from(*tag)).collect()),
    );
    record.insert(
        "posted_at".to_string(),
        Value::DateTime(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()),
    );
    Value::Map(record)
}

#[test]
fn builder_streams_converted_examples_in_order() {
    let mut splits = IndexMap::new();
    splits.insert(
        "train".to_string(),
        vec![
            review_record(1, "positive", &["cheap", "fast"]),
            review_record(2, "negative", &["slow"]),
        ],
    );
    let builder = review_builder(splits, BuilderConfig::new("acme/reviews"));

    let mut streams = builder.split_examples().unwrap();
    assert_eq!(streams.len(), 1);
    let examples: Vec<_> = streams
        .swap_remove("train")
        .unwrap()
        .map(Result::unwrap)
        .collect();

    let epoch = Utc
        .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .unwrap()
        .timestamp();
    let expected_first = Value::Map(IndexMap::from_iter([
        ("id".to_string(), Value::Int(1)),
        ("label".to_string(), Value::Str("positive".to_string())),
        (
            "tags".to_string(),
            Value::List(vec![Value::from("cheap"), Value::from("fast")]),
        ),
        ("posted_at".to_string(), Value::Int(epoch)),
    ]));
    assert_eq!(examples[0], (0, expected_first));
    assert_eq!(examples[1].0, 1);

    let Value::Map(second) = &examples[1].1 else {
        panic!("expected record map");
    };
    assert_eq!(second["id"], Value::Int(2));
    assert_eq!(second["tags"], Value::List(vec![Value::from("slow")]));
}

#[test]
fn missing_fields_fall_back_to_sentinel_defaults() {
    let mut splits = IndexMap::new();
    splits.insert(
        "train".to_string(),
        vec![Value::from(json!({"id": 7}))],
    );
    let builder = review_builder(splits, BuilderConfig::new("acme/reviews"));

    let mut streams = builder.split_examples().unwrap();
    let (_, record) = streams
        .swap_remove("train")
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    let Value::Map(fields) = record else {
        panic!("expected record map");
    };
    assert_eq!(fields["id"], Value::Int(7));
    assert_eq!(fields["label"], Value::Int(i64::MIN));
    assert_eq!(fields["tags"], Value::List(Vec::new()));
    assert_eq!(fields["posted_at"], Value::Int(i64::MIN));
}

#[test]
fn empty_splits_are_dropped_from_the_result() {
    let mut splits = IndexMap::new();
    splits.insert("train".to_string(), Vec::new());
    splits.insert(
        "validation".to_string(),
        vec![review_record(1, "negative", &[])],
    );
    splits.insert("test".to_string(), Vec::new());
    let builder = review_builder(splits, BuilderConfig::new("acme/reviews"));

    let streams = builder.split_examples().unwrap();
    let names: Vec<_> = streams.keys().cloned().collect();
    assert_eq!(names, ["validation"]);
}

#[test]
fn parallel_conversion_preserves_record_order() {
    let records: Vec<Value> = (0..97)
        .map(|id| review_record(id, if id % 2 == 0 { "positive" } else { "negative" }, &[]))
        .collect();
    let mut splits = IndexMap::new();
    splits.insert("train".to_string(), records);

    let builder = review_builder(
        splits,
        BuilderConfig::new("acme/reviews").with_conversion_workers(4),
    );

    let mut streams = builder.split_examples().unwrap();
    let examples: Vec<_> = streams
        .swap_remove("train")
        .unwrap()
        .map(Result::unwrap)
        .collect();
    assert_eq!(examples.len(), 97);
    for (position, (index, record)) in examples.into_iter().enumerate() {
        assert_eq!(index, position as u64);
        let Value::Map(fields) = record else {
            panic!("expected record map");
        };
        assert_eq!(fields["id"], Value::Int(position as i64));
    }
}

#[test]
fn conversion_failure_surfaces_as_stream_error() {
    let mut splits = IndexMap::new();
    splits.insert(
        "train".to_string(),
        vec![review_record(0, "positive", &[]), Value::Int(5)],
    );
    let builder = review_builder(splits, BuilderConfig::new("acme/reviews"));

    let mut stream = builder
        .split_examples()
        .unwrap()
        .swap_remove("train")
        .unwrap();
    assert!(stream.next().unwrap().is_ok());
    let err = stream.next().unwrap().unwrap_err();
    assert!(err.is_conversion_error());
    assert!(stream.next().is_none());
}
