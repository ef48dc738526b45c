/// Named partition of a dataset's examples.
/// Examples: `train`, `validation`, `test`
pub type SplitName = String;
/// Field name inside a record feature.
/// Examples: `id`, `label`, `tokens`
pub type FieldName = String;
/// Language code carried by translation features.
/// Examples: `en`, `de`, `fr`
pub type LanguageCode = String;
/// Identifier of a foreign dataset.
/// Example: `codeparrot/github-code`
pub type DatasetId = String;
/// Optional configuration name within a foreign dataset.
/// Example: `default`
pub type ConfigName = String;
