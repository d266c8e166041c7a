use super::normalizer::normalize_key;
use serde_json::{Map, Number, Value};
use std::io::Read;

/// One keyed, still-untyped entry of a dataset document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawEntry {
    pub(crate) key: String,
    pub(crate) value: Value,
}

#[derive(Debug, Default)]
pub(crate) struct ParsedDocument {
    pub(crate) entries: Vec<RawEntry>,
    /// Entries dropped because no join key could be found.
    pub(crate) unkeyed: usize,
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum ParseError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("expected a JSON object keyed by code or an array of objects")]
    UnsupportedShape,
}

/// Accepts either `{ "<key>": {...}, ... }` or `[ { "<key field>": "...", ... }, ... ]`.
///
/// Object-shaped documents get their key written back into each entry under the first
/// key field so records that carry their own key deserialize the same way in both shapes.
pub(crate) fn parse_json<R: Read>(
    reader: R,
    key_fields: &[&str],
) -> Result<ParsedDocument, ParseError> {
    let document: Value = serde_json::from_reader(reader)?;

    match document {
        Value::Object(map) => {
            let entries = map
                .into_iter()
                .map(|(key, mut value)| {
                    let key = normalize_key(&key);
                    if let (Value::Object(fields), Some(field)) = (&mut value, key_fields.first()) {
                        fields
                            .entry(field.to_string())
                            .or_insert_with(|| Value::String(key.clone()));
                    }
                    RawEntry { key, value }
                })
                .collect();
            Ok(ParsedDocument {
                entries,
                unkeyed: 0,
            })
        }
        Value::Array(items) => Ok(collect_keyed(items, key_fields)),
        _ => Err(ParseError::UnsupportedShape),
    }
}

/// Reads a headed CSV file; numeric cells become JSON numbers and blank cells become null.
pub(crate) fn parse_csv<R: Read>(
    reader: R,
    key_fields: &[&str],
) -> Result<ParsedDocument, ParseError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| normalize_key(header).to_ascii_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), cell_value(cell)))
            .collect();
        rows.push(Value::Object(fields));
    }

    Ok(collect_keyed(rows, key_fields))
}

fn collect_keyed(items: Vec<Value>, key_fields: &[&str]) -> ParsedDocument {
    let mut parsed = ParsedDocument::default();

    for value in items {
        match key_of(&value, key_fields) {
            Some(key) => parsed.entries.push(RawEntry { key, value }),
            None => parsed.unkeyed += 1,
        }
    }

    parsed
}

fn key_of(value: &Value, key_fields: &[&str]) -> Option<String> {
    let fields = value.as_object()?;
    key_fields
        .iter()
        .filter_map(|field| fields.get(*field).and_then(Value::as_str))
        .map(normalize_key)
        .find(|key| !key.is_empty())
}

fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }

    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
