// Deserialization helpers for backend fields that arrive as either JSON
// strings or numbers.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Loose {
    fn into_string(self) -> String {
        match self {
            Loose::Text(s) => s,
            Loose::Int(n) => n.to_string(),
            Loose::Float(f) => f.to_string(),
            Loose::Bool(b) => b.to_string(),
        }
    }
}

pub fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.into_string())
}

pub fn opt_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Loose>::deserialize(deserializer)?.map(Loose::into_string))
}

/// Non-negative integer from a number or numeric string; anything else is 0
pub fn opt_loose_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Loose>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        Loose::Int(n) => n.clamp(0, u32::MAX as i64) as u32,
        Loose::Float(f) if f.is_finite() && f > 0.0 => f.min(u32::MAX as f64) as u32,
        Loose::Text(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }))
}

/// A list given either as a JSON array or as one comma-separated string
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(joined)) => joined
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    })
}

/// Ids go back out as numbers when the backend handed us numbers. Only
/// canonical integers qualify, so "007" stays a string.
pub fn id_value(id: &str) -> serde_json::Value {
    match id.parse::<i64>() {
        Ok(n) if n.to_string() == id => serde_json::Value::from(n),
        _ => serde_json::Value::from(id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "opt_loose_string")]
        id: Option<String>,
        #[serde(default, deserialize_with = "opt_loose_u32")]
        rest: Option<u32>,
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        let sample: Sample = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(sample.id.as_deref(), Some("42"));

        let sample: Sample = serde_json::from_str(r#"{"id": "abc-1"}"#).unwrap();
        assert_eq!(sample.id.as_deref(), Some("abc-1"));

        let sample: Sample = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert_eq!(sample.id, None);
    }

    #[test]
    fn test_rest_is_never_negative() {
        let sample: Sample = serde_json::from_str(r#"{"rest": -30}"#).unwrap();
        assert_eq!(sample.rest, Some(0));

        let sample: Sample = serde_json::from_str(r#"{"rest": "90"}"#).unwrap();
        assert_eq!(sample.rest, Some(90));
    }

    #[test]
    fn test_id_value_prefers_numbers() {
        assert_eq!(id_value("12"), serde_json::json!(12));
        assert_eq!(id_value("a1"), serde_json::json!("a1"));
        assert_eq!(id_value("-3"), serde_json::json!(-3));
    }

    #[test]
    fn test_id_value_keeps_padded_ids_as_text() {
        assert_eq!(id_value("007"), serde_json::json!("007"));
        assert_eq!(id_value("+5"), serde_json::json!("+5"));
    }
}
