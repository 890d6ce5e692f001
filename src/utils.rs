use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;

pub fn verify_password(provided: &str, stored: &str) -> bool {
    // Stored passwords are plaintext; switching to a salted hash breaks existing rows.
    provided == stored
}

/// Blank credentials count as missing.
pub fn required_trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn id_from_value(value: &Value) -> Result<Option<i64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(whole_f64))
            .map(Some)
            .ok_or_else(|| format!("invalid id: {n}")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| format!("invalid id {s:?}: {e}")),
        other => Err(format!("invalid id: {other}")),
    }
}

/// `2.0` is an id, `2.5` is not.
fn whole_f64(f: f64) -> Option<i64> {
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

/// Accepts a JSON number or a numeric string.
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    id_from_value(&value)
        .map_err(D::Error::custom)?
        .ok_or_else(|| D::Error::custom("id is required"))
}

/// Like [`deserialize_id`], but null, `""` and `0` mean "no reference".
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = id_from_value(&value).map_err(D::Error::custom)?;
    Ok(id.filter(|id| *id != 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Required {
        #[serde(deserialize_with = "deserialize_id")]
        id: i64,
    }

    #[derive(Deserialize)]
    struct Optional {
        #[serde(default, deserialize_with = "deserialize_optional_id")]
        id: Option<i64>,
    }

    #[test]
    fn required_id_accepts_numbers_and_numeric_strings() {
        assert_eq!(serde_json::from_str::<Required>(r#"{"id":5}"#).unwrap().id, 5);
        assert_eq!(serde_json::from_str::<Required>(r#"{"id":"12"}"#).unwrap().id, 12);
        assert_eq!(serde_json::from_str::<Required>(r#"{"id":2.0}"#).unwrap().id, 2);
        assert!(serde_json::from_str::<Required>(r#"{"id":2.5}"#).is_err());
        assert!(serde_json::from_str::<Required>(r#"{"id":"abc"}"#).is_err());
        assert!(serde_json::from_str::<Required>(r#"{"id":null}"#).is_err());
        assert!(serde_json::from_str::<Required>(r#"{}"#).is_err());
    }

    #[test]
    fn optional_id_treats_falsy_values_as_absent() {
        let parse = |s: &str| serde_json::from_str::<Optional>(s).unwrap().id;
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"id":null}"#), None);
        assert_eq!(parse(r#"{"id":""}"#), None);
        assert_eq!(parse(r#"{"id":0}"#), None);
        assert_eq!(parse(r#"{"id":"0"}"#), None);
        assert_eq!(parse(r#"{"id":0.0}"#), None);
        assert_eq!(parse(r#"{"id":4.0}"#), Some(4));
        assert_eq!(parse(r#"{"id":"3"}"#), Some(3));
        assert_eq!(parse(r#"{"id":7}"#), Some(7));
        assert!(serde_json::from_str::<Optional>(r#"{"id":"x1"}"#).is_err());
        assert!(serde_json::from_str::<Optional>(r#"{"id":[1]}"#).is_err());
    }

    #[test]
    fn credentials_are_trimmed() {
        assert_eq!(required_trimmed(Some("  anna ")), Some("anna"));
        assert_eq!(required_trimmed(Some("   ")), None);
        assert_eq!(required_trimmed(None), None);
    }

    #[test]
    fn passwords_compare_verbatim() {
        assert!(verify_password("secret", "secret"));
        assert!(!verify_password("Secret", "secret"));
    }
}
