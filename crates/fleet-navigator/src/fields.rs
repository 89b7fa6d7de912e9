//! Lenient field deserializers for fleet JSON and CSV inputs, where missing values arrive as `""`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts numbers, numeric strings, `""` and `null`; the last two become `None`.
pub(crate) fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(value)) => Ok(Some(value)),
        Some(NumberOrText::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("expected a number, found {trimmed:?}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient_number")]
        value: Option<f64>,
        #[serde(default, deserialize_with = "empty_string_as_none")]
        label: Option<String>,
    }

    fn row(value: serde_json::Value) -> Result<Row, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn numbers_and_numeric_strings_are_accepted() {
        assert_eq!(row(json!({"value": 91})).expect("int").value, Some(91.0));
        assert_eq!(row(json!({"value": -5.66})).expect("float").value, Some(-5.66));
        assert_eq!(row(json!({"value": " 19.34 "})).expect("text").value, Some(19.34));
    }

    #[test]
    fn blanks_and_nulls_are_absent() {
        let blank = row(json!({"value": "", "label": "  "})).expect("blank");
        assert_eq!(blank.value, None);
        assert_eq!(blank.label, None);
        assert_eq!(row(json!({"value": null})).expect("null").value, None);
        assert_eq!(row(json!({})).expect("missing").value, None);
    }

    #[test]
    fn non_numeric_text_is_an_error() {
        assert!(row(json!({"value": "n/a"})).is_err());
    }
}
