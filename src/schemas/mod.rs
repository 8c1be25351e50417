use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

pub(crate) mod academic;
pub(crate) mod attendance;
pub(crate) mod auth;
pub(crate) mod class_session;
pub(crate) mod dashboard;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
}

/// An `{id, name}` pair offered to a client as a select option.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct Choice {
    pub(crate) id: String,
    pub(crate) name: String,
}

impl Choice {
    pub(crate) fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

/// HTML forms submit untouched optional fields as empty strings.
pub(crate) fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|value| value.trim().to_string()).filter(|value| !value.is_empty()))
}

/// Trims required text fields before validation sees them, so a value of
/// only spaces fails `length(min = 1)`.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Optional {
        #[serde(default, deserialize_with = "empty_as_none")]
        value: Option<String>,
    }

    #[test]
    fn blank_optional_fields_become_none() {
        let blank: Optional = serde_json::from_str(r#"{"value": "  "}"#).unwrap();
        let missing: Optional = serde_json::from_str("{}").unwrap();
        let present: Optional = serde_json::from_str(r#"{"value": " c-1 "}"#).unwrap();

        assert_eq!(blank.value, None);
        assert_eq!(missing.value, None);
        assert_eq!(present.value.as_deref(), Some("c-1"));
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(deserialize_with = "trimmed")]
        name: String,
    }

    #[test]
    fn required_text_is_trimmed() {
        let spaced: Named = serde_json::from_str(r#"{"name": "  Science "}"#).unwrap();
        let blank: Named = serde_json::from_str(r#"{"name": "   "}"#).unwrap();

        assert_eq!(spaced.name, "Science");
        assert_eq!(blank.name, "");
    }
}
