// Options recognised by the sort engine. Pages hand these over as a JSON
// object (camelCase keys); unknown keys are ignored.
use serde::{Deserialize, Serialize};
use shared::models::{DateFormat, SortDirection};

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SortOptions {
    /// Column sorted right after attach, if any.
    pub default_column: Option<String>,
    pub default_direction: SortDirection,
    pub date_format: DateFormat,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            default_column: None,
            default_direction: SortDirection::Asc,
            date_format: DateFormat::Dmy,
        }
    }
}

impl SortOptions {
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_default_column(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.default_column = Some(column.into());
        self.default_direction = direction;
        self
    }

    pub fn with_date_format(mut self, date_format: DateFormat) -> Self {
        self.date_format = date_format;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_recognised_keys() {
        let options = SortOptions::from_json(
            r#"{"defaultColumn": "data_chegada", "defaultDirection": "desc", "dateFormat": "DMY"}"#,
        )
        .unwrap();
        assert_eq!(options.default_column.as_deref(), Some("data_chegada"));
        assert_eq!(options.default_direction, SortDirection::Desc);
        assert_eq!(options.date_format, DateFormat::Dmy);
    }

    #[test]
    fn test_from_json_ignores_unknown_keys_and_fills_defaults() {
        let options = SortOptions::from_json(r#"{"dateFormat": "ISO", "animate": true}"#).unwrap();
        assert_eq!(options.default_column, None);
        assert_eq!(options.default_direction, SortDirection::Asc);
        assert_eq!(options.date_format, DateFormat::Iso);
    }

    #[test]
    fn test_from_json_rejects_bad_direction() {
        let err = SortOptions::from_json(r#"{"defaultDirection": "sideways"}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid sort options"));
    }
}
