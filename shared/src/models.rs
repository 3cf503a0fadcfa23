use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::brazilian_format;

/// A single displayable cell value as delivered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) | CellValue::Bool(_) => false,
        }
    }

    /// Text shown in the table cell. Numbers use the Brazilian decimal comma.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Bool(true) => "Sim".to_string(),
            CellValue::Bool(false) => "Não".to_string(),
            CellValue::Number(n) => brazilian_format::format_number(*n),
        }
    }

    /// Machine-comparable override for formatted cells, if one applies.
    pub fn sort_override(&self) -> Option<String> {
        match self {
            CellValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// One record of a row set, keyed by column. Cells are laid out following
/// the page's column list, not the map order.
pub type Row = BTreeMap<String, CellValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Date,
    #[serde(alias = "number")]
    Numeric,
    #[serde(alias = "string")]
    Text,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Date => "date",
            ValueType::Numeric => "numeric",
            ValueType::Text => "text",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Some(ValueType::Date),
            "numeric" | "number" => Some(ValueType::Numeric),
            "text" | "string" => Some(ValueType::Text),
            _ => None,
        }
    }

    /// Infers a column type from sampled cell texts.
    ///
    /// Empty samples are ignored. A column is `Date` when every other sample
    /// is a valid date, `Numeric` when every other sample parses as a
    /// formatted number, and `Text` otherwise (including an all-empty column).
    pub fn infer<'a, I>(samples: I, date_format: DateFormat) -> ValueType
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = 0usize;
        let mut dates = 0usize;
        let mut numbers = 0usize;
        for sample in samples {
            let sample = sample.trim();
            if sample.is_empty() {
                continue;
            }
            seen += 1;
            if date_format.parse(sample).is_some() {
                dates += 1;
            } else if brazilian_format::parse_formatted_number(sample).is_some() {
                numbers += 1;
            }
        }
        match seen {
            0 => ValueType::Text,
            n if dates == n => ValueType::Date,
            n if numbers == n => ValueType::Numeric,
            _ => ValueType::Text,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column metadata: key, label and an optional explicit type hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub key: String,
    pub label: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    #[serde(default = "default_sortable")]
    pub sortable: bool,
}

fn default_sortable() -> bool {
    true
}

impl ColumnDescriptor {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            value_type: None,
            sortable: true,
        }
    }

    /// Descriptor with a label derived from the key: `data_chegada` -> `Data chegada`.
    pub fn from_key(key: &str) -> Self {
        let words = key.replace(['_', '-'], " ");
        let mut chars = words.trim().chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self::new(key, label)
    }

    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = Some(value_type);
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn apply(self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Header indicator class.
    pub fn css_class(self) -> &'static str {
        match self {
            SortDirection::Asc => "sort-asc",
            SortDirection::Desc => "sort-desc",
        }
    }

    /// Value of the `aria-sort` attribute.
    pub fn aria(self) -> &'static str {
        match self {
            SortDirection::Asc => "ascending",
            SortDirection::Desc => "descending",
        }
    }
}

/// Sort state of one table instance. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SortState {
    pub active_column: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(active_column: Option<String>, direction: SortDirection) -> Self {
        Self {
            active_column,
            direction,
        }
    }

    /// State after a click on `column`: same column flips, another column
    /// starts ascending.
    pub fn clicked(&self, column: &str) -> SortState {
        match self.active_column.as_deref() {
            Some(active) if active == column => SortState::new(Some(column.to_string()), self.direction.toggled()),
            _ => SortState::new(Some(column.to_string()), SortDirection::Asc),
        }
    }
}

/// Date layout used to recognise and parse date cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateFormat {
    /// `dd/mm/yyyy`, optionally followed by `HH:MM` or `HH:MM:SS`.
    #[default]
    #[serde(rename = "DMY", alias = "dmy")]
    Dmy,
    /// `yyyy-mm-dd`, optionally followed by `THH:MM[:SS]` or ` HH:MM[:SS]`.
    #[serde(rename = "ISO", alias = "iso")]
    Iso,
}

/// Query sent to the backend search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            q: None,
            date_from: None,
            date_to: None,
        }
    }
}

impl SearchQuery {
    pub fn with_text(mut self, text: &str) -> Self {
        let text = text.trim();
        self.q = (!text.is_empty()).then(|| text.to_string());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    /// Query-string pairs. Dates go out as `dd/mm/yyyy`.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(q) = &self.q {
            pairs.push(("q", q.clone()));
        }
        if let Some(from) = self.date_from {
            pairs.push(("date_from", brazilian_format::format_date(from)));
        }
        if let Some(to) = self.date_to {
            pairs.push(("date_to", brazilian_format::format_date(to)));
        }
        pairs
    }
}

/// One page of the backend search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PageResponse {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
}

fn first_page() -> u32 {
    1
}

impl PageResponse {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return if self.total > 0 { 1 } else { 0 };
        }
        self.total.div_ceil(u64::from(self.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_state_click_transitions() {
        let unsorted = SortState::default();
        let first = unsorted.clicked("valor");
        assert_eq!(first, SortState::new(Some("valor".into()), SortDirection::Asc));

        let second = first.clicked("valor");
        assert_eq!(second.direction, SortDirection::Desc);

        let other = second.clicked("data");
        assert_eq!(other, SortState::new(Some("data".into()), SortDirection::Asc));
    }

    #[test]
    fn test_value_type_infer() {
        let dates = ["31/05/2025", "", "11/07/2025 10:30"];
        assert_eq!(ValueType::infer(dates, DateFormat::Dmy), ValueType::Date);

        let money = ["R$ 900,00", "R$ 1.200,50"];
        assert_eq!(ValueType::infer(money, DateFormat::Dmy), ValueType::Numeric);

        let mixed = ["Item 2", "10"];
        assert_eq!(ValueType::infer(mixed, DateFormat::Dmy), ValueType::Text);

        assert_eq!(ValueType::infer(["", " "], DateFormat::Dmy), ValueType::Text);
    }

    #[test]
    fn test_column_descriptor_from_key() {
        let col = ColumnDescriptor::from_key("data_chegada");
        assert_eq!(col.label, "Data chegada");
        assert!(col.sortable);
        assert_eq!(col.value_type, None);
    }

    #[test]
    fn test_page_response_deserialize() {
        let json = r#"{
            "columns": ["processo", "valor", "data_chegada"],
            "rows": [{"processo": "IMP-001", "valor": 1200.5, "data_chegada": null}],
            "total": 51,
            "page": 2,
            "page_size": 25
        }"#;
        let page: PageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0]["valor"], CellValue::Number(1200.5));
        assert_eq!(page.rows[0]["data_chegada"], CellValue::Null);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn test_search_query_pairs() {
        let query = SearchQuery {
            date_from: NaiveDate::from_ymd_opt(2025, 1, 5),
            ..SearchQuery::default()
        }
        .with_text("  conteiner ");
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("q", "conteiner".to_string())));
        assert!(pairs.contains(&("date_from", "05/01/2025".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "date_to"));
    }

    #[test]
    fn test_sort_direction_serde() {
        let dir: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(dir, SortDirection::Desc);
        let fmt: DateFormat = serde_json::from_str("\"ISO\"").unwrap();
        assert_eq!(fmt, DateFormat::Iso);
    }
}
