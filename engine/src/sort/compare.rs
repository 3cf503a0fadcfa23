//! Cell comparison.
//!
//! Every cell is turned into a [`SortKey`] once per sort pass. Keys compare
//! with a total order that mirrors the pairwise rules applied to the rendered
//! values:
//!
//! 1. valid dates (in the configured format) compare chronologically and come
//!    before everything else, in either direction;
//! 2. values that parse as formatted numbers compare numerically;
//! 3. anything else compares as accent-folded, case-insensitive text with
//!    digit runs compared by value;
//! 4. empty cells always go last.
//!
//! A date-shaped value that is not a real date (`31/02/2025`) is treated as
//! text and therefore lands after every valid date.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

use chrono::NaiveDateTime;
use shared::brazilian_format;
use shared::models::{DateFormat, SortDirection, ValueType};

use crate::dom::SortValue;

#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Date(NaiveDateTime),
    Number(f64),
    /// Folded text, see [`fold_text`].
    Text(String),
    Empty,
}

impl SortKey {
    /// Builds the key for one cell. An explicit `hint` narrows detection:
    /// `Numeric` skips dates, `Date` skips numbers, `Text` skips both.
    pub fn from_value(value: SortValue<'_>, hint: Option<ValueType>, date_format: DateFormat) -> SortKey {
        let raw = value.text.trim();
        if raw.is_empty() {
            return SortKey::Empty;
        }

        let detect_dates = !matches!(hint, Some(ValueType::Numeric | ValueType::Text));
        let detect_numbers = !matches!(hint, Some(ValueType::Date | ValueType::Text));

        if detect_dates {
            if let Some(datetime) = date_format.parse(raw) {
                return SortKey::Date(datetime);
            }
        }
        if detect_numbers {
            if let Some(number) = parse_number(raw, value.is_override) {
                return SortKey::Number(number);
            }
        }
        SortKey::Text(fold_text(raw))
    }

    /// Ordering of `self` relative to `other` in the final row order.
    pub fn compare(&self, other: &SortKey, direction: SortDirection) -> Ordering {
        use SortKey::*;

        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Empty, _) => Ordering::Greater,
            (_, Empty) => Ordering::Less,

            (Date(a), Date(b)) => direction.apply(a.cmp(b)),
            (Date(_), _) => Ordering::Less,
            (_, Date(_)) => Ordering::Greater,

            (Number(a), Number(b)) => direction.apply(a.total_cmp(b)),
            (Number(_), Text(_)) => direction.apply(Ordering::Less),
            (Text(_), Number(_)) => direction.apply(Ordering::Greater),
            (Text(a), Text(b)) => direction.apply(natural_cmp(a, b)),
        }
    }
}

/// Compares two rendered values the way a sort pass would.
pub fn compare_values(a: &str, b: &str, direction: SortDirection, date_format: DateFormat) -> Ordering {
    let a = SortKey::from_value(SortValue::text(a), None, date_format);
    let b = SortKey::from_value(SortValue::text(b), None, date_format);
    a.compare(&b, direction)
}

// Overrides are usually machine numbers ("1200.125"), so try that reading
// before the Brazilian display format, where "100.125" means 100125.
fn parse_number(raw: &str, is_override: bool) -> Option<f64> {
    if is_override {
        if let Some(n) = raw.parse::<f64>().ok().filter(|n| n.is_finite()) {
            return Some(n);
        }
    }
    brazilian_format::parse_formatted_number(raw)
}

fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Lowercases and strips the accents used in Portuguese and Spanish text.
pub fn fold_text(text: &str) -> String {
    text.trim().chars().flat_map(char::to_lowercase).map(fold_char).collect()
}

fn take_digits(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a_trimmed = a.trim_start_matches('0');
    let b_trimmed = b.trim_start_matches('0');
    a_trimmed
        .len()
        .cmp(&b_trimmed.len())
        .then_with(|| a_trimmed.cmp(b_trimmed))
        // "007" after "7"
        .then_with(|| a.len().cmp(&b.len()))
}

/// Text comparison with digit runs compared by value: `item2 < item10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let ordering = compare_digit_runs(&take_digits(&mut a), &take_digits(&mut b));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                a.next();
                b.next();
            }
        }
    }
}
