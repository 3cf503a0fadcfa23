// Locale helpers shared by the engine and the frontend.
// Dates and numbers in the back-office follow the Brazilian conventions:
// dd/mm/yyyy dates, '.' as thousands separator and ',' as decimal separator.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::DateFormat;

pub mod brazilian_format {
    use std::str::FromStr;
    use anyhow::{Result, anyhow};
    use chrono::NaiveDate;

    // Longest first, so "US$" is not left behind as "US".
    const CURRENCY_SYMBOLS: [&str; 5] = ["US$", "R$", "$", "€", "£"];

    // Parses decimals like "1.234,56" or "123,45" into f64
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim()
            .replace('.', "")  // Remove thousand separators
            .replace(',', "."); // Replace decimal separator

        f64::from_str(&normalized)
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    /// Parses a displayed number such as `R$ 1.234,56`, `12,5%` or `1.200`.
    ///
    /// Currency symbols, `%` and whitespace are dropped. Anything else that is
    /// not a digit, a separator or a leading sign makes the value non-numeric,
    /// so `Item 2` stays text.
    pub fn parse_formatted_number(s: &str) -> Option<f64> {
        let mut cleaned = s.trim().to_string();
        for symbol in CURRENCY_SYMBOLS {
            cleaned = cleaned.replace(symbol, "");
        }
        cleaned.retain(|c| !c.is_whitespace() && c != '%');

        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
        };
        let starts_and_ends_with_digit = body.starts_with(|c: char| c.is_ascii_digit())
            && body.ends_with(|c: char| c.is_ascii_digit());
        if !starts_and_ends_with_digit || !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return None;
        }

        let magnitude = if body.contains(',') {
            parse_decimal(body).ok()?
        } else if body.contains('.') {
            let groups: Vec<&str> = body.split('.').collect();
            let thousands = groups[0].len() <= 3 && groups[1..].iter().all(|g| g.len() == 3);
            if thousands {
                f64::from_str(&body.replace('.', "")).ok()?
            } else if groups.len() == 2 {
                f64::from_str(body).ok()?
            } else {
                return None;
            }
        } else {
            f64::from_str(body).ok()?
        };

        Some(if negative { -magnitude } else { magnitude })
    }

    /// Formats with Brazilian separators: `format_decimal(1234.5, 2) == "1.234,50"`.
    pub fn format_decimal(value: f64, decimals: usize) -> String {
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (formatted.as_str(), None),
        };

        let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
        let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
        if value.is_sign_negative() && !is_zero {
            out.push('-');
        }
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        if let Some(frac_part) = frac_part {
            out.push(',');
            out.push_str(frac_part);
        }
        out
    }

    /// Integers keep no decimals, everything else gets two.
    pub fn format_number(value: f64) -> String {
        if value.fract() == 0.0 && value.abs() < 1e15 {
            format_decimal(value, 0)
        } else {
            format_decimal(value, 2)
        }
    }

    pub fn format_date(date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }

}

fn all_digits(s: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

// "HH:MM" or "HH:MM:SS", with an optional ".fff" on the seconds.
fn time_shape(s: &str) -> bool {
    let mut parts = s.split(':');
    let (Some(h), Some(m)) = (parts.next(), parts.next()) else {
        return false;
    };
    let seconds_ok = match parts.next() {
        None => true,
        Some(sec) => {
            let whole = sec.split_once('.').map_or(sec, |(whole, frac)| {
                if all_digits(frac, 1, 9) { whole } else { "" }
            });
            all_digits(whole, 2, 2)
        }
    };
    parts.next().is_none() && all_digits(h, 1, 2) && all_digits(m, 2, 2) && seconds_ok
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

impl DateFormat {
    /// Splits `value` into its date part and optional time part.
    fn split(self, value: &str) -> (&str, Option<&str>) {
        let value = value.trim();
        let separated = match self {
            DateFormat::Dmy => value.split_once(char::is_whitespace),
            DateFormat::Iso => value.split_once(|c: char| c == 'T' || c.is_whitespace()),
        };
        match separated {
            Some((date, time)) => {
                let time = time.trim();
                let time = match self {
                    DateFormat::Iso => time.strip_suffix('Z').unwrap_or(time),
                    DateFormat::Dmy => time,
                };
                (date, Some(time))
            }
            None => (value, None),
        }
    }

    /// True when `value` has the shape of a date in this format. A matching
    /// value may still be an impossible date such as `31/02/2025`.
    pub fn matches(self, value: &str) -> bool {
        let (date, time) = self.split(value);
        if time.is_some_and(|t| !time_shape(t)) {
            return false;
        }
        let fields: Vec<&str> = match self {
            DateFormat::Dmy => date.split('/').collect(),
            DateFormat::Iso => date.split('-').collect(),
        };
        match (self, fields.as_slice()) {
            (DateFormat::Dmy, [d, m, y]) => all_digits(d, 1, 2) && all_digits(m, 1, 2) && all_digits(y, 4, 4),
            (DateFormat::Iso, [y, m, d]) => all_digits(y, 4, 4) && all_digits(m, 1, 2) && all_digits(d, 1, 2),
            _ => false,
        }
    }

    /// Parses `value` from explicit day, month and year fields.
    pub fn parse(self, value: &str) -> Option<NaiveDateTime> {
        if !self.matches(value) {
            return None;
        }
        let (date, time) = self.split(value);
        let fields: Vec<u32> = match self {
            DateFormat::Dmy => date.split('/').map(str::parse).collect::<Result<_, _>>().ok()?,
            DateFormat::Iso => date.split('-').map(str::parse).collect::<Result<_, _>>().ok()?,
        };
        let (day, month, year) = match self {
            DateFormat::Dmy => (fields[0], fields[1], fields[2]),
            DateFormat::Iso => (fields[2], fields[1], fields[0]),
        };
        let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
        let time = match time {
            Some(t) => parse_time(t)?,
            None => NaiveTime::MIN,
        };
        Some(date.and_time(time))
    }
}
