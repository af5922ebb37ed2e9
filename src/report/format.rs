//! Value formatting used in reports.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Display;
use std::str::FromStr;

pub const NOT_AVAILABLE: &str = "N/A";

const NOTES_LIMIT: usize = 50;
const NOTES_KEEP: usize = 47;

pub fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// `dd/MM/yyyy`
pub fn date(value: Option<NaiveDate>) -> String {
    or_na(value.map(|d| d.format("%d/%m/%Y")))
}

/// `dd/MM/yyyy HH:mm`
pub fn date_time(value: Option<NaiveDateTime>) -> String {
    or_na(value.map(|d| d.format("%d/%m/%Y %H:%M")))
}

/// Two decimals, ties rounded away from zero on the shortest decimal form
/// of the grade (`87.125` gives `87.13`).
pub fn grade(value: Option<f64>) -> String {
    or_na(value.map(|g| match Decimal::from_str(&g.to_string()) {
        Ok(d) => format!(
            "{:.2}",
            d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        ),
        Err(_) => format!("{:.2}", g),
    }))
}

/// Exact decimal text, scale preserved.
pub fn amount(value: Decimal) -> String {
    format!("Rs. {}", value)
}

pub fn notes(value: Option<&str>) -> String {
    match value {
        None => NOT_AVAILABLE.to_string(),
        Some(text) if text.chars().count() > NOTES_LIMIT => {
            let kept: String = text.chars().take(NOTES_KEEP).collect();
            format!("{}...", kept)
        }
        Some(text) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn grades_have_two_decimals() {
        assert_eq!(grade(Some(87.5)), "87.50");
        assert_eq!(grade(Some(90.0)), "90.00");
        assert_eq!(grade(None), "N/A");
    }

    #[test]
    fn grade_ties_round_up() {
        assert_eq!(grade(Some(87.125)), "87.13");
        assert_eq!(grade(Some(1.005)), "1.01");
        assert_eq!(grade(Some(72.625)), "72.63");
        assert_eq!(grade(Some(0.125)), "0.13");
        assert_eq!(grade(Some(99.994)), "99.99");
    }

    #[test]
    fn amounts_keep_their_scale() {
        assert_eq!(amount(dec!(1500.00)), "Rs. 1500.00");
        assert_eq!(amount(dec!(12.5)), "Rs. 12.5");
    }

    #[test]
    fn dates_use_day_first_order() {
        assert_eq!(date(NaiveDate::from_ymd_opt(2024, 3, 5)), "05/03/2024");
        let when = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 7, 0);
        assert_eq!(date_time(when), "05/03/2024 09:07");
        assert_eq!(date(None), "N/A");
    }

    #[test]
    fn long_notes_are_cut_to_47_chars() {
        let fifty = "a".repeat(50);
        assert_eq!(notes(Some(&fifty)), fifty);

        let fifty_one = "b".repeat(51);
        let cut = notes(Some(&fifty_one));
        assert_eq!(cut, format!("{}...", "b".repeat(47)));
        assert_eq!(cut.chars().count(), 50);

        assert_eq!(notes(None), "N/A");
    }

    #[test]
    fn notes_are_measured_in_chars() {
        let accented = "é".repeat(51);
        assert_eq!(notes(Some(&accented)), format!("{}...", "é".repeat(47)));
    }
}
