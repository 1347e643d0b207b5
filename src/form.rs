//! Lenient form parsing.
//!
//! The calculator's callers hold raw text: currency fields arrive
//! locale-formatted ("5.000.000"), hour fields as free-typed numeric
//! strings, insurance rates as percentages ("8" meaning 8%).  This
//! module normalises that shape into a typed [`SalaryInput`] without
//! ever failing — an unparseable field becomes its documented default,
//! one field at a time.
//!
//! [`SalaryForm`] is also the persistence and share-link payload: it
//! round-trips through serde verbatim, so a form saved and restored
//! (or decoded from a share token) computes to the identical result
//! as the original entry.

use serde::{Deserialize, Serialize};

use crate::models::{Money, OvertimeHours, SalaryInput};

/// The raw form state, every field as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalaryForm {
    pub basic_salary: String,
    pub allowance: String,
    pub night_shift_hours: String,
    pub other_income: String,
    pub normal_day_overtime: String,
    pub normal_night_overtime: String,
    pub day_off_overtime: String,
    pub night_day_off_overtime: String,
    pub holiday_overtime: String,
    pub night_holiday_overtime: String,
    /// Percent entry: "8" means an 8% contribution rate.
    pub social_insurance: String,
    pub health_insurance: String,
    pub unemployment_insurance: String,
    pub union_fee: String,
    pub dependents: String,
}

impl Default for SalaryForm {
    /// The calculator's reset state.
    fn default() -> Self {
        SalaryForm {
            basic_salary: "5000000".to_string(),
            allowance: "1500000".to_string(),
            night_shift_hours: String::new(),
            other_income: "0".to_string(),
            normal_day_overtime: String::new(),
            normal_night_overtime: String::new(),
            day_off_overtime: String::new(),
            night_day_off_overtime: String::new(),
            holiday_overtime: String::new(),
            night_holiday_overtime: String::new(),
            social_insurance: "8".to_string(),
            health_insurance: "1.5".to_string(),
            unemployment_insurance: "1".to_string(),
            union_fee: "40000".to_string(),
            dependents: "0".to_string(),
        }
    }
}

/// Parses a currency field by dropping every non-digit character, so
/// "5.000.000", "5,000,000 VNĐ" and "5000000" all read as the same
/// amount.  Empty or overlong input reads as zero.
pub fn parse_money(raw: &str) -> Money {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Parses the longest leading decimal prefix, so "8", "8.5" and
/// "8.5h" all read as hours; anything without a leading number reads
/// as zero.
pub fn parse_hours(raw: &str) -> f64 {
    let s = raw.trim();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'+' | b'-' if i == 0 => {}
            b'.' if !seen_dot => seen_dot = true,
            b'0'..=b'9' => seen_digit = true,
            _ => break,
        }
        end = i + 1;
    }
    if !seen_digit {
        return 0.0;
    }
    s[..end].parse().unwrap_or(0.0)
}

/// Parses a leading unsigned integer prefix ("2", "2 people" → 2).
pub fn parse_count(raw: &str) -> u32 {
    let s = raw.trim();
    let end = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    s[..end].parse().unwrap_or(0)
}

/// A percent-entry rate ("8" → 0.08).  Zero, negative and
/// unparseable entries return `None` so the configured rate applies.
fn parse_rate_percent(raw: &str) -> Option<f64> {
    let rate = parse_hours(raw) / 100.0;
    (rate.is_finite() && rate > 0.0).then_some(rate)
}

impl SalaryForm {
    /// Normalises the raw form into a typed input.  Total: every
    /// field falls back to its default rather than failing.
    pub fn to_input(&self) -> SalaryInput {
        let union_fee = parse_money(&self.union_fee);
        SalaryInput {
            basic_salary: parse_money(&self.basic_salary),
            allowance: parse_money(&self.allowance),
            other_income: parse_money(&self.other_income),
            night_shift_hours: parse_hours(&self.night_shift_hours),
            overtime_hours: OvertimeHours {
                normal_day: parse_hours(&self.normal_day_overtime),
                normal_night: parse_hours(&self.normal_night_overtime),
                day_off: parse_hours(&self.day_off_overtime),
                night_day_off: parse_hours(&self.night_day_off_overtime),
                holiday: parse_hours(&self.holiday_overtime),
                night_holiday: parse_hours(&self.night_holiday_overtime),
            },
            dependents: parse_count(&self.dependents),
            social_insurance_rate: parse_rate_percent(&self.social_insurance),
            health_insurance_rate: parse_rate_percent(&self.health_insurance),
            unemployment_insurance_rate: parse_rate_percent(&self.unemployment_insurance),
            union_fee: (union_fee > 0).then_some(union_fee),
        }
    }
}
