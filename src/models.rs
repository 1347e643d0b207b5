//! Data models for the salary engine.
//!
//! The `models` module defines the serialisable structs making up the
//! engine's input and output contract: the rate configuration
//! ([`RateConfig`]), the per-calculation input ([`SalaryInput`]) and
//! the fully derived result ([`SalaryResult`]).  All types derive
//! `Serialize` and `Deserialize` so that callers can persist them or
//! ship them over the API unchanged; a record written to storage and
//! read back computes to the identical result.

use serde::{Deserialize, Serialize};

use crate::tax::{self, TaxBracket};

/// Whole units of currency (VND).  All monetary quantities in the
/// engine are integral; rounding happens inside the computation, at
/// the point each quantity is first produced.
pub type Money = i64;

/// The six overtime categories, in report order.  The order is part
/// of the output contract: breakdown lines always appear in this
/// sequence regardless of input shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OvertimeCategory {
    NormalDay,
    NormalNight,
    DayOff,
    NightDayOff,
    Holiday,
    NightHoliday,
}

impl OvertimeCategory {
    /// All categories in declaration (report) order.
    pub const ALL: [OvertimeCategory; 6] = [
        OvertimeCategory::NormalDay,
        OvertimeCategory::NormalNight,
        OvertimeCategory::DayOff,
        OvertimeCategory::NightDayOff,
        OvertimeCategory::Holiday,
        OvertimeCategory::NightHoliday,
    ];

    /// Human-readable label, including the statutory percentage.
    pub fn label(&self) -> &'static str {
        match self {
            OvertimeCategory::NormalDay => "Regular day (150%)",
            OvertimeCategory::NormalNight => "Regular night (200%)",
            OvertimeCategory::DayOff => "Day off (200%)",
            OvertimeCategory::NightDayOff => "Night on day off (270%)",
            OvertimeCategory::Holiday => "Public holiday (300%)",
            OvertimeCategory::NightHoliday => "Night on public holiday (390%)",
        }
    }
}

/// Overtime hours worked, one field per category.  Unset fields
/// deserialise to zero, and zero-hour categories produce no breakdown
/// line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OvertimeHours {
    pub normal_day: f64,
    pub normal_night: f64,
    pub day_off: f64,
    pub night_day_off: f64,
    pub holiday: f64,
    pub night_holiday: f64,
}

impl OvertimeHours {
    pub fn get(&self, category: OvertimeCategory) -> f64 {
        match category {
            OvertimeCategory::NormalDay => self.normal_day,
            OvertimeCategory::NormalNight => self.normal_night,
            OvertimeCategory::DayOff => self.day_off,
            OvertimeCategory::NightDayOff => self.night_day_off,
            OvertimeCategory::Holiday => self.holiday,
            OvertimeCategory::NightHoliday => self.night_holiday,
        }
    }
}

/// Pay multipliers per overtime category, relative to the hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OvertimeMultipliers {
    pub normal_day: f64,
    pub normal_night: f64,
    pub day_off: f64,
    pub night_day_off: f64,
    pub holiday: f64,
    pub night_holiday: f64,
}

impl OvertimeMultipliers {
    pub fn get(&self, category: OvertimeCategory) -> f64 {
        match category {
            OvertimeCategory::NormalDay => self.normal_day,
            OvertimeCategory::NormalNight => self.normal_night,
            OvertimeCategory::DayOff => self.day_off,
            OvertimeCategory::NightDayOff => self.night_day_off,
            OvertimeCategory::Holiday => self.holiday,
            OvertimeCategory::NightHoliday => self.night_holiday,
        }
    }
}

impl Default for OvertimeMultipliers {
    fn default() -> Self {
        OvertimeMultipliers {
            normal_day: 1.5,
            normal_night: 2.0,
            day_off: 2.0,
            night_day_off: 2.7,
            holiday: 3.0,
            night_holiday: 3.9,
        }
    }
}

/// Statutory insurance contribution rates, each applied to the
/// insurance base (basic salary plus allowance).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InsuranceRates {
    pub social: f64,
    pub health: f64,
    pub unemployment: f64,
}

impl Default for InsuranceRates {
    fn default() -> Self {
        InsuranceRates {
            social: 0.08,
            health: 0.015,
            unemployment: 0.01,
        }
    }
}

/// The rate configuration driving a computation.  This is policy
/// supplied as configuration, not hard fact: rate tables are versioned
/// JSON files (see [`crate::tax::load_rate_tables_from_dir`]) and the
/// defaults reproduce the Vietnamese 2024 rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateConfig {
    /// Standard working days per month used to derive the hourly rate.
    /// Non-positive or non-finite values fall back to 26 at compute
    /// time rather than failing.
    pub working_days_per_month: f64,
    /// Standard working hours per day (8).
    pub standard_hours_per_day: f64,
    /// Extra pay per night-shift hour, as a fraction of the hourly
    /// rate.  Two interpretations exist in the field: 0.3, an additive
    /// 30% surcharge on top of pay already earned for the hour, and
    /// 1.8, a 180% rate that includes the base pay for the hour.  The
    /// engine applies the value as-is; which semantics a deployment
    /// wants is expressed in its rate table.
    pub night_shift_multiplier: f64,
    pub overtime_multipliers: OvertimeMultipliers,
    pub insurance_rates: InsuranceRates,
    /// Flat union fee in VND, independent of the insurance base.
    pub union_fee_fixed: Money,
    /// Personal tax-free threshold.
    pub tax_free_threshold: Money,
    /// Additional deduction per registered dependent.
    pub dependent_deduction: Money,
    /// Progressive tax brackets, ascending and contiguous, last one
    /// unbounded.  See [`crate::tax::validate_brackets`].
    pub tax_brackets: Vec<TaxBracket>,
    /// When true (the common variant), net salary subtracts insurance
    /// plus the union fee; when false it subtracts insurance only and
    /// the union fee is informational.
    pub union_fee_reduces_net: bool,
}

impl Default for RateConfig {
    fn default() -> Self {
        RateConfig {
            working_days_per_month: 26.0,
            standard_hours_per_day: 8.0,
            night_shift_multiplier: 0.3,
            overtime_multipliers: OvertimeMultipliers::default(),
            insurance_rates: InsuranceRates::default(),
            union_fee_fixed: 40_000,
            tax_free_threshold: 11_400_000,
            dependent_deduction: 4_400_000,
            tax_brackets: tax::vn_2024_brackets(),
            union_fee_reduces_net: true,
        }
    }
}

/// Input to one salary computation.
///
/// Every field has a lenient default: a record with missing fields
/// deserialises to a valid input, and out-of-range values (negative
/// amounts, NaN hours) are substituted field-by-field at compute time.
/// The engine never rejects an input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalaryInput {
    pub basic_salary: Money,
    pub allowance: Money,
    pub other_income: Money,
    pub night_shift_hours: f64,
    pub overtime_hours: OvertimeHours,
    pub dependents: u32,
    /// Per-field overrides of the configured insurance rates.  `None`
    /// (or a non-positive value) means "use the rate table's rate".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_insurance_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_insurance_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unemployment_insurance_rate: Option<f64>,
    /// Override of the flat union fee; `None` or a non-positive value
    /// falls back to the configured amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub union_fee: Option<Money>,
}

/// One line of the overtime breakdown.  Lines appear in
/// [`OvertimeCategory::ALL`] order and only for categories with
/// positive hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OvertimeLine {
    pub category: OvertimeCategory,
    /// Display label for the report, e.g. "Regular day (150%)".
    #[serde(default)]
    pub label: String,
    pub hours: f64,
    pub multiplier: f64,
    pub pay: Money,
}

/// Insurance and deduction breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceBreakdown {
    pub social: Money,
    pub health: Money,
    pub unemployment: Money,
    pub union_fee: Money,
    /// Sum of the three statutory contributions (union fee excluded).
    pub total_insurance: Money,
    /// `total_insurance` plus the union fee.
    pub total_deductions: Money,
}

/// The fully derived result of one computation.  There is no hidden
/// state: every field follows from the input and the rate config, and
/// the documented invariants hold over the rounded values exactly as
/// stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryResult {
    /// `round(basic_salary / working_days / standard_hours)`.
    pub hourly_rate: Money,
    /// Basic salary plus allowance.
    pub basic_total: Money,
    pub night_shift_allowance: Money,
    pub overtime: Vec<OvertimeLine>,
    pub total_overtime_pay: Money,
    pub total_overtime_hours: f64,
    /// `basic_total + night_shift_allowance + total_overtime_pay +
    /// other_income`.
    pub gross_salary: Money,
    pub insurance: InsuranceBreakdown,
    /// Gross salary minus statutory insurance (the union fee is not
    /// tax-deductible).
    pub taxable_income: Money,
    /// Tax-free threshold plus per-dependent deductions.
    pub family_deduction: Money,
    /// `max(0, taxable_income - family_deduction)`.
    pub actual_taxable_income: Money,
    pub income_tax: Money,
    /// May legitimately be negative when deductions exceed gross.
    pub net_salary: Money,
}
