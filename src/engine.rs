//! Salary computation engine.
//!
//! The `engine` module turns a [`SalaryInput`] plus a [`RateConfig`]
//! into a [`SalaryResult`].  [`compute`] is a pure function: no I/O,
//! no shared state, and the same input always produces the same
//! result, so it is safe to call from any number of threads.
//! [`compute_batch`] uses [`rayon`] to spread many independent
//! computations across cores.
//!
//! The step order is load-bearing.  Every monetary quantity is
//! rounded to whole VND at the point it is first produced (hourly
//! rate, each overtime line, the night allowance, each insurance
//! component), and later steps consume the rounded values.  Reordering
//! the steps or deferring the rounding changes the output.
//!
//! The engine never fails.  Out-of-range fields are substituted with
//! safe defaults one field at a time: a nonsensical working-day count
//! falls back to 26, NaN or negative hours count as zero, a zero
//! basic salary simply yields zero hour-based pay.  This leniency is
//! the input contract, not error suppression.

use rayon::prelude::*;

use crate::models::{
    InsuranceBreakdown, Money, OvertimeCategory, OvertimeLine, RateConfig, SalaryInput,
    SalaryResult,
};
use crate::tax;

/// Fallback when the configured working-day count is unusable.
const DEFAULT_WORKING_DAYS: f64 = 26.0;
/// Fallback for the standard working hours per day.
const DEFAULT_HOURS_PER_DAY: f64 = 8.0;

/// Rounds to the nearest whole currency unit, halves away from zero.
fn round_money(value: f64) -> Money {
    value.round() as Money
}

/// Clamps a money field to its valid (non-negative) domain.
fn sane_amount(value: Money) -> Money {
    value.max(0)
}

/// Treats NaN, infinite and negative hour counts as zero.
fn sane_hours(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// An override rate is used only when it is a finite positive number;
/// anything else falls back to the configured rate.
fn rate_or(override_rate: Option<f64>, configured: f64) -> f64 {
    match override_rate {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => configured,
    }
}

/// The hourly rate behind all hour-based pay:
/// `round(basic / working_days / hours_per_day)`.  A non-positive
/// basic salary gives rate zero, which is a valid zero-income
/// scenario rather than an error.
fn hourly_rate(basic_salary: Money, config: &RateConfig) -> Money {
    if basic_salary <= 0 {
        return 0;
    }
    let days = if config.working_days_per_month.is_finite() && config.working_days_per_month > 0.0
    {
        config.working_days_per_month
    } else {
        DEFAULT_WORKING_DAYS
    };
    let hours = if config.standard_hours_per_day.is_finite() && config.standard_hours_per_day > 0.0
    {
        config.standard_hours_per_day
    } else {
        DEFAULT_HOURS_PER_DAY
    };
    round_money(basic_salary as f64 / days / hours)
}

/// Computes the full salary breakdown for one input.
pub fn compute(input: &SalaryInput, config: &RateConfig) -> SalaryResult {
    let basic_salary = sane_amount(input.basic_salary);
    let allowance = sane_amount(input.allowance);
    let other_income = sane_amount(input.other_income);

    // Step 1: hourly rate.
    let hourly_rate = hourly_rate(basic_salary, config);

    // Step 2: overtime lines, in report order, zero-hour categories
    // omitted.
    let mut overtime = Vec::new();
    let mut total_overtime_pay: Money = 0;
    let mut total_overtime_hours = 0.0;
    for category in OvertimeCategory::ALL {
        let hours = sane_hours(input.overtime_hours.get(category));
        if hours <= 0.0 {
            continue;
        }
        let multiplier = config.overtime_multipliers.get(category);
        let pay = round_money(hours * hourly_rate as f64 * multiplier);
        total_overtime_pay += pay;
        total_overtime_hours += hours;
        overtime.push(OvertimeLine {
            category,
            label: category.label().to_string(),
            hours,
            multiplier,
            pay,
        });
    }

    // Step 3: night-shift allowance, independent of overtime.
    let night_shift_hours = sane_hours(input.night_shift_hours);
    let night_shift_allowance =
        round_money(night_shift_hours * hourly_rate as f64 * config.night_shift_multiplier);

    // Step 4: insurance on basic + allowance; the union fee is flat.
    let insurance_base = (basic_salary + allowance) as f64;
    let social = round_money(insurance_base * rate_or(input.social_insurance_rate, config.insurance_rates.social));
    let health = round_money(insurance_base * rate_or(input.health_insurance_rate, config.insurance_rates.health));
    let unemployment = round_money(
        insurance_base * rate_or(input.unemployment_insurance_rate, config.insurance_rates.unemployment),
    );
    let union_fee = match input.union_fee {
        Some(fee) if fee > 0 => fee,
        _ => config.union_fee_fixed,
    };
    let total_insurance = social + health + unemployment;
    let total_deductions = total_insurance + union_fee;
    let insurance = InsuranceBreakdown {
        social,
        health,
        unemployment,
        union_fee,
        total_insurance,
        total_deductions,
    };

    // Steps 5-6: gross, then taxable income.  The union fee is not
    // tax-deductible.
    let basic_total = basic_salary + allowance;
    let gross_salary = basic_total + night_shift_allowance + total_overtime_pay + other_income;
    let taxable_income = gross_salary - total_insurance;

    // Steps 7-9: family deduction, taxable floor, progressive tax.
    let family_deduction = tax::family_deduction(input.dependents, config);
    let actual_taxable_income = (taxable_income - family_deduction).max(0);
    let income_tax = tax::progressive_tax(actual_taxable_income, &config.tax_brackets);

    // Step 10: net pay.  May go negative when deductions exceed gross.
    let deducted = if config.union_fee_reduces_net {
        total_deductions
    } else {
        total_insurance
    };
    let net_salary = gross_salary - income_tax - deducted;

    SalaryResult {
        hourly_rate,
        basic_total,
        night_shift_allowance,
        overtime,
        total_overtime_pay,
        total_overtime_hours,
        gross_salary,
        insurance,
        taxable_income,
        family_deduction,
        actual_taxable_income,
        income_tax,
        net_salary,
    }
}

/// Computes many inputs against one rate table in parallel.  Results
/// come back in input order.
pub fn compute_batch(inputs: &[SalaryInput], config: &RateConfig) -> Vec<SalaryResult> {
    inputs.par_iter().map(|input| compute(input, config)).collect()
}
