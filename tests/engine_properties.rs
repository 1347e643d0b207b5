//! Cross-cutting properties of the computation pipeline, exercised
//! through the public API the way an embedding application would.

use salary_engine::engine::compute;
use salary_engine::form::SalaryForm;
use salary_engine::models::{OvertimeHours, RateConfig, SalaryInput};

fn input_with_basic(basic: i64) -> SalaryInput {
    SalaryInput {
        basic_salary: basic,
        allowance: 1_500_000,
        other_income: 500_000,
        night_shift_hours: 6.0,
        overtime_hours: OvertimeHours { normal_day: 4.0, ..OvertimeHours::default() },
        dependents: 1,
        ..SalaryInput::default()
    }
}

#[test]
fn net_identity_holds_across_a_salary_sweep() {
    let config = RateConfig::default();
    for basic in (0i64..=120).map(|i| i * 1_000_000) {
        let result = compute(&input_with_basic(basic), &config);
        assert_eq!(
            result.net_salary,
            result.gross_salary - result.income_tax - result.insurance.total_deductions,
            "identity broken at basic={basic}"
        );
        assert_eq!(
            result.taxable_income,
            result.gross_salary - result.insurance.total_insurance
        );
    }
}

#[test]
fn gross_and_tax_are_monotone_in_basic_salary() {
    let config = RateConfig::default();
    let mut previous = compute(&input_with_basic(0), &config);
    for basic in (1i64..=120).map(|i| i * 1_000_000) {
        let current = compute(&input_with_basic(basic), &config);
        assert!(
            current.gross_salary >= previous.gross_salary,
            "gross decreased at basic={basic}"
        );
        assert!(
            current.income_tax >= previous.income_tax,
            "tax decreased at basic={basic}"
        );
        previous = current;
    }
}

#[test]
fn persisted_input_recomputes_identically() {
    // The persistence contract: serialise, restore, recompute, and
    // every derived figure matches the original run.
    let config = RateConfig::default();
    let input = input_with_basic(37_500_000);
    let stored = serde_json::to_string(&input).unwrap();
    let restored: SalaryInput = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored, input);
    assert_eq!(compute(&restored, &config), compute(&input, &config));
}

#[test]
fn persisted_form_recomputes_identically() {
    let config = RateConfig::default();
    let form = SalaryForm {
        basic_salary: "37.500.000".to_string(),
        allowance: "2.000.000".to_string(),
        normal_night_overtime: "3.5".to_string(),
        dependents: "2".to_string(),
        ..SalaryForm::default()
    };
    let stored = serde_json::to_string(&form).unwrap();
    let restored: SalaryForm = serde_json::from_str(&stored).unwrap();
    assert_eq!(
        compute(&restored.to_input(), &config),
        compute(&form.to_input(), &config)
    );
}

#[test]
fn result_serialises_with_a_stable_shape() {
    let config = RateConfig::default();
    let result = compute(&input_with_basic(20_000_000), &config);
    let json = serde_json::to_value(&result).unwrap();
    for key in [
        "hourlyRate",
        "basicTotal",
        "nightShiftAllowance",
        "overtime",
        "totalOvertimePay",
        "grossSalary",
        "insurance",
        "taxableIncome",
        "familyDeduction",
        "actualTaxableIncome",
        "incomeTax",
        "netSalary",
    ] {
        assert!(json.get(key).is_some(), "missing result field {key}");
    }
    assert!(json["insurance"].get("totalDeductions").is_some());
    // Breakdown lines carry their display label in the report shape.
    assert_eq!(json["overtime"][0]["label"], "Regular day (150%)");
}

#[test]
fn share_token_input_matches_manual_entry() {
    let config = RateConfig::default();
    let form = SalaryForm {
        basic_salary: "18000000".to_string(),
        holiday_overtime: "8".to_string(),
        ..SalaryForm::default()
    };
    let token = salary_engine::share::encode(&form, "team-pw").unwrap();
    let opened = salary_engine::share::decode(&token).unwrap().unlock("team-pw").unwrap();
    assert_eq!(
        compute(&opened.to_input(), &config),
        compute(&form.to_input(), &config)
    );
}
