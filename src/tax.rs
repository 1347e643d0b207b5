//! Progressive income tax and rate-table handling.
//!
//! The `tax` module owns the bracket type, the marginal-rate walk and
//! the loading/validation of versioned rate tables from disk.  Tax
//! brackets are data, not code: a deployment ships its rates as JSON
//! files and the engine treats the active table as configuration.
//!
//! Rounding policy: unlike the other monetary quantities, which round
//! at the point they are produced, the tax amount accumulates as a
//! float across every bracket and is rounded exactly once at the end.
//! Callers must not round per bracket.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Money, RateConfig};

/// One marginal tax bracket.  `max: None` marks the open-ended top
/// bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Money,
    pub max: Option<Money>,
    pub rate: f64,
}

/// The Vietnamese personal income tax schedule in force for 2024
/// (Resolution 954/2020/UBTVQH14): seven brackets from 5% to 35%.
pub fn vn_2024_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket { min: 0, max: Some(5_000_000), rate: 0.05 },
        TaxBracket { min: 5_000_000, max: Some(10_000_000), rate: 0.10 },
        TaxBracket { min: 10_000_000, max: Some(18_000_000), rate: 0.15 },
        TaxBracket { min: 18_000_000, max: Some(32_000_000), rate: 0.20 },
        TaxBracket { min: 32_000_000, max: Some(52_000_000), rate: 0.25 },
        TaxBracket { min: 52_000_000, max: Some(80_000_000), rate: 0.30 },
        TaxBracket { min: 80_000_000, max: None, rate: 0.35 },
    ]
}

/// Errors raised while loading or validating a rate table.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rate table directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("rate table has no tax brackets")]
    EmptyBrackets,
    #[error("tax brackets are not contiguous at index {0}")]
    NotContiguous(usize),
    #[error("tax bracket rates must be strictly increasing (index {0})")]
    NonIncreasingRate(usize),
    #[error("only the last tax bracket may be unbounded (index {0})")]
    BoundedLastExpected(usize),
}

/// Checks that a bracket table is usable by [`progressive_tax`]: at
/// least one bracket, starting at zero, contiguous and ascending,
/// strictly increasing rates, and only the final bracket open-ended.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), ConfigError> {
    if brackets.is_empty() {
        return Err(ConfigError::EmptyBrackets);
    }
    if brackets[0].min != 0 {
        return Err(ConfigError::NotContiguous(0));
    }
    let last = brackets.len() - 1;
    for (i, bracket) in brackets.iter().enumerate() {
        match bracket.max {
            Some(max) => {
                if i == last {
                    // A bounded top bracket would silently exempt income
                    // above it.
                    return Err(ConfigError::BoundedLastExpected(i));
                }
                if max <= bracket.min || brackets[i + 1].min != max {
                    return Err(ConfigError::NotContiguous(i));
                }
            }
            None => {
                if i != last {
                    return Err(ConfigError::BoundedLastExpected(i));
                }
            }
        }
        if i > 0 && bracket.rate <= brackets[i - 1].rate {
            return Err(ConfigError::NonIncreasingRate(i));
        }
    }
    Ok(())
}

/// Family deduction: the personal tax-free threshold plus a fixed
/// amount per registered dependent.
pub fn family_deduction(dependents: u32, config: &RateConfig) -> Money {
    config.tax_free_threshold + Money::from(dependents) * config.dependent_deduction
}

/// Walks the brackets in ascending order, taxing successive slices of
/// `actual_taxable` at each bracket's marginal rate, and rounds the
/// accumulated amount once at the end.
///
/// `actual_taxable` is income after insurance and family deduction;
/// non-positive values yield zero tax.
pub fn progressive_tax(actual_taxable: Money, brackets: &[TaxBracket]) -> Money {
    let mut tax = 0.0;
    let mut remaining = actual_taxable.max(0) as f64;
    for bracket in brackets {
        if remaining <= 0.0 {
            break;
        }
        let span = match bracket.max {
            Some(max) => (max - bracket.min) as f64,
            None => f64::INFINITY,
        };
        let slice = remaining.min(span);
        tax += slice * bracket.rate;
        remaining -= slice;
    }
    tax.round() as Money
}

/// A named, versioned rate table as stored on disk.
///
/// Files are JSON objects of the shape
/// `{"version": "2024", "config": { ... }}` where `config` follows
/// [`RateConfig`]'s serde representation; omitted config fields take
/// their defaults, so a file only needs to spell out what differs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    pub version: String,
    pub config: RateConfig,
}

/// Loads every `.json` rate table from a directory.
///
/// Files that fail to parse or whose brackets fail validation are
/// skipped with a warning; a missing directory yields an empty list.
/// Duplicate versions are not deduplicated.
pub fn load_rate_tables_from_dir(path: &Path) -> Result<Vec<RateTable>, ConfigError> {
    let mut tables = Vec::new();
    if !path.is_dir() {
        return Ok(tables);
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.path().extension().map(|ext| ext == "json") != Some(true) {
            continue;
        }
        let data = std::fs::read_to_string(entry.path())?;
        match serde_json::from_str::<RateTable>(&data) {
            Ok(table) => match validate_brackets(&table.config.tax_brackets) {
                Ok(()) => tables.push(table),
                Err(err) => {
                    tracing::warn!(path = %entry.path().display(), %err, "skipping invalid rate table");
                }
            },
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), %err, "failed to parse rate table");
            }
        }
    }
    Ok(tables)
}

/// Picks the table with the lexicographically greatest version, the
/// convention being date-shaped versions such as `"2024"` or
/// `"2024-07"`.
pub fn latest(tables: Vec<RateTable>) -> Option<RateTable> {
    tables.into_iter().max_by(|a, b| a.version.cmp(&b.version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_brackets_validate() {
        validate_brackets(&vn_2024_brackets()).unwrap();
    }

    #[test]
    fn first_bracket_boundary() {
        // Exactly at the top of the 5% bracket.
        let tax = progressive_tax(5_000_000, &vn_2024_brackets());
        assert_eq!(tax, 250_000);
    }

    #[test]
    fn second_bracket_boundary() {
        // 5M at 5% plus 5M at 10%.
        let tax = progressive_tax(10_000_000, &vn_2024_brackets());
        assert_eq!(tax, 750_000);
    }

    #[test]
    fn top_bracket_is_open_ended() {
        let brackets = vn_2024_brackets();
        let tax = progressive_tax(100_000_000, &brackets);
        // 250k + 500k + 1.2M + 2.8M + 5M + 8.4M + 20M * 0.35
        assert_eq!(tax, 250_000 + 500_000 + 1_200_000 + 2_800_000 + 5_000_000 + 8_400_000 + 7_000_000);
    }

    #[test]
    fn zero_and_negative_income_tax_nothing() {
        let brackets = vn_2024_brackets();
        assert_eq!(progressive_tax(0, &brackets), 0);
        assert_eq!(progressive_tax(-1_000_000, &brackets), 0);
    }

    #[test]
    fn tax_rounds_once_at_the_end() {
        // A single 5% bracket over an odd amount: 333 * 0.05 = 16.65,
        // rounded once to 17.
        let brackets = vec![TaxBracket { min: 0, max: None, rate: 0.05 }];
        assert_eq!(progressive_tax(333, &brackets), 17);
    }

    #[test]
    fn rejects_gapped_brackets() {
        let brackets = vec![
            TaxBracket { min: 0, max: Some(5_000_000), rate: 0.05 },
            TaxBracket { min: 6_000_000, max: None, rate: 0.10 },
        ];
        assert!(matches!(validate_brackets(&brackets), Err(ConfigError::NotContiguous(0))));
    }

    #[test]
    fn rejects_flat_rates() {
        let brackets = vec![
            TaxBracket { min: 0, max: Some(5_000_000), rate: 0.10 },
            TaxBracket { min: 5_000_000, max: None, rate: 0.10 },
        ];
        assert!(matches!(validate_brackets(&brackets), Err(ConfigError::NonIncreasingRate(1))));
    }

    #[test]
    fn rejects_bounded_top_bracket() {
        let brackets = vec![TaxBracket { min: 0, max: Some(5_000_000), rate: 0.05 }];
        assert!(matches!(validate_brackets(&brackets), Err(ConfigError::BoundedLastExpected(0))));
    }

    #[test]
    fn loads_tables_and_picks_latest() {
        let dir = tempfile::tempdir().unwrap();
        for version in ["2023", "2024"] {
            let table = RateTable {
                version: version.to_string(),
                config: RateConfig::default(),
            };
            let mut file = std::fs::File::create(dir.path().join(format!("vn_{version}.json"))).unwrap();
            file.write_all(serde_json::to_string(&table).unwrap().as_bytes()).unwrap();
        }
        // A junk file should be skipped, not fail the whole load.
        std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();

        let tables = load_rate_tables_from_dir(dir.path()).unwrap();
        assert_eq!(tables.len(), 2);
        assert_eq!(latest(tables).unwrap().version, "2024");
    }

    #[test]
    fn missing_directory_is_empty() {
        let tables = load_rate_tables_from_dir(Path::new("/nonexistent/rate/dir")).unwrap();
        assert!(tables.is_empty());
    }

    #[test]
    fn partial_config_file_takes_defaults() {
        let table: RateTable =
            serde_json::from_str(r#"{"version": "2025", "config": {"unionFeeFixed": 50000}}"#).unwrap();
        assert_eq!(table.config.union_fee_fixed, 50_000);
        assert_eq!(table.config.working_days_per_month, 26.0);
        assert_eq!(table.config.tax_brackets.len(), 7);
    }
}
