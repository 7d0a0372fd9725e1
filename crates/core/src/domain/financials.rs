use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// One fiscal year of raw figures, as entered by the user or confirmed after
/// an automatic extraction. Always validated before it reaches the ratio
/// calculator: `revenue > 0` is an invariant every ratio formula relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub year: i32,
    pub revenue: f64,
    pub fixed_costs: f64,
    pub variable_costs: f64,
    pub payroll: f64,
    pub cash_flow: f64,
    pub notes: String,
}

/// Record shape as it arrives from the outside (form payload, AI extraction).
/// All numeric fields default to zero so a partial extraction still parses;
/// validation decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnvalidatedFinancialRecord {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub fixed_costs: f64,
    #[serde(default)]
    pub variable_costs: f64,
    #[serde(default)]
    pub payroll: f64,
    #[serde(default)]
    pub cash_flow: f64,
    #[serde(default)]
    pub notes: String,
}

pub const MIN_FISCAL_YEAR: i32 = 2000;
pub const MAX_FISCAL_YEAR: i32 = 2100;

impl UnvalidatedFinancialRecord {
    pub fn validate_and_into_record(self) -> anyhow::Result<FinancialRecord> {
        ensure!(
            (MIN_FISCAL_YEAR..=MAX_FISCAL_YEAR).contains(&self.year),
            "fiscal year out of range: {}",
            self.year
        );

        for (name, value) in [
            ("revenue", self.revenue),
            ("fixed_costs", self.fixed_costs),
            ("variable_costs", self.variable_costs),
            ("payroll", self.payroll),
            ("cash_flow", self.cash_flow),
        ] {
            ensure!(value.is_finite(), "{name} must be a finite amount");
            ensure!(value >= 0.0, "{name} must not be negative (got {value})");
        }

        // Every ratio divides by revenue; zero would turn the whole
        // indicator set into NaN/infinity.
        ensure!(self.revenue > 0.0, "revenue must be strictly positive");

        Ok(FinancialRecord {
            year: self.year,
            revenue: self.revenue,
            fixed_costs: self.fixed_costs,
            variable_costs: self.variable_costs,
            payroll: self.payroll,
            cash_flow: self.cash_flow,
            notes: self.notes.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> UnvalidatedFinancialRecord {
        UnvalidatedFinancialRecord {
            year: 2024,
            revenue: 500_000.0,
            fixed_costs: 50_000.0,
            variable_costs: 300_000.0,
            payroll: 100_000.0,
            cash_flow: 20_000.0,
            notes: "  exercice clos au 31/12  ".to_string(),
        }
    }

    #[test]
    fn accepts_valid_record_and_trims_notes() {
        let record = valid_input().validate_and_into_record().unwrap();
        assert_eq!(record.year, 2024);
        assert_eq!(record.notes, "exercice clos au 31/12");
    }

    #[test]
    fn rejects_zero_revenue() {
        let mut input = valid_input();
        input.revenue = 0.0;
        assert!(input.validate_and_into_record().is_err());
    }

    #[test]
    fn rejects_negative_amounts() {
        let mut input = valid_input();
        input.payroll = -1.0;
        assert!(input.validate_and_into_record().is_err());
    }

    #[test]
    fn rejects_non_finite_amounts() {
        let mut input = valid_input();
        input.cash_flow = f64::NAN;
        assert!(input.validate_and_into_record().is_err());

        let mut input = valid_input();
        input.revenue = f64::INFINITY;
        assert!(input.validate_and_into_record().is_err());
    }

    #[test]
    fn rejects_year_out_of_range() {
        let mut input = valid_input();
        input.year = 1999;
        assert!(input.validate_and_into_record().is_err());

        let mut input = valid_input();
        input.year = 0;
        assert!(input.validate_and_into_record().is_err());
    }

    #[test]
    fn partial_json_parses_with_zero_defaults() {
        let parsed: UnvalidatedFinancialRecord =
            serde_json::from_str(r#"{"year": 2023, "revenue": 120000.5}"#).unwrap();
        assert_eq!(parsed.year, 2023);
        assert_eq!(parsed.revenue, 120_000.5);
        assert_eq!(parsed.payroll, 0.0);
        assert_eq!(parsed.notes, "");
    }
}
