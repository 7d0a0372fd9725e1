use crate::domain::financials::FinancialRecord;
use anyhow::ensure;
use serde::{Deserialize, Serialize};

/// The indicator set derived from one year of figures. Percentages unless
/// noted; `total_costs` and `ebe` are euro amounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ratios {
    pub total_costs: f64,
    pub margin: f64,
    pub cost_ratio: f64,
    pub payroll_ratio: f64,
    pub fixed_cost_ratio: f64,
    pub variable_cost_ratio: f64,
    pub cash_flow_ratio: f64,
    /// Excédent brut d'exploitation: revenue minus all costs, in euros.
    pub ebe: f64,
    pub profitability: f64,
}

impl Ratios {
    /// Pure derivation of the indicator set. Refuses to divide by a zero or
    /// negative revenue instead of letting NaN/infinity reach callers.
    pub fn compute(record: &FinancialRecord) -> anyhow::Result<Ratios> {
        for (name, value) in [
            ("revenue", record.revenue),
            ("fixed_costs", record.fixed_costs),
            ("variable_costs", record.variable_costs),
            ("payroll", record.payroll),
            ("cash_flow", record.cash_flow),
        ] {
            ensure!(value.is_finite() && value >= 0.0, "{name} must be a non-negative amount");
        }
        ensure!(
            record.revenue > 0.0,
            "cannot compute ratios: revenue must be strictly positive"
        );

        let revenue = record.revenue;
        let total_costs = record.fixed_costs + record.variable_costs + record.payroll;
        let ebe = revenue - total_costs;

        Ok(Ratios {
            total_costs,
            margin: (revenue - record.variable_costs) / revenue * 100.0,
            cost_ratio: total_costs / revenue * 100.0,
            payroll_ratio: record.payroll / revenue * 100.0,
            fixed_cost_ratio: record.fixed_costs / revenue * 100.0,
            variable_cost_ratio: record.variable_costs / revenue * 100.0,
            cash_flow_ratio: record.cash_flow / revenue * 100.0,
            ebe,
            profitability: ebe / revenue * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        revenue: f64,
        fixed_costs: f64,
        variable_costs: f64,
        payroll: f64,
        cash_flow: f64,
    ) -> FinancialRecord {
        FinancialRecord {
            year: 2024,
            revenue,
            fixed_costs,
            variable_costs,
            payroll,
            cash_flow,
            notes: String::new(),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn computes_reference_scenario() {
        let r = Ratios::compute(&record(500_000.0, 50_000.0, 300_000.0, 100_000.0, 20_000.0))
            .unwrap();

        assert_close(r.total_costs, 450_000.0);
        assert_close(r.margin, 40.0);
        assert_close(r.cost_ratio, 90.0);
        assert_close(r.payroll_ratio, 20.0);
        assert_close(r.fixed_cost_ratio, 10.0);
        assert_close(r.variable_cost_ratio, 60.0);
        assert_close(r.cash_flow_ratio, 4.0);
        assert_close(r.ebe, 50_000.0);
        assert_close(r.profitability, 10.0);
    }

    #[test]
    fn margin_and_variable_cost_ratio_sum_to_hundred() {
        let r = Ratios::compute(&record(730_000.0, 41_000.0, 233_000.0, 87_000.0, 12_000.0))
            .unwrap();
        assert_close(r.margin + r.variable_cost_ratio, 100.0);
    }

    #[test]
    fn profitability_is_complement_of_cost_ratio() {
        let r = Ratios::compute(&record(730_000.0, 41_000.0, 233_000.0, 87_000.0, 12_000.0))
            .unwrap();
        assert_close(r.profitability, 100.0 - r.cost_ratio);
    }

    #[test]
    fn rejects_zero_revenue() {
        let err = Ratios::compute(&record(0.0, 10.0, 10.0, 10.0, 10.0)).unwrap_err();
        assert!(err.to_string().contains("revenue"));
    }

    #[test]
    fn rejects_non_finite_inputs() {
        assert!(Ratios::compute(&record(100.0, f64::NAN, 0.0, 0.0, 0.0)).is_err());
        assert!(Ratios::compute(&record(100.0, 0.0, f64::INFINITY, 0.0, 0.0)).is_err());
    }

    #[test]
    fn never_returns_non_finite_values() {
        let r = Ratios::compute(&record(1.0, 0.0, 0.0, 0.0, 0.0)).unwrap();
        for v in [
            r.total_costs,
            r.margin,
            r.cost_ratio,
            r.payroll_ratio,
            r.fixed_cost_ratio,
            r.variable_cost_ratio,
            r.cash_flow_ratio,
            r.ebe,
            r.profitability,
        ] {
            assert!(v.is_finite());
        }
    }
}
