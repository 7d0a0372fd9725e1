use crate::domain::profile::Sector;

/// Typical ratios for a sector, in percent of revenue. Static reference data
/// compiled into the application.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorBenchmark {
    pub margin: f64,
    pub cost_ratio: f64,
    pub payroll_ratio: f64,
    pub cash_flow_ratio: f64,
}

/// Used when the user has no profile, no sector, or the generic `Autre`.
pub const DEFAULT_BENCHMARK: SectorBenchmark = SectorBenchmark {
    margin: 35.0,
    cost_ratio: 75.0,
    payroll_ratio: 30.0,
    cash_flow_ratio: 15.0,
};

const COMMERCE: SectorBenchmark = SectorBenchmark {
    margin: 30.0,
    cost_ratio: 80.0,
    payroll_ratio: 25.0,
    cash_flow_ratio: 12.0,
};

const SERVICES: SectorBenchmark = SectorBenchmark {
    margin: 45.0,
    cost_ratio: 70.0,
    payroll_ratio: 45.0,
    cash_flow_ratio: 18.0,
};

const RESTAURATION: SectorBenchmark = SectorBenchmark {
    margin: 65.0,
    cost_ratio: 85.0,
    payroll_ratio: 35.0,
    cash_flow_ratio: 10.0,
};

const BTP: SectorBenchmark = SectorBenchmark {
    margin: 25.0,
    cost_ratio: 82.0,
    payroll_ratio: 30.0,
    cash_flow_ratio: 12.0,
};

const INDUSTRIE: SectorBenchmark = SectorBenchmark {
    margin: 30.0,
    cost_ratio: 78.0,
    payroll_ratio: 28.0,
    cash_flow_ratio: 14.0,
};

const TECHNOLOGIES: SectorBenchmark = SectorBenchmark {
    margin: 50.0,
    cost_ratio: 65.0,
    payroll_ratio: 40.0,
    cash_flow_ratio: 25.0,
};

const SANTE: SectorBenchmark = SectorBenchmark {
    margin: 40.0,
    cost_ratio: 72.0,
    payroll_ratio: 42.0,
    cash_flow_ratio: 16.0,
};

const TRANSPORT: SectorBenchmark = SectorBenchmark {
    margin: 20.0,
    cost_ratio: 85.0,
    payroll_ratio: 35.0,
    cash_flow_ratio: 10.0,
};

/// Resolve the benchmark to compare against. The label is returned only when
/// a sector-specific benchmark applies, so recommendation text can name it.
pub fn benchmark_for(sector: Option<Sector>) -> (&'static SectorBenchmark, Option<&'static str>) {
    match sector {
        None | Some(Sector::Autre) => (&DEFAULT_BENCHMARK, None),
        Some(s) => {
            let bench = match s {
                Sector::Commerce => &COMMERCE,
                Sector::Services => &SERVICES,
                Sector::Restauration => &RESTAURATION,
                Sector::Btp => &BTP,
                Sector::Industrie => &INDUSTRIE,
                Sector::Technologies => &TECHNOLOGIES,
                Sector::Sante => &SANTE,
                Sector::Transport => &TRANSPORT,
                Sector::Autre => unreachable!(),
            };
            (bench, Some(s.label()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_sector_uses_default_without_label() {
        let (bench, label) = benchmark_for(None);
        assert_eq!(*bench, DEFAULT_BENCHMARK);
        assert_eq!(label, None);
    }

    #[test]
    fn autre_uses_default_without_label() {
        let (bench, label) = benchmark_for(Some(Sector::Autre));
        assert_eq!(*bench, DEFAULT_BENCHMARK);
        assert_eq!(label, None);
    }

    #[test]
    fn technologies_benchmark_values() {
        let (bench, label) = benchmark_for(Some(Sector::Technologies));
        assert_eq!(bench.margin, 50.0);
        assert_eq!(bench.cost_ratio, 65.0);
        assert_eq!(bench.payroll_ratio, 40.0);
        assert_eq!(bench.cash_flow_ratio, 25.0);
        assert_eq!(label, Some("Technologies"));
    }

    #[test]
    fn every_named_sector_has_a_benchmark() {
        for sector in Sector::ALL {
            let (bench, _) = benchmark_for(Some(sector));
            assert!(bench.margin > 0.0);
            assert!(bench.cost_ratio > 0.0);
        }
    }
}
