use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};

/// Business sectors offered in the company profile form. Each variant maps to
/// an entry in the benchmark table; `Autre` deliberately has no dedicated
/// benchmark and falls back to the default one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    #[serde(rename = "Commerce")]
    Commerce,
    #[serde(rename = "Services")]
    Services,
    #[serde(rename = "Restauration")]
    Restauration,
    #[serde(rename = "BTP")]
    Btp,
    #[serde(rename = "Industrie")]
    Industrie,
    #[serde(rename = "Technologies")]
    Technologies,
    #[serde(rename = "Santé")]
    Sante,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Autre")]
    Autre,
}

impl Sector {
    pub const ALL: [Sector; 9] = [
        Sector::Commerce,
        Sector::Services,
        Sector::Restauration,
        Sector::Btp,
        Sector::Industrie,
        Sector::Technologies,
        Sector::Sante,
        Sector::Transport,
        Sector::Autre,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Sector::Commerce => "Commerce",
            Sector::Services => "Services",
            Sector::Restauration => "Restauration",
            Sector::Btp => "BTP",
            Sector::Industrie => "Industrie",
            Sector::Technologies => "Technologies",
            Sector::Sante => "Santé",
            Sector::Transport => "Transport",
            Sector::Autre => "Autre",
        }
    }

    pub fn from_label(label: &str) -> Option<Sector> {
        Sector::ALL.iter().copied().find(|s| s.label() == label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FiscalRegime {
    #[serde(rename = "Micro-entreprise")]
    MicroEntreprise,
    #[serde(rename = "Réel simplifié")]
    ReelSimplifie,
    #[serde(rename = "Réel normal")]
    ReelNormal,
    #[serde(rename = "IS (Impôt sur les sociétés)")]
    Is,
    #[serde(rename = "IR (Impôt sur le revenu)")]
    Ir,
}

impl FiscalRegime {
    pub const ALL: [FiscalRegime; 5] = [
        FiscalRegime::MicroEntreprise,
        FiscalRegime::ReelSimplifie,
        FiscalRegime::ReelNormal,
        FiscalRegime::Is,
        FiscalRegime::Ir,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FiscalRegime::MicroEntreprise => "Micro-entreprise",
            FiscalRegime::ReelSimplifie => "Réel simplifié",
            FiscalRegime::ReelNormal => "Réel normal",
            FiscalRegime::Is => "IS (Impôt sur les sociétés)",
            FiscalRegime::Ir => "IR (Impôt sur le revenu)",
        }
    }

    pub fn from_label(label: &str) -> Option<FiscalRegime> {
        FiscalRegime::ALL.iter().copied().find(|r| r.label() == label)
    }
}

/// At most one profile per user, upserted as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: String,
    pub sector: Option<Sector>,
    pub employee_count: i32,
    pub annual_revenue: f64,
    pub fiscal_regime: Option<FiscalRegime>,
}

/// Profile payload as submitted by the client; sector and regime arrive as
/// the free-form labels the form sends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnvalidatedCompanyProfile {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub employee_count: i32,
    #[serde(default)]
    pub annual_revenue: f64,
    #[serde(default)]
    pub fiscal_regime: Option<String>,
}

impl UnvalidatedCompanyProfile {
    pub fn validate_and_into_profile(self) -> anyhow::Result<CompanyProfile> {
        let company_name = self.company_name.trim().to_string();
        ensure!(!company_name.is_empty(), "company_name must be non-empty");

        ensure!(
            self.employee_count >= 0,
            "employee_count must not be negative (got {})",
            self.employee_count
        );
        ensure!(
            self.annual_revenue.is_finite() && self.annual_revenue >= 0.0,
            "annual_revenue must be a non-negative amount"
        );

        let sector = match self.sector.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => match Sector::from_label(label) {
                Some(sector) => Some(sector),
                None => bail!("unknown sector: {label}"),
            },
        };

        let fiscal_regime = match self.fiscal_regime.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(label) => match FiscalRegime::from_label(label) {
                Some(regime) => Some(regime),
                None => bail!("unknown fiscal regime: {label}"),
            },
        };

        Ok(CompanyProfile {
            company_name,
            sector,
            employee_count: self.employee_count,
            annual_revenue: self.annual_revenue,
            fiscal_regime,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_labels_round_trip() {
        for sector in Sector::ALL {
            assert_eq!(Sector::from_label(sector.label()), Some(sector));
        }
    }

    #[test]
    fn accepts_profile_with_known_sector() {
        let profile = UnvalidatedCompanyProfile {
            company_name: " Boulangerie Martin ".to_string(),
            sector: Some("Commerce".to_string()),
            employee_count: 4,
            annual_revenue: 320_000.0,
            fiscal_regime: Some("Réel simplifié".to_string()),
        }
        .validate_and_into_profile()
        .unwrap();

        assert_eq!(profile.company_name, "Boulangerie Martin");
        assert_eq!(profile.sector, Some(Sector::Commerce));
        assert_eq!(profile.fiscal_regime, Some(FiscalRegime::ReelSimplifie));
    }

    #[test]
    fn rejects_unknown_sector() {
        let res = UnvalidatedCompanyProfile {
            company_name: "Acme".to_string(),
            sector: Some("Aérospatiale".to_string()),
            ..Default::default()
        }
        .validate_and_into_profile();
        assert!(res.is_err());
    }

    #[test]
    fn empty_sector_string_means_no_sector() {
        let profile = UnvalidatedCompanyProfile {
            company_name: "Acme".to_string(),
            sector: Some("".to_string()),
            ..Default::default()
        }
        .validate_and_into_profile()
        .unwrap();
        assert_eq!(profile.sector, None);
    }

    #[test]
    fn rejects_blank_company_name() {
        let res = UnvalidatedCompanyProfile {
            company_name: "   ".to_string(),
            ..Default::default()
        }
        .validate_and_into_profile();
        assert!(res.is_err());
    }

    #[test]
    fn rejects_negative_employee_count() {
        let res = UnvalidatedCompanyProfile {
            company_name: "Acme".to_string(),
            employee_count: -3,
            ..Default::default()
        }
        .validate_and_into_profile();
        assert!(res.is_err());
    }
}
