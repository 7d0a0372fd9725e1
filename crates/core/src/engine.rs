use crate::domain::benchmark::{benchmark_for, SectorBenchmark};
use crate::domain::financials::FinancialRecord;
use crate::domain::profile::CompanyProfile;
use crate::domain::ratios::Ratios;
use crate::domain::recommendation::{format_eur, ActionItem, Effort, Impact, Recommendation};

/// How far a ratio may drift from its benchmark before a rule fires, in
/// percentage points.
const BENCHMARK_TOLERANCE: f64 = 5.0;

const FIXED_COST_RATIO_CEILING: f64 = 35.0;
const PROFITABILITY_FLOOR: f64 = 10.0;
const REVENUE_FLOOR: f64 = 100_000.0;
const VARIABLE_COST_RATIO_CEILING: f64 = 50.0;

/// Evaluate the full rule table against one year of figures and return the
/// advice list, best priority first (high impact, low effort on top).
///
/// Pure: identical (record, profile) inputs always produce the identical
/// list in the identical order.
pub fn generate_recommendations(
    record: &FinancialRecord,
    profile: Option<&CompanyProfile>,
) -> anyhow::Result<Vec<Recommendation>> {
    let ratios = Ratios::compute(record)?;
    let (bench, bench_label) = benchmark_for(profile.and_then(|p| p.sector));

    let mut recs = evaluate_rules(record, &ratios, bench, bench_label);

    // Stable sort: rules with equal priority keep their table order.
    recs.sort_by(|a, b| b.priority().cmp(&a.priority()));
    Ok(recs)
}

fn evaluate_rules(
    record: &FinancialRecord,
    ratios: &Ratios,
    bench: &SectorBenchmark,
    bench_label: Option<&str>,
) -> Vec<Recommendation> {
    let revenue = record.revenue;
    let mut recs = Vec::new();

    let reference = |target: f64| match bench_label {
        Some(label) => format!("{target:.1} % en moyenne dans le secteur {label}"),
        None => format!("une norme attendue de {target:.1} %"),
    };
    let owned_label = bench_label.map(str::to_string);

    // Rule 1: commercial margin below the sector benchmark.
    if ratios.margin < bench.margin - BENCHMARK_TOLERANCE {
        let gap = bench.margin - ratios.margin;
        recs.push(Recommendation {
            id: "margin".to_string(),
            title: "Améliorer la marge commerciale".to_string(),
            description: format!(
                "Votre taux de marge est de {:.1} %, contre {}, soit un écart de {gap:.1} points. \
                 Envisagez d'optimiser vos prix de vente ou de renégocier vos achats.",
                ratios.margin,
                reference(bench.margin),
            ),
            impact: Impact::High,
            effort: Effort::Medium,
            category: "Rentabilité".to_string(),
            current_value: ratios.margin,
            target_value: bench.margin,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} de marge supplémentaire par an",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: owned_label.clone(),
            actions: vec![
                ActionItem::new(
                    "Revoir la grille tarifaire",
                    "Comparez vos prix à ceux du marché et identifiez les prestations sous-facturées.",
                ),
                ActionItem::new(
                    "Renégocier les achats",
                    "Remettez en concurrence vos principaux fournisseurs sur les volumes récurrents.",
                ),
                ActionItem::new(
                    "Supprimer les offres déficitaires",
                    "Repérez les produits vendus à perte et ajustez ou retirez-les du catalogue.",
                ),
            ],
        });
    }

    // Rule 2: total costs heavier than the benchmark allows.
    if ratios.cost_ratio > bench.cost_ratio + BENCHMARK_TOLERANCE {
        let gap = ratios.cost_ratio - bench.cost_ratio;
        recs.push(Recommendation {
            id: "cost-ratio".to_string(),
            title: "Réduire le poids des charges".to_string(),
            description: format!(
                "Vos charges représentent {:.1} % de votre chiffre d'affaires, contre {}, \
                 soit un excès de {gap:.1} points. Identifiez les postes de dépenses non \
                 essentiels et les alternatives moins coûteuses.",
                ratios.cost_ratio,
                reference(bench.cost_ratio),
            ),
            impact: Impact::High,
            effort: Effort::Medium,
            category: "Coûts".to_string(),
            current_value: ratios.cost_ratio,
            target_value: bench.cost_ratio,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} d'économies par an",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: owned_label.clone(),
            actions: vec![
                ActionItem::new(
                    "Cartographier les dépenses",
                    "Classez chaque poste de charge par montant et par utilité réelle.",
                ),
                ActionItem::new(
                    "Résilier les contrats dormants",
                    "Abonnements, licences et services peu utilisés sont les premières économies.",
                ),
                ActionItem::new(
                    "Mutualiser les moyens",
                    "Partagez locaux, matériel ou prestataires avec d'autres structures.",
                ),
                ActionItem::new(
                    "Mettre en concurrence",
                    "Redemandez des devis sur les trois postes de charges les plus lourds.",
                ),
            ],
        });
    }

    // Rule 3: payroll share above the benchmark.
    if ratios.payroll_ratio > bench.payroll_ratio + BENCHMARK_TOLERANCE {
        let gap = ratios.payroll_ratio - bench.payroll_ratio;
        recs.push(Recommendation {
            id: "payroll".to_string(),
            title: "Optimiser la masse salariale".to_string(),
            description: format!(
                "Votre masse salariale représente {:.1} % de votre chiffre d'affaires, contre {}, \
                 soit {gap:.1} points au-dessus. Analysez la productivité des équipes et \
                 l'automatisation de certaines tâches.",
                ratios.payroll_ratio,
                reference(bench.payroll_ratio),
            ),
            impact: Impact::High,
            effort: Effort::High,
            category: "Ressources Humaines".to_string(),
            current_value: ratios.payroll_ratio,
            target_value: bench.payroll_ratio,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} de charges de personnel par an",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: owned_label.clone(),
            actions: vec![
                ActionItem::new(
                    "Mesurer la productivité",
                    "Rapportez le chiffre d'affaires généré à l'effectif de chaque activité.",
                ),
                ActionItem::new(
                    "Automatiser les tâches répétitives",
                    "Saisie, facturation et relances se prêtent bien à l'outillage.",
                ),
                ActionItem::new(
                    "Adapter les contrats à l'activité",
                    "Recourez à l'intérim ou au temps partiel pour absorber la saisonnalité.",
                ),
            ],
        });
    }

    // Rule 4: cash position thin relative to activity.
    if ratios.cash_flow_ratio < bench.cash_flow_ratio - BENCHMARK_TOLERANCE {
        let gap = bench.cash_flow_ratio - ratios.cash_flow_ratio;
        recs.push(Recommendation {
            id: "cash-flow".to_string(),
            title: "Améliorer la trésorerie".to_string(),
            description: format!(
                "Votre trésorerie représente {:.1} % de votre chiffre d'affaires, contre {}, \
                 soit {gap:.1} points de retard. Optimisez vos délais de paiement clients et \
                 négociez avec vos fournisseurs.",
                ratios.cash_flow_ratio,
                reference(bench.cash_flow_ratio),
            ),
            impact: Impact::High,
            effort: Effort::Medium,
            category: "Trésorerie".to_string(),
            current_value: ratios.cash_flow_ratio,
            target_value: bench.cash_flow_ratio,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} de trésorerie supplémentaire",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: owned_label.clone(),
            actions: vec![
                ActionItem::new(
                    "Raccourcir les délais clients",
                    "Facturez dès la livraison et relancez systématiquement à l'échéance.",
                ),
                ActionItem::new(
                    "Étaler les paiements fournisseurs",
                    "Négociez 45 ou 60 jours sur les achats récurrents.",
                ),
                ActionItem::new(
                    "Demander des acomptes",
                    "Sur les commandes importantes, 30 % à la commande sécurise le besoin en fonds.",
                ),
            ],
        });
    }

    // Rule 5: fixed costs above the structural ceiling.
    if ratios.fixed_cost_ratio > FIXED_COST_RATIO_CEILING {
        let gap = ratios.fixed_cost_ratio - FIXED_COST_RATIO_CEILING;
        recs.push(Recommendation {
            id: "fixed-costs".to_string(),
            title: "Réduire les charges fixes".to_string(),
            description: format!(
                "Vos charges fixes représentent {:.1} % de votre chiffre d'affaires, au-delà du \
                 seuil de {FIXED_COST_RATIO_CEILING:.1} %. Étudiez la renégociation de vos \
                 contrats (loyer, assurances, abonnements) ou la mutualisation de certaines \
                 ressources.",
                ratios.fixed_cost_ratio,
            ),
            impact: Impact::Medium,
            effort: Effort::Medium,
            category: "Structure de coûts".to_string(),
            current_value: ratios.fixed_cost_ratio,
            target_value: FIXED_COST_RATIO_CEILING,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} de charges fixes en moins par an",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Renégocier le bail",
                    "Un loyer revu de 10 % pèse directement sur le point mort.",
                ),
                ActionItem::new(
                    "Regrouper les assurances",
                    "Un courtier unique obtient souvent de meilleures conditions multi-contrats.",
                ),
                ActionItem::new(
                    "Passer en coûts variables",
                    "Location de matériel et sous-traitance transforment du fixe en variable.",
                ),
            ],
        });
    }

    // Rule 6: operating profitability under the floor.
    if ratios.profitability < PROFITABILITY_FLOOR {
        let gap = PROFITABILITY_FLOOR - ratios.profitability;
        recs.push(Recommendation {
            id: "profitability".to_string(),
            title: "Restaurer la rentabilité d'exploitation".to_string(),
            description: format!(
                "Votre rentabilité d'exploitation est de {:.1} %, sous le plancher de \
                 {PROFITABILITY_FLOOR:.1} %. Votre excédent brut d'exploitation ({}) laisse peu \
                 de marge pour investir ou absorber un imprévu.",
                ratios.profitability,
                format_eur(ratios.ebe),
            ),
            impact: Impact::High,
            effort: Effort::High,
            category: "Rentabilité".to_string(),
            current_value: ratios.profitability,
            target_value: PROFITABILITY_FLOOR,
            unit: "%".to_string(),
            potential_gain: format!("{gap:.1} points de rentabilité à regagner"),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Construire un budget prévisionnel",
                    "Fixez un objectif d'EBE et suivez-le mensuellement.",
                ),
                ActionItem::new(
                    "Agir sur prix et charges en même temps",
                    "Un point de marge gagné et un point de charge économisé font deux points d'EBE.",
                ),
                ActionItem::new(
                    "Abandonner les activités déficitaires",
                    "Mesurez la contribution de chaque activité et arbitrez.",
                ),
            ],
        });
    }

    // Rule 7: activity below critical size.
    if revenue < REVENUE_FLOOR {
        recs.push(Recommendation {
            id: "growth".to_string(),
            title: "Développer le chiffre d'affaires".to_string(),
            description: format!(
                "Avec un chiffre d'affaires de {}, votre activité reste sous le seuil de {} : \
                 chaque charge fixe pèse lourd. Diversifiez vos offres ou explorez de nouveaux \
                 marchés pour diluer vos coûts.",
                format_eur(revenue),
                format_eur(REVENUE_FLOOR),
            ),
            impact: Impact::High,
            effort: Effort::High,
            category: "Croissance".to_string(),
            current_value: revenue,
            target_value: REVENUE_FLOOR,
            unit: "€".to_string(),
            potential_gain: format!(
                "{} de chiffre d'affaires à aller chercher",
                format_eur(REVENUE_FLOOR - revenue)
            ),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Relancer les clients existants",
                    "Vendre à un client acquis coûte bien moins cher que d'en conquérir un nouveau.",
                ),
                ActionItem::new(
                    "Élargir la zone de chalandise",
                    "Vente en ligne ou partenariats locaux étendent la portée sans embauche.",
                ),
                ActionItem::new(
                    "Packager une offre récurrente",
                    "Un abonnement ou un contrat d'entretien lisse le chiffre d'affaires.",
                ),
            ],
        });
    }

    // Rule 8: purchases dominating the cost structure.
    if ratios.variable_cost_ratio > VARIABLE_COST_RATIO_CEILING {
        let gap = ratios.variable_cost_ratio - VARIABLE_COST_RATIO_CEILING;
        recs.push(Recommendation {
            id: "variable-costs".to_string(),
            title: "Maîtriser les achats et charges variables".to_string(),
            description: format!(
                "Vos charges variables absorbent {:.1} % de votre chiffre d'affaires, au-delà du \
                 seuil de {VARIABLE_COST_RATIO_CEILING:.1} %. Chaque vente finance d'abord ses \
                 propres coûts avant de couvrir la structure.",
                ratios.variable_cost_ratio,
            ),
            impact: Impact::Medium,
            effort: Effort::Medium,
            category: "Achats".to_string(),
            current_value: ratios.variable_cost_ratio,
            target_value: VARIABLE_COST_RATIO_CEILING,
            unit: "%".to_string(),
            potential_gain: format!(
                "Jusqu'à {} d'achats économisés par an",
                format_eur(gap / 100.0 * revenue)
            ),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Massifier les commandes",
                    "Regroupez les achats pour obtenir des remises sur volume.",
                ),
                ActionItem::new(
                    "Chasser la démarque",
                    "Pertes, casse et invendus gonflent silencieusement les charges variables.",
                ),
                ActionItem::new(
                    "Revoir le sourcing",
                    "Un second fournisseur référencé rééquilibre la négociation.",
                ),
            ],
        });
    }

    recs.extend(standing_recommendations());
    recs
}

// Always-on advice: generic levers that apply whatever the figures say.
fn standing_recommendations() -> Vec<Recommendation> {
    let generic_gain = "Variable selon les actions mises en œuvre".to_string();

    vec![
        Recommendation {
            id: "financing".to_string(),
            title: "Sécuriser vos financements".to_string(),
            description: "Anticipez vos besoins de financement avant qu'ils ne deviennent \
                          urgents : une ligne de crédit négociée à froid coûte moins cher \
                          qu'un découvert subi."
                .to_string(),
            impact: Impact::Medium,
            effort: Effort::Medium,
            category: "Financement".to_string(),
            current_value: 0.0,
            target_value: 0.0,
            unit: String::new(),
            potential_gain: generic_gain.clone(),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Rencontrer votre banquier hors besoin",
                    "Présentez vos chiffres une fois par an même sans demande en cours.",
                ),
                ActionItem::new(
                    "Comparer les solutions de financement",
                    "Affacturage, crédit-bail et prêts garantis se comparent sur le coût total.",
                ),
                ActionItem::new(
                    "Constituer un dossier à jour",
                    "Bilans, prévisionnel et carnet de commandes prêts à présenter.",
                ),
            ],
        },
        Recommendation {
            id: "marketing".to_string(),
            title: "Renforcer votre visibilité commerciale".to_string(),
            description: "Des actions commerciales régulières et peu coûteuses (recommandation, \
                          avis clients, présence locale) soutiennent le chiffre d'affaires sans \
                          gros budget."
                .to_string(),
            impact: Impact::Medium,
            effort: Effort::Low,
            category: "Marketing".to_string(),
            current_value: 0.0,
            target_value: 0.0,
            unit: String::new(),
            potential_gain: generic_gain.clone(),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Solliciter des avis clients",
                    "Demandez un avis après chaque prestation réussie.",
                ),
                ActionItem::new(
                    "Animer un canal simple",
                    "Une page à jour avec horaires, photos et actualités suffit souvent.",
                ),
                ActionItem::new(
                    "Mettre en place un parrainage",
                    "Récompensez les clients qui vous recommandent.",
                ),
            ],
        },
        Recommendation {
            id: "payroll-charges".to_string(),
            title: "Passer en revue vos charges sociales".to_string(),
            description: "Exonérations, aides à l'embauche et dispositifs sectoriels évoluent \
                          chaque année ; une revue annuelle avec votre expert-comptable évite \
                          d'en laisser passer."
                .to_string(),
            impact: Impact::Low,
            effort: Effort::Medium,
            category: "Charges sociales".to_string(),
            current_value: 0.0,
            target_value: 0.0,
            unit: String::new(),
            potential_gain: generic_gain.clone(),
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Vérifier les exonérations applicables",
                    "Zones d'activité, taille d'entreprise et types de contrats ouvrent des droits.",
                ),
                ActionItem::new(
                    "Auditer les déclarations",
                    "Les assiettes et taux déclarés méritent un contrôle annuel.",
                ),
                ActionItem::new(
                    "Étudier l'épargne salariale",
                    "Intéressement et participation sont moins chargés qu'une prime classique.",
                ),
            ],
        },
        Recommendation {
            id: "opex".to_string(),
            title: "Rationaliser vos frais généraux".to_string(),
            description: "Téléphonie, énergie, fournitures, déplacements : les petits postes \
                          cumulés représentent souvent plusieurs points de chiffre d'affaires."
                .to_string(),
            impact: Impact::Medium,
            effort: Effort::Low,
            category: "Frais généraux".to_string(),
            current_value: 0.0,
            target_value: 0.0,
            unit: String::new(),
            potential_gain: generic_gain,
            benchmark_label: None,
            actions: vec![
                ActionItem::new(
                    "Lister les abonnements actifs",
                    "Un inventaire annuel révèle presque toujours des doublons.",
                ),
                ActionItem::new(
                    "Renégocier énergie et télécoms",
                    "Les contrats de plus de deux ans sont rarement au prix du marché.",
                ),
                ActionItem::new(
                    "Encadrer les notes de frais",
                    "Une politique écrite simple évite les dérives.",
                ),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::profile::{CompanyProfile, Sector};

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

    fn profile_with_sector(sector: Sector) -> CompanyProfile {
        CompanyProfile {
            company_name: "Test SARL".to_string(),
            sector: Some(sector),
            employee_count: 5,
            annual_revenue: 500_000.0,
            fiscal_regime: None,
        }
    }

    fn ids(recs: &[Recommendation]) -> Vec<&str> {
        recs.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn reference_scenario_without_profile() {
        // revenue 500k, fixed 50k, variable 300k, payroll 100k, cash 20k,
        // default benchmark 35/75/30/15.
        let recs = generate_recommendations(
            &record(500_000.0, 50_000.0, 300_000.0, 100_000.0, 20_000.0),
            None,
        )
        .unwrap();
        let ids = ids(&recs);

        // margin 40 >= 30: no margin rule. cost_ratio 90 > 80: fires.
        // payroll_ratio 20 <= 35: no. cash_flow_ratio 4 < 10: fires.
        // fixed_cost_ratio 10 <= 35: no. profitability 10, not < 10: no.
        // revenue 500k >= 100k: no. variable_cost_ratio 60 > 50: fires.
        assert!(ids.contains(&"cost-ratio"));
        assert!(ids.contains(&"cash-flow"));
        assert!(ids.contains(&"variable-costs"));
        assert!(!ids.contains(&"margin"));
        assert!(!ids.contains(&"payroll"));
        assert!(!ids.contains(&"fixed-costs"));
        assert!(!ids.contains(&"profitability"));
        assert!(!ids.contains(&"growth"));

        // The four standing recommendations are always present.
        for id in ["financing", "marketing", "payroll-charges", "opex"] {
            assert!(ids.contains(&id), "missing standing recommendation {id}");
        }
    }

    #[test]
    fn sector_benchmark_changes_the_verdict() {
        // margin 40 % passes the default benchmark (35 - 5 = 30) but fails
        // the Technologies one (50 - 5 = 45).
        let rec = record(500_000.0, 50_000.0, 300_000.0, 100_000.0, 130_000.0);

        let default_ids: Vec<String> = generate_recommendations(&rec, None)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert!(!default_ids.contains(&"margin".to_string()));

        let profile = profile_with_sector(Sector::Technologies);
        let recs = generate_recommendations(&rec, Some(&profile)).unwrap();
        let margin_rec = recs.iter().find(|r| r.id == "margin").unwrap();
        assert_eq!(margin_rec.benchmark_label.as_deref(), Some("Technologies"));
        assert!(margin_rec.description.contains("Technologies"));
        assert!(margin_rec.description.contains("40.0"));
    }

    #[test]
    fn margin_exactly_at_threshold_does_not_trigger() {
        // Commerce benchmark margin is 30, threshold 25. A margin of exactly
        // 25.0 (dyadic: 25 000 / 100 000) must not fire the rule.
        let profile = profile_with_sector(Sector::Commerce);
        let at_threshold = record(100_000.0, 1_000.0, 75_000.0, 1_000.0, 50_000.0);
        let recs = generate_recommendations(&at_threshold, Some(&profile)).unwrap();
        assert!(!ids(&recs).contains(&"margin"));

        let below_threshold = record(100_000.0, 1_000.0, 75_010.0, 1_000.0, 50_000.0);
        let recs = generate_recommendations(&below_threshold, Some(&profile)).unwrap();
        assert!(ids(&recs).contains(&"margin"));
    }

    #[test]
    fn output_is_deterministic() {
        let rec = record(80_000.0, 40_000.0, 30_000.0, 20_000.0, 1_000.0);
        let profile = profile_with_sector(Sector::Restauration);
        let a = generate_recommendations(&rec, Some(&profile)).unwrap();
        let b = generate_recommendations(&rec, Some(&profile)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sorted_by_priority_quick_wins_first() {
        let recs = generate_recommendations(
            &record(500_000.0, 50_000.0, 300_000.0, 100_000.0, 20_000.0),
            None,
        )
        .unwrap();

        let priorities: Vec<u8> = recs.iter().map(|r| r.priority()).collect();
        let mut sorted = priorities.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(priorities, sorted);

        // marketing (medium impact, low effort) = 6 ties with the high/medium
        // rules; cost-ratio and cash-flow keep their table order among
        // themselves.
        let pos = |id: &str| recs.iter().position(|r| r.id == id).unwrap();
        assert!(pos("cost-ratio") < pos("cash-flow"));
    }

    #[test]
    fn equal_priority_keeps_rule_order() {
        // Trigger rules 2 and 4 (both high/medium = 6) plus the standing
        // entries; among equals the evaluation order must survive the sort.
        let recs = generate_recommendations(
            &record(500_000.0, 50_000.0, 300_000.0, 100_000.0, 20_000.0),
            None,
        )
        .unwrap();
        let sixes: Vec<&str> = recs
            .iter()
            .filter(|r| r.priority() == 6)
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(sixes, vec!["cost-ratio", "cash-flow", "marketing", "opex"]);
    }

    #[test]
    fn zero_revenue_is_rejected_not_evaluated() {
        let err =
            generate_recommendations(&record(0.0, 10.0, 10.0, 10.0, 10.0), None).unwrap_err();
        assert!(err.to_string().contains("revenue"));
    }

    #[test]
    fn small_revenue_triggers_growth_rule() {
        let recs =
            generate_recommendations(&record(60_000.0, 5_000.0, 10_000.0, 5_000.0, 20_000.0), None)
                .unwrap();
        let growth = recs.iter().find(|r| r.id == "growth").unwrap();
        assert!(growth.potential_gain.contains("40 000 €"));
        assert!(growth.description.contains("60 000 €"));
    }

    #[test]
    fn every_recommendation_carries_actions() {
        let recs = generate_recommendations(
            &record(80_000.0, 40_000.0, 45_000.0, 30_000.0, 0.0),
            None,
        )
        .unwrap();
        assert!(!recs.is_empty());
        for rec in &recs {
            assert!(
                (3..=4).contains(&rec.actions.len()),
                "recommendation {} has {} actions",
                rec.id,
                rec.actions.len()
            );
        }
    }
}
