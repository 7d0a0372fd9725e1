use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

impl Impact {
    fn weight(self) -> u8 {
        match self {
            Impact::High => 3,
            Impact::Medium => 2,
            Impact::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    High,
    Medium,
    Low,
}

impl Effort {
    // Inverted on purpose: low effort scores highest so that quick wins
    // (high impact, low effort) surface first.
    fn weight(self) -> u8 {
        match self {
            Effort::High => 1,
            Effort::Medium => 2,
            Effort::Low => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    pub description: String,
}

impl ActionItem {
    pub fn new(title: &str, description: &str) -> ActionItem {
        ActionItem {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// One piece of advice derived from the latest figures. Never persisted:
/// regenerated on every request from (record, benchmark, profile).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub effort: Effort,
    pub category: String,
    pub current_value: f64,
    pub target_value: f64,
    pub unit: String,
    pub potential_gain: String,
    pub benchmark_label: Option<String>,
    pub actions: Vec<ActionItem>,
}

impl Recommendation {
    pub fn priority(&self) -> u8 {
        self.impact.weight() * self.effort.weight()
    }
}

/// French-style euro formatting: rounded to the unit, thousands separated
/// with spaces ("1 234 567 €").
pub fn format_eur(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    let offset = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{grouped} €")
    } else {
        format!("{grouped} €")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(impact: Impact, effort: Effort) -> Recommendation {
        Recommendation {
            id: "test".to_string(),
            title: String::new(),
            description: String::new(),
            impact,
            effort,
            category: String::new(),
            current_value: 0.0,
            target_value: 0.0,
            unit: String::new(),
            potential_gain: String::new(),
            benchmark_label: None,
            actions: vec![],
        }
    }

    #[test]
    fn quick_win_scores_highest() {
        assert_eq!(rec(Impact::High, Effort::Low).priority(), 9);
        assert_eq!(rec(Impact::High, Effort::Medium).priority(), 6);
        assert_eq!(rec(Impact::High, Effort::High).priority(), 3);
        assert_eq!(rec(Impact::Medium, Effort::Medium).priority(), 4);
        assert_eq!(rec(Impact::Low, Effort::High).priority(), 1);
    }

    #[test]
    fn formats_euro_amounts_with_french_grouping() {
        assert_eq!(format_eur(0.0), "0 €");
        assert_eq!(format_eur(999.4), "999 €");
        assert_eq!(format_eur(1_000.0), "1 000 €");
        assert_eq!(format_eur(25_500.6), "25 501 €");
        assert_eq!(format_eur(1_234_567.0), "1 234 567 €");
        assert_eq!(format_eur(-42_000.0), "-42 000 €");
    }
}
