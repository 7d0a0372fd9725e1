use crate::domain::financials::UnvalidatedFinancialRecord;
use anyhow::Context;

pub fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        // Remove Markdown fences (```json ... ``` or ``` ... ```).
        let mut inner = trimmed;
        if let Some(after_first) = inner.splitn(2, '\n').nth(1) {
            inner = after_first;
        }
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        return Some(inner.trim().to_string());
    }

    // Best-effort extraction: first '{' to last '}'.
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim().to_string())
}

pub fn parse_financials(text: &str) -> anyhow::Result<UnvalidatedFinancialRecord> {
    let json_str = extract_json(text).unwrap_or_else(|| text.trim().to_string());
    serde_json::from_str::<UnvalidatedFinancialRecord>(&json_str).with_context(|| {
        format!("model output is not valid JSON for the financial record schema: {json_str}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_handles_fenced_blocks() {
        let body = "{\"revenue\":1}";
        let fenced = format!("```json\n{body}\n```\n");
        assert_eq!(extract_json(&fenced), Some(body.to_string()));
    }

    #[test]
    fn extract_json_falls_back_to_braces() {
        let s = "Voici les données extraites : {\"revenue\":1} Bonne journée.";
        assert_eq!(extract_json(s), Some("{\"revenue\":1}".to_string()));
    }

    #[test]
    fn extract_json_rejects_braceless_text() {
        assert_eq!(extract_json("pas de JSON ici"), None);
    }

    #[test]
    fn parse_financials_accepts_full_object() {
        let text = r#"{
            "year": 2024,
            "revenue": 480000.0,
            "fixed_costs": 60000,
            "variable_costs": 250000,
            "payroll": 110000,
            "cash_flow": 35000,
            "notes": "Exercice clos au 31 décembre 2024"
        }"#;
        let record = parse_financials(text).unwrap();
        assert_eq!(record.year, 2024);
        assert_eq!(record.revenue, 480_000.0);
        assert_eq!(record.payroll, 110_000.0);
        assert!(record.notes.contains("2024"));
    }

    #[test]
    fn parse_financials_accepts_prose_wrapped_object() {
        let text = "D'après la liasse fiscale : {\"year\": 2023, \"revenue\": 120000} (montants en euros)";
        let record = parse_financials(text).unwrap();
        assert_eq!(record.year, 2023);
        assert_eq!(record.revenue, 120_000.0);
        assert_eq!(record.fixed_costs, 0.0);
    }

    #[test]
    fn parse_financials_rejects_invalid_payload() {
        assert!(parse_financials("le document est illisible").is_err());
        assert!(parse_financials("{\"year\": \"deux mille\"}").is_err());
    }
}
