use crate::domain::financials::{MAX_FISCAL_YEAR, MIN_FISCAL_YEAR};
use anyhow::{ensure, Context};
use chrono::{DateTime, Datelike, Utc};

// Year boundaries follow French local time; a fixed CET offset is close
// enough for resolving which fiscal year "now" belongs to.
const PARIS_OFFSET_SECS: i32 = 3600;

pub fn current_fiscal_year(now_utc: DateTime<Utc>) -> anyhow::Result<i32> {
    let paris =
        chrono::FixedOffset::east_opt(PARIS_OFFSET_SECS).context("invalid Paris offset")?;
    Ok(now_utc.with_timezone(&paris).year())
}

/// Resolve the fiscal year for a run: an explicit argument wins, otherwise
/// the current year in Paris time.
pub fn resolve_fiscal_year(arg: Option<&str>, now_utc: DateTime<Utc>) -> anyhow::Result<i32> {
    let year = match arg {
        Some(s) => s
            .trim()
            .parse::<i32>()
            .with_context(|| format!("invalid fiscal year: {s}"))?,
        None => current_fiscal_year(now_utc)?,
    };

    ensure!(
        (MIN_FISCAL_YEAR..=MAX_FISCAL_YEAR).contains(&year),
        "fiscal year out of range: {year}"
    );
    Ok(year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn explicit_argument_wins() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(resolve_fiscal_year(Some("2023"), now).unwrap(), 2023);
    }

    #[test]
    fn rejects_unparsable_or_out_of_range_years() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert!(resolve_fiscal_year(Some("l'an dernier"), now).is_err());
        assert!(resolve_fiscal_year(Some("1999"), now).is_err());
        assert!(resolve_fiscal_year(Some("2101"), now).is_err());
    }

    #[test]
    fn defaults_to_current_paris_year() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(resolve_fiscal_year(None, now).unwrap(), 2026);
    }

    #[test]
    fn new_year_rolls_over_in_paris_before_utc() {
        // 23:30 UTC on Dec 31 is already Jan 1 in Paris.
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(current_fiscal_year(now).unwrap(), 2026);
    }
}
