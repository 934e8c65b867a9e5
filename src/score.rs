use std::sync::OnceLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use crate::config::ScoreWeights;
use crate::models::RepositoryMetadata;

const COMMIT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
const HOURS_PER_DAY: i64 = 24;

/// Compute and store the health score of `metadata`.
///
/// ```text
/// score = stars·W.stars + forks·W.forks + open_issues·W.open_issues
///       + days_since_last_commit·W.last_commit_date + archived·W.archived
/// ```
///
/// truncated toward zero. An unparseable `last_commit_date` marks the metadata
/// skipped and counts as zero elapsed days; the score is still computed.
pub fn score(metadata: &mut RepositoryMetadata, weights: &ScoreWeights, now: DateTime<Utc>) -> i64 {
    let days = match days_since(&metadata.last_commit_date, now) {
        Some(days) => days,
        None => {
            metadata.skip = true;
            metadata.skip_reason = format!("Date Format Error: {}", metadata.last_commit_date);
            tracing::warn!(
                repository = %metadata.source_url,
                "Date Format Error: failed to parse date '{}'",
                metadata.last_commit_date
            );
            0
        }
    };

    let archived = if metadata.archived { 1.0 } else { 0.0 };

    let total = metadata.stars as f64 * weights.stars
        + metadata.forks as f64 * weights.forks
        + metadata.open_issues as f64 * weights.open_issues
        + days as f64 * weights.last_commit_date
        + archived * weights.archived;

    let score = total as i64;
    metadata.score = Some(score);
    score
}

/// Whole days between `date` and `now`, truncated toward zero. `None` unless
/// `date` is exactly `YYYY-MM-DDTHH:MM:SSZ` with zero-padded fields.
fn days_since(date: &str, now: DateTime<Utc>) -> Option<i64> {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    let shape = SHAPE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z$").unwrap());
    if !shape.is_match(date) {
        return None;
    }

    let committed = NaiveDateTime::parse_from_str(date, COMMIT_DATE_FORMAT).ok()?.and_utc();
    Some((now - committed).num_hours() / HOURS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn metadata(last_commit_date: &str) -> RepositoryMetadata {
        RepositoryMetadata {
            source_url: "https://github.com/u/a".to_string(),
            watchers: 50,
            stars: 1000,
            forks: 200,
            open_issues: 30,
            last_commit_date: last_commit_date.to_string(),
            ..RepositoryMetadata::default()
        }
    }

    #[test]
    fn test_default_weights() {
        let mut meta = metadata("2024-05-22T12:00:00Z");
        // 100 + 20 + 0.3 - 10 * 0.05 = 119.8 → 119
        assert_eq!(score(&mut meta, &ScoreWeights::default(), now()), 119);
        assert_eq!(meta.score, Some(119));
        assert!(!meta.skip);
    }

    #[test]
    fn test_deterministic() {
        let weights = ScoreWeights::default();
        let mut a = metadata("2023-01-15T08:30:00Z");
        let mut b = a.clone();
        assert_eq!(score(&mut a, &weights, now()), score(&mut b, &weights, now()));
    }

    #[test]
    fn test_archived_dominates() {
        let mut meta = metadata("2024-06-01T00:00:00Z");
        meta.archived = true;
        let s = score(&mut meta, &ScoreWeights::default(), now());
        // 120.3 - 1_000_000 = -999_879.7 → -999_879
        assert_eq!(s, -999_879);
    }

    #[test]
    fn test_partial_days_truncate() {
        let weights = ScoreWeights {
            stars: 0.0,
            forks: 0.0,
            open_issues: 0.0,
            last_commit_date: 1.0,
            archived: 0.0,
            ..ScoreWeights::default()
        };
        // 47 hours → 1 day
        let mut meta = metadata("2024-05-30T13:00:00Z");
        assert_eq!(score(&mut meta, &weights, now()), 1);
        // 23 hours in the future → 0 days
        let mut future = metadata("2024-06-02T11:00:00Z");
        assert_eq!(score(&mut future, &weights, now()), 0);
    }

    #[test]
    fn test_negative_sum_truncates_toward_zero() {
        let weights = ScoreWeights {
            stars: -0.5,
            forks: 0.0,
            open_issues: 0.0,
            last_commit_date: 0.0,
            archived: 0.0,
            ..ScoreWeights::default()
        };
        let mut meta = metadata("2024-06-01T12:00:00Z");
        meta.stars = 3;
        assert_eq!(score(&mut meta, &weights, now()), -1);
    }

    #[test]
    fn test_watchers_not_part_of_score() {
        let weights = ScoreWeights {
            watchers: 1_000.0,
            ..ScoreWeights::default()
        };
        let mut meta = metadata("2024-06-01T12:00:00Z");
        assert_eq!(score(&mut meta, &weights, now()), 120);
    }

    #[test]
    fn test_invalid_date_still_scores() {
        let mut meta = metadata("invalid-date");
        let s = score(&mut meta, &ScoreWeights::default(), now());

        assert!(meta.skip);
        assert_eq!(meta.skip_reason, "Date Format Error: invalid-date");
        // Zero elapsed days: 100 + 20 + 0.3
        assert_eq!(s, 120);
        assert_eq!(meta.score, Some(120));
    }

    #[test]
    fn test_offset_timestamp_rejected() {
        let mut meta = metadata("2024-05-22T12:00:00+02:00");
        score(&mut meta, &ScoreWeights::default(), now());
        assert!(meta.skip);
    }

    #[test]
    fn test_unpadded_or_signed_dates_rejected() {
        for raw in [
            "2024-5-22T12:00:00Z",
            "2024-05-22T1:0:0Z",
            "+2024-05-22T12:00:00Z",
            "2024-05-22 12:00:00Z",
            "2024-05-22T12:00:00.123Z",
        ] {
            let mut meta = metadata(raw);
            score(&mut meta, &ScoreWeights::default(), now());
            assert!(meta.skip, "{}", raw);
            assert_eq!(meta.skip_reason, format!("Date Format Error: {}", raw));
        }
    }

    #[test]
    fn test_out_of_range_fields_rejected() {
        let mut meta = metadata("2024-13-40T25:61:00Z");
        score(&mut meta, &ScoreWeights::default(), now());
        assert!(meta.skip);
    }
}
