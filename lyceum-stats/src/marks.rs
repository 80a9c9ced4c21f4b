//! Mark (grade) aggregation.

use lyceum_core::{Mark, MarkType};
use std::collections::HashMap;

/// Direction of mark percentages over time.
///
/// Same recent-third split as attendance, with tighter thresholds of
/// two percentage points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkTrend {
    Up,
    Down,
    #[default]
    Stable,
}

/// Count and mean percentage for one grouping bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupAverage {
    pub count: usize,
    pub average: f64,
}

/// Aggregate over one mark collection snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkStats {
    pub total: usize,
    /// Mean of per-mark percentages.
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    /// Share of marks scoring at least 50 percent.
    pub passing_rate: f64,
    pub by_type: HashMap<MarkType, GroupAverage>,
    pub by_subject: HashMap<String, GroupAverage>,
    pub trend: MarkTrend,
}

/// Percentage of one mark: `value / max_value * 100`, zero when the
/// maximum is not positive.
pub fn mark_percentage(mark: &Mark) -> f64 {
    if mark.max_value <= 0.0 {
        0.0
    } else {
        mark.value / mark.max_value * 100.0
    }
}

/// Fold a snapshot of marks into its aggregate.
pub fn mark_stats(marks: &[Mark]) -> MarkStats {
    if marks.is_empty() {
        return MarkStats::default();
    }

    let mut stats = MarkStats {
        total: marks.len(),
        highest_score: f64::MIN,
        lowest_score: f64::MAX,
        ..MarkStats::default()
    };

    let mut sum = 0.0;
    let mut passing = 0usize;
    let mut type_sums: HashMap<MarkType, (usize, f64)> = HashMap::new();
    let mut subject_sums: HashMap<String, (usize, f64)> = HashMap::new();

    for mark in marks {
        let pct = mark_percentage(mark);
        sum += pct;
        if pct >= 50.0 {
            passing += 1;
        }
        stats.highest_score = stats.highest_score.max(pct);
        stats.lowest_score = stats.lowest_score.min(pct);

        let by_type = type_sums.entry(mark.mark_type).or_insert((0, 0.0));
        by_type.0 += 1;
        by_type.1 += pct;

        let by_subject = subject_sums.entry(mark.subject.clone()).or_insert((0, 0.0));
        by_subject.0 += 1;
        by_subject.1 += pct;
    }

    stats.average_score = sum / marks.len() as f64;
    stats.passing_rate = passing as f64 / marks.len() as f64 * 100.0;
    stats.by_type = type_sums
        .into_iter()
        .map(|(key, (count, total))| {
            (
                key,
                GroupAverage {
                    count,
                    average: total / count as f64,
                },
            )
        })
        .collect();
    stats.by_subject = subject_sums
        .into_iter()
        .map(|(key, (count, total))| {
            (
                key,
                GroupAverage {
                    count,
                    average: total / count as f64,
                },
            )
        })
        .collect();
    stats.trend = trend(marks);
    stats
}

fn trend(marks: &[Mark]) -> MarkTrend {
    let mut ordered: Vec<&Mark> = marks.iter().collect();
    ordered.sort_by_key(|m| m.recorded_at);

    let recent_len = ordered.len() / 3;
    if recent_len == 0 {
        return MarkTrend::Stable;
    }
    let (older, recent) = ordered.split_at(ordered.len() - recent_len);

    let delta = mean_percentage(recent) - mean_percentage(older);
    if delta > 2.0 {
        MarkTrend::Up
    } else if delta < -2.0 {
        MarkTrend::Down
    } else {
        MarkTrend::Stable
    }
}

fn mean_percentage(marks: &[&Mark]) -> f64 {
    if marks.is_empty() {
        return 0.0;
    }
    marks.iter().map(|m| mark_percentage(m)).sum::<f64>() / marks.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lyceum_core::{MarkId, StudentId, Timestamp};
    use uuid::Uuid;

    fn mark_at(value: f64, max_value: f64, recorded_at: Timestamp) -> Mark {
        Mark {
            mark_id: MarkId::new(Uuid::new_v4()),
            student_id: StudentId::new(Uuid::new_v4()),
            value,
            max_value,
            mark_type: MarkType::Exam,
            subject: "maths".to_string(),
            classroom_id: None,
            group_id: None,
            recorded_at,
        }
    }

    fn mark(value: f64, max_value: f64) -> Mark {
        mark_at(value, max_value, Utc.with_ymd_and_hms(2025, 9, 1, 9, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_collection_yields_zeroed_aggregate() {
        let stats = mark_stats(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.highest_score, 0.0);
        assert_eq!(stats.lowest_score, 0.0);
        assert_eq!(stats.passing_rate, 0.0);
        assert_eq!(stats.trend, MarkTrend::Stable);
    }

    #[test]
    fn test_two_mark_scenario() {
        // 18/20 and 9/20: percentages 90 and 45.
        let marks = vec![mark(18.0, 20.0), mark(9.0, 20.0)];
        let stats = mark_stats(&marks);

        assert_eq!(mark_percentage(&marks[0]), 90.0);
        assert_eq!(mark_percentage(&marks[1]), 45.0);
        assert_eq!(stats.average_score, 67.5);
        assert_eq!(stats.highest_score, 90.0);
        assert_eq!(stats.lowest_score, 45.0);
        assert_eq!(stats.passing_rate, 50.0);
    }

    #[test]
    fn test_exactly_fifty_percent_passes() {
        let stats = mark_stats(&[mark(10.0, 20.0)]);
        assert_eq!(stats.passing_rate, 100.0);
    }

    #[test]
    fn test_zero_max_value_scores_zero() {
        let broken = mark(5.0, 0.0);
        assert_eq!(mark_percentage(&broken), 0.0);
        let stats = mark_stats(&[broken]);
        assert_eq!(stats.average_score, 0.0);
        assert_eq!(stats.passing_rate, 0.0);
    }

    #[test]
    fn test_grouping_by_type_and_subject() {
        let mut quiz = mark(8.0, 10.0);
        quiz.mark_type = MarkType::Quiz;
        quiz.subject = "history".to_string();
        let marks = vec![mark(18.0, 20.0), mark(9.0, 20.0), quiz];
        let stats = mark_stats(&marks);

        assert_eq!(stats.by_type[&MarkType::Exam].count, 2);
        assert_eq!(stats.by_type[&MarkType::Exam].average, 67.5);
        assert_eq!(stats.by_type[&MarkType::Quiz].average, 80.0);
        assert_eq!(stats.by_subject[&"maths".to_string()].count, 2);
        assert_eq!(stats.by_subject[&"history".to_string()].average, 80.0);
    }

    #[test]
    fn test_trend_up_when_recent_scores_higher() {
        let t = |day| Utc.with_ymd_and_hms(2025, 9, day, 9, 0, 0).unwrap();
        let marks = vec![
            mark_at(10.0, 20.0, t(1)),
            mark_at(10.0, 20.0, t(2)),
            mark_at(10.0, 20.0, t(3)),
            mark_at(10.0, 20.0, t(4)),
            mark_at(19.0, 20.0, t(5)),
            mark_at(19.0, 20.0, t(6)),
        ];
        assert_eq!(mark_stats(&marks).trend, MarkTrend::Up);
    }

    #[test]
    fn test_trend_down_when_recent_scores_lower() {
        let t = |day| Utc.with_ymd_and_hms(2025, 9, day, 9, 0, 0).unwrap();
        let marks = vec![
            mark_at(19.0, 20.0, t(1)),
            mark_at(19.0, 20.0, t(2)),
            mark_at(19.0, 20.0, t(3)),
            mark_at(19.0, 20.0, t(4)),
            mark_at(8.0, 20.0, t(5)),
            mark_at(8.0, 20.0, t(6)),
        ];
        assert_eq!(mark_stats(&marks).trend, MarkTrend::Down);
    }

    #[test]
    fn test_trend_stable_within_two_points() {
        let t = |day| Utc.with_ymd_and_hms(2025, 9, day, 9, 0, 0).unwrap();
        let marks = vec![
            mark_at(15.0, 20.0, t(1)),
            mark_at(15.0, 20.0, t(2)),
            mark_at(15.2, 20.0, t(3)),
        ];
        assert_eq!(mark_stats(&marks).trend, MarkTrend::Stable);
    }
}
