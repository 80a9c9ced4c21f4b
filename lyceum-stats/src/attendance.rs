//! Attendance aggregation.

use chrono::NaiveDate;
use lyceum_core::{Attendance, AttendanceStatus, StudentId};
use std::collections::{BTreeMap, HashMap};

/// Direction of the attendance rate over time.
///
/// Compares the recent third of chronologically sorted records against the
/// older two-thirds: improving above +5 points, declining below -5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendanceTrend {
    Improving,
    Declining,
    #[default]
    Stable,
}

/// Per-status counts for one grouping bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayAttendance {
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    pub attendance_rate: f64,
}

/// Counts and rate restricted to one student's records.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StudentAttendance {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    pub attendance_rate: f64,
}

/// Aggregate over one attendance collection snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub excused: usize,
    /// `(present + late + excused) / total * 100`.
    pub attendance_rate: f64,
    /// `present / total * 100`.
    pub punctuality_rate: f64,
    pub by_date: BTreeMap<NaiveDate, DayAttendance>,
    pub by_student: HashMap<StudentId, StudentAttendance>,
    pub trend: AttendanceTrend,
}

/// Fold a snapshot of attendance records into its aggregate.
pub fn attendance_stats(records: &[Attendance]) -> AttendanceStats {
    if records.is_empty() {
        return AttendanceStats::default();
    }

    let mut stats = AttendanceStats {
        total: records.len(),
        ..AttendanceStats::default()
    };

    for record in records {
        match record.status {
            AttendanceStatus::Present => stats.present += 1,
            AttendanceStatus::Absent => stats.absent += 1,
            AttendanceStatus::Late => stats.late += 1,
            AttendanceStatus::Excused => stats.excused += 1,
        }

        let day = stats.by_date.entry(record.date).or_default();
        bump(day, record.status);

        let student = stats.by_student.entry(record.student_id).or_default();
        student.total += 1;
        match record.status {
            AttendanceStatus::Present => student.present += 1,
            AttendanceStatus::Absent => student.absent += 1,
            AttendanceStatus::Late => student.late += 1,
            AttendanceStatus::Excused => student.excused += 1,
        }
    }

    stats.attendance_rate = attended_rate(stats.present, stats.late, stats.excused, stats.total);
    stats.punctuality_rate = percentage(stats.present, stats.total);

    for day in stats.by_date.values_mut() {
        let total = day.present + day.absent + day.late + day.excused;
        day.attendance_rate = attended_rate(day.present, day.late, day.excused, total);
    }
    for student in stats.by_student.values_mut() {
        student.attendance_rate =
            attended_rate(student.present, student.late, student.excused, student.total);
    }

    stats.trend = trend(records);
    stats
}

fn bump(day: &mut DayAttendance, status: AttendanceStatus) {
    match status {
        AttendanceStatus::Present => day.present += 1,
        AttendanceStatus::Absent => day.absent += 1,
        AttendanceStatus::Late => day.late += 1,
        AttendanceStatus::Excused => day.excused += 1,
    }
}

/// Attendance rate formula: every non-absent status counts as attended.
fn attended_rate(present: usize, late: usize, excused: usize, total: usize) -> f64 {
    percentage(present + late + excused, total)
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Recent-third versus older-two-thirds comparison.
fn trend(records: &[Attendance]) -> AttendanceTrend {
    let mut ordered: Vec<&Attendance> = records.iter().collect();
    ordered.sort_by_key(|r| (r.date, r.recorded_at));

    let recent_len = ordered.len() / 3;
    if recent_len == 0 {
        return AttendanceTrend::Stable;
    }
    let (older, recent) = ordered.split_at(ordered.len() - recent_len);

    let delta = group_rate(recent) - group_rate(older);
    if delta > 5.0 {
        AttendanceTrend::Improving
    } else if delta < -5.0 {
        AttendanceTrend::Declining
    } else {
        AttendanceTrend::Stable
    }
}

fn group_rate(records: &[&Attendance]) -> f64 {
    let attended = records
        .iter()
        .filter(|r| r.status != AttendanceStatus::Absent)
        .count();
    percentage(attended, records.len())
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lyceum_core::AttendanceId;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn arb_status() -> impl Strategy<Value = AttendanceStatus> {
        prop_oneof![
            Just(AttendanceStatus::Present),
            Just(AttendanceStatus::Absent),
            Just(AttendanceStatus::Late),
            Just(AttendanceStatus::Excused),
        ]
    }

    fn arb_records() -> impl Strategy<Value = Vec<Attendance>> {
        prop::collection::vec((arb_status(), 1u32..28), 0..40).prop_map(|pairs| {
            let student = StudentId::new(Uuid::nil());
            pairs
                .into_iter()
                .map(|(status, day)| Attendance {
                    attendance_id: AttendanceId::new(Uuid::nil()),
                    student_id: student,
                    status,
                    date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
                    classroom_id: None,
                    event_id: None,
                    recorded_at: Utc.with_ymd_and_hms(2025, 9, day, 8, 0, 0).unwrap(),
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_attendance_stats_is_pure(records in arb_records()) {
            let first = attendance_stats(&records);
            let second = attendance_stats(&records);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_counts_sum_to_total(records in arb_records()) {
            let stats = attendance_stats(&records);
            prop_assert_eq!(
                stats.present + stats.absent + stats.late + stats.excused,
                stats.total
            );
        }

        #[test]
        fn prop_rates_bounded(records in arb_records()) {
            let stats = attendance_stats(&records);
            prop_assert!((0.0..=100.0).contains(&stats.attendance_rate));
            prop_assert!((0.0..=100.0).contains(&stats.punctuality_rate));
            prop_assert!(stats.punctuality_rate <= stats.attendance_rate + 1e-9);
        }
    }
}
