//! LYCEUM Stats - Derived Statistics Engine
//!
//! Pure, stateless folds over snapshots of cached collections. Results are
//! value objects: recomputed on demand whenever the source collection
//! changes, never cached as authoritative state. Every function is total -
//! an empty collection yields a zeroed aggregate with a stable trend.

pub mod attendance;
pub mod marks;
pub mod posts;

pub use attendance::{
    attendance_stats, AttendanceStats, AttendanceTrend, DayAttendance, StudentAttendance,
};
pub use marks::{mark_percentage, mark_stats, GroupAverage, MarkStats, MarkTrend};
pub use posts::{post_stats, PostStats};
