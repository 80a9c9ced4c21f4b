//! LYCEUM Core - Entity Types
//!
//! Pure data structures with no behavior. All other crates depend on this.
//! This crate contains ONLY data types - no business logic and no I/O.

pub mod config;
pub mod entities;
pub mod enums;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod tag;

pub use config::{ClientConfig, RetryConfig, Service, ServiceRoots};
pub use entities::{
    Attendance, Classroom, Group, Mark, Post, School, Student, Teacher, User,
};
pub use enums::{
    AttendanceStatus, EntityType, MarkType, PostStatus, PostType, UserRole,
};
pub use envelope::{ApiEnvelope, ApiFailure, FailureBody, FailureStatus, SyntheticStatus};
pub use error::{
    CacheError, ConfigError, EndpointError, LyceumError, LyceumResult, TransportError,
};
pub use ids::{
    AttendanceId, ClassroomId, GroupId, MarkId, PostId, SchoolId, StudentId, TeacherId,
    Timestamp, UserId,
};
pub use tag::{Tag, TagScope};
