//! Enum types for LYCEUM entities

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity type discriminator for cache tags and polymorphic references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Classroom,
    Group,
    Student,
    Teacher,
    Mark,
    Attendance,
    Post,
    User,
    School,
}

impl EntityType {
    /// Stable name used in tag rendering and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classroom => "Classroom",
            Self::Group => "Group",
            Self::Student => "Student",
            Self::Teacher => "Teacher",
            Self::Mark => "Mark",
            Self::Attendance => "Attendance",
            Self::Post => "Post",
            Self::User => "User",
            Self::School => "School",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one attendance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

/// Category of a mark (grade record).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkType {
    Exam,
    Quiz,
    Homework,
    Project,
    Participation,
}

/// Category of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    Announcement,
    Homework,
    Quiz,
    Poll,
}

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    Published,
    Draft,
}

/// Role attached to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Teacher,
    Student,
    Parent,
}
