//! Core entity structures
//!
//! All entities are owned by the backend and mirrored read-only in the
//! client cache; mutations go through the endpoint registry.

use crate::{
    AttendanceId, AttendanceStatus, ClassroomId, GroupId, MarkId, MarkType, PostId, PostStatus,
    PostType, SchoolId, StudentId, TeacherId, Timestamp, UserId, UserRole,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Classroom - a taught class with an assigned teacher and roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub classroom_id: ClassroomId,
    pub school_id: SchoolId,
    pub name: String,
    pub subject: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub student_ids: Vec<StudentId>,
    /// Free-form location label picked on the map widget.
    pub location: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Group - an ad-hoc set of students, possibly spanning classrooms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub school_id: SchoolId,
    pub name: String,
    pub student_ids: Vec<StudentId>,
    pub classroom_ids: Vec<ClassroomId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Student profile as mirrored from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub student_id: StudentId,
    pub school_id: SchoolId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub classroom_ids: Vec<ClassroomId>,
    pub group_ids: Vec<GroupId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Teacher profile as mirrored from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub teacher_id: TeacherId,
    pub school_id: SchoolId,
    pub user_id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub subjects: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Mark - one grade record for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    pub mark_id: MarkId,
    pub student_id: StudentId,
    /// Points awarded.
    pub value: f64,
    /// Maximum awardable points for this assessment.
    pub max_value: f64,
    pub mark_type: MarkType,
    pub subject: String,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
    pub recorded_at: Timestamp,
}

/// Attendance - one attendance record for one student on one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub attendance_id: AttendanceId,
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
    pub classroom_id: Option<ClassroomId>,
    /// Set when the record belongs to a school event rather than a lesson.
    pub event_id: Option<PostId>,
    pub recorded_at: Timestamp,
}

/// Post - announcement, homework, quiz or poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: UserId,
    pub post_type: PostType,
    pub status: PostStatus,
    pub title: String,
    pub content: Option<String>,
    pub likes: u64,
    pub comments: u64,
    pub classroom_id: Option<ClassroomId>,
    pub group_id: Option<GroupId>,
    pub student_id: Option<StudentId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// User - account and session subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub school_id: Option<SchoolId>,
    pub role: UserRole,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub locale: Option<String>,
    pub created_at: Timestamp,
}

/// School - the tenant every other entity belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct School {
    pub school_id: SchoolId,
    pub name: String,
    pub address: Option<String>,
    pub settings: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
