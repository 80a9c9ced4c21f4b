//! Identity types for LYCEUM entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Declares a strongly-typed entity ID newtype over `Uuid`.
///
/// Backend-owned identifiers are mirrored read-only on the client; the
/// newtypes prevent mixing up IDs of different entities at compile time.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Wrap an existing backend identifier.
            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            /// Get the underlying UUID.
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a classroom.
    ClassroomId
);
entity_id!(
    /// Identifier of a student group.
    GroupId
);
entity_id!(
    /// Identifier of a student.
    StudentId
);
entity_id!(
    /// Identifier of a teacher.
    TeacherId
);
entity_id!(
    /// Identifier of a mark (grade record).
    MarkId
);
entity_id!(
    /// Identifier of an attendance record.
    AttendanceId
);
entity_id!(
    /// Identifier of a post.
    PostId
);
entity_id!(
    /// Identifier of a user account.
    UserId
);
entity_id!(
    /// Identifier of a school.
    SchoolId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_through_uuid() {
        let raw = Uuid::new_v4();
        let id = StudentId::new(raw);
        assert_eq!(id.as_uuid(), raw);
        assert_eq!(StudentId::from(raw), id);
    }

    #[test]
    fn test_id_display_matches_uuid() {
        let raw = Uuid::new_v4();
        let id = ClassroomId::new(raw);
        assert_eq!(id.to_string(), raw.to_string());
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let raw = Uuid::new_v4();
        let id = MarkId::new(raw);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", raw));
        let back: MarkId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
