//! Cache-invalidation tags.
//!
//! A tag is the unit of cache invalidation: queries declare which tags they
//! provide, mutations declare which tags they invalidate. Uniqueness is per
//! `(EntityType, TagScope)` pair, so tags are usable as map keys.

use crate::EntityType;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Scope component of a tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagScope {
    /// The whole collection of one entity type.
    List,
    /// One entity by its backend identifier.
    Id(Uuid),
    /// A composite scope such as `STUDENT_<id>` or `CLASSROOM_<id>_STATS`.
    Composite(String),
}

impl fmt::Display for TagScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("LIST"),
            Self::Id(id) => write!(f, "{}", id),
            Self::Composite(name) => f.write_str(name),
        }
    }
}

/// Addressable `(EntityType, Scope)` cache key relating reads to writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub entity_type: EntityType,
    pub scope: TagScope,
}

impl Tag {
    /// Tag covering the whole collection of one entity type.
    pub fn list(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            scope: TagScope::List,
        }
    }

    /// Tag covering one entity by id.
    pub fn id(entity_type: EntityType, id: Uuid) -> Self {
        Self {
            entity_type,
            scope: TagScope::Id(id),
        }
    }

    /// Tag with a composite scope label.
    pub fn composite(entity_type: EntityType, scope: impl Into<String>) -> Self {
        Self {
            entity_type,
            scope: TagScope::Composite(scope.into()),
        }
    }

    /// Composite scope for the derived statistics of one classroom.
    pub fn classroom_stats(classroom_id: Uuid) -> Self {
        Self::composite(
            EntityType::Classroom,
            format!("CLASSROOM_{}_STATS", classroom_id),
        )
    }

    /// Composite scope for the records of one student within a collection.
    pub fn student_scope(entity_type: EntityType, student_id: Uuid) -> Self {
        Self::composite(entity_type, format!("STUDENT_{}", student_id))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.scope)
    }
}
