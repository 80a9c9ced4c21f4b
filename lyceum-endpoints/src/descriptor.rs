//! Endpoint descriptors.

use lyceum_transport::HttpMethod;

/// Whether an operation reads (provides tags) or writes (invalidates tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Query,
    Mutation,
}

/// Declaration of one operation: identity, wire shape and kind.
///
/// The tag relationships are supplied per call site, because most of them
/// depend on the arguments (e.g. which student a mark belongs to).
#[derive(Debug, Clone)]
pub struct EndpointDescriptor {
    /// Stable operation id, also the first half of every cache key.
    pub id: String,
    pub kind: EndpointKind,
    pub method: HttpMethod,
    /// Root-relative path on the owning service.
    pub path: String,
}

impl EndpointDescriptor {
    pub fn query(id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EndpointKind::Query,
            method,
            path: path.into(),
        }
    }

    pub fn mutation(id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: EndpointKind::Mutation,
            method,
            path: path.into(),
        }
    }
}
