//! Cache entry keys.

use lyceum_core::CacheError;
use serde::Serialize;
use std::fmt;

/// Key of one cache entry: operation id plus canonically serialized
/// arguments.
///
/// Two queries with identical operation and arguments map to the same key
/// and therefore share one entry and one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    endpoint_id: String,
    args: String,
}

impl QueryKey {
    /// Build a key from an endpoint id and its serializable arguments.
    pub fn new<A: Serialize>(endpoint_id: &str, args: &A) -> Result<Self, CacheError> {
        let args = serde_json::to_string(args).map_err(|err| CacheError::ArgsSerialization {
            endpoint_id: endpoint_id.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            endpoint_id: endpoint_id.to_string(),
            args,
        })
    }

    pub fn endpoint_id(&self) -> &str {
        &self.endpoint_id
    }

    pub fn args(&self) -> &str {
        &self.args
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.endpoint_id, self.args)
    }
}
