//! LYCEUM Client - Consumption Layer
//!
//! Generic async-state wrappers that subscribe presentation code to the
//! data core without the core depending on any of it: single-operation
//! state, input-parameterized mutation state, a paginated collection
//! manager and the cache subscription handle.

pub mod mutation;
pub mod operation;
pub mod paginated;
pub mod subscription;

pub use mutation::MutationState;
pub use operation::{Operation, OperationState};
pub use paginated::{Page, PageRequest, PaginatedManager};
pub use subscription::QuerySubscription;
