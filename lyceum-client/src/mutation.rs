//! Input-parameterized mutation state.

use crate::operation::OperationState;
use lyceum_core::EndpointError;
use std::future::Future;

/// Mutation wrapper: the same `{data, loading, error}` triple, driven by an
/// explicit input. Never auto-runs.
#[derive(Debug, Default)]
pub struct MutationState<T> {
    state: OperationState<T>,
}

impl<T> MutationState<T> {
    pub fn new() -> Self {
        Self {
            state: OperationState::default(),
        }
    }

    pub fn state(&self) -> &OperationState<T> {
        &self.state
    }

    /// Run the mutation with the given input.
    pub async fn mutate<I, F, Fut>(&mut self, input: I, run: F) -> &OperationState<T>
    where
        F: FnOnce(I) -> Fut,
        Fut: Future<Output = Result<T, EndpointError>>,
    {
        self.state.loading = true;
        self.state.error = None;

        match run(input).await {
            Ok(data) => {
                self.state.data = Some(data);
                self.state.loading = false;
            }
            Err(err) => {
                self.state.error = Some(err.surface_message());
                self.state.loading = false;
            }
        }
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = OperationState::default();
    }
}
