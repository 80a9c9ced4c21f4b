//! Single-operation async state.

use lyceum_core::EndpointError;
use std::future::Future;

/// The `{data, loading, error}` triple every consumer renders from.
///
/// Errors are already reduced to one human-readable string by the endpoint
/// registry; nothing else leaks through.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        !self.loading && self.data.is_none() && self.error.is_none()
    }
}

/// Wrapper driving one async operation through the state triple.
#[derive(Debug, Default)]
pub struct Operation<T> {
    state: OperationState<T>,
}

impl<T> Operation<T> {
    pub fn new() -> Self {
        Self {
            state: OperationState::default(),
        }
    }

    pub fn state(&self) -> &OperationState<T> {
        &self.state
    }

    /// Run the operation: loading until it settles, then data or error.
    pub async fn execute<F, Fut>(&mut self, run: F) -> &OperationState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EndpointError>>,
    {
        self.execute_with(run, |_| {}, |_| {}).await
    }

    /// Run the operation and fire the matching callback once settled.
    pub async fn execute_with<F, Fut, OnOk, OnErr>(
        &mut self,
        run: F,
        on_success: OnOk,
        on_error: OnErr,
    ) -> &OperationState<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EndpointError>>,
        OnOk: FnOnce(&T),
        OnErr: FnOnce(&str),
    {
        self.state.loading = true;
        self.state.error = None;

        match run().await {
            Ok(data) => {
                on_success(&data);
                self.state.data = Some(data);
                self.state.loading = false;
            }
            Err(err) => {
                let message = err.surface_message();
                on_error(&message);
                self.state.error = Some(message);
                self.state.loading = false;
            }
        }
        &self.state
    }

    /// Clear state without side effects.
    pub fn reset(&mut self) {
        self.state = OperationState::default();
    }
}
