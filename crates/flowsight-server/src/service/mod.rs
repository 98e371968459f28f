//! Application state and dependency injection.

use flowsight_core::analysis::ReasoningService;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone, Debug, Default)]
pub struct ServiceState {
    /// Reasoning service, absent when no credentials are configured.
    pub reasoning: Option<ReasoningService>,
}

impl ServiceState {
    /// Creates the state from an optional reasoning service.
    pub fn new(reasoning: Option<ReasoningService>) -> Self {
        Self { reasoning }
    }

    /// Creates a state with a configured reasoning service.
    pub fn with_reasoning(reasoning: ReasoningService) -> Self {
        Self::new(Some(reasoning))
    }

    /// Whether analysis requests can be served.
    pub fn is_configured(&self) -> bool {
        self.reasoning.is_some()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(reasoning: Option<ReasoningService>);
