pub mod config;
pub mod create_controller;
pub mod form;
pub mod list_controller;
pub mod messages;
pub mod transport;

pub use create_controller::HospitalCreateController;
pub use form::{CreateFormState, EditMode, FormState};
pub use list_controller::{HospitalListController, ListSnapshot};
pub use transport::{HospitalApi, HttpHospitalApi};

/// How a controller operation ended, as seen by whatever renders it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server confirmed the operation and local state now reflects it.
    Applied,
    /// Blocking alert for the user. Local state is unchanged.
    Alert(String),
    /// Failure recorded as the form's inline message. Local state is otherwise
    /// unchanged.
    Failed(String),
    /// The user declined the confirmation; nothing was sent.
    Cancelled,
    /// The controller was unmounted before the response could be applied.
    Discarded,
}

/// Blocking yes/no question put to the user before a destructive request.
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
#[path = "tests/fake_api.rs"]
pub(crate) mod fake_api;
