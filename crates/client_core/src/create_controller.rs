use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::{
    form::CreateFormState,
    messages::{ALL_FIELDS_ALERT, CREATE_WITH_ID_FAILED, CREATE_WITH_ID_SUCCEEDED},
    transport::HospitalApi,
    Outcome,
};

struct CreateState {
    form: CreateFormState,
    active: bool,
}

struct CreateInner {
    api: Arc<dyn HospitalApi>,
    state: RwLock<CreateState>,
    op_gate: Mutex<()>,
}

/// Standalone "add hospital" form. The caller picks the id; no list is kept.
#[derive(Clone)]
pub struct HospitalCreateController {
    inner: Arc<CreateInner>,
}

impl HospitalCreateController {
    pub fn new(api: Arc<dyn HospitalApi>) -> Self {
        Self {
            inner: Arc::new(CreateInner {
                api,
                state: RwLock::new(CreateState {
                    form: CreateFormState::default(),
                    active: true,
                }),
                op_gate: Mutex::new(()),
            }),
        }
    }

    pub async fn set_id(&self, id: impl Into<String>) {
        self.inner.state.write().await.form.id = id.into();
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.inner.state.write().await.form.name = name.into();
    }

    pub async fn set_address(&self, address: impl Into<String>) {
        self.inner.state.write().await.form.address = address.into();
    }

    pub async fn submit(&self) -> Outcome {
        let record = {
            let mut state = self.inner.state.write().await;
            if !state.active {
                return Outcome::Discarded;
            }
            state.form.message = None;
            if !state.form.has_required_fields() {
                return Outcome::Alert(ALL_FIELDS_ALERT.to_string());
            }
            state.form.record()
        };

        let _gate = self.inner.op_gate.lock().await;
        let result = self.inner.api.create_with_id(&record).await;

        let mut state = self.inner.state.write().await;
        if !state.active {
            return Outcome::Discarded;
        }
        match result {
            Ok(()) => {
                info!(hospital_id = %record.id, "hospitals: record added with client id");
                state.form.clear_fields();
                state.form.message = Some(CREATE_WITH_ID_SUCCEEDED.to_string());
                Outcome::Applied
            }
            Err(failure) => {
                warn!(
                    hospital_id = %record.id,
                    error = %failure.detail,
                    "hospitals: add with client id failed"
                );
                state.form.message = Some(CREATE_WITH_ID_FAILED.to_string());
                Outcome::Failed(CREATE_WITH_ID_FAILED.to_string())
            }
        }
    }

    pub async fn form(&self) -> CreateFormState {
        self.inner.state.read().await.form.clone()
    }

    pub async fn unmount(&self) {
        self.inner.state.write().await.active = false;
    }
}

#[cfg(test)]
#[path = "tests/create_controller_tests.rs"]
mod tests;
