//! Local mirror of the remote hospital collection plus the edit form that
//! drives create/update/delete against it.

use std::sync::Arc;

use shared::{
    domain::{HospitalId, HospitalOperation, HospitalRecord},
    error::TransportFailure,
};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::{
    form::{EditMode, FormState},
    messages::{
        ALL_FIELDS_ALERT, CREATE_FAILED, DELETE_CONFIRM_PROMPT, DELETE_FAILED, LOAD_FAILED,
        REQUIRED_FIELDS_ALERT, UPDATE_FAILED,
    },
    transport::HospitalApi,
    ConfirmPrompt, Outcome,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub hospitals: Vec<HospitalRecord>,
    pub form: FormState,
}

struct ListState {
    hospitals: Vec<HospitalRecord>,
    form: FormState,
    mounted: bool,
    active: bool,
}

impl ListState {
    fn fail(&mut self, message: &str) -> Outcome {
        self.form.message = Some(message.to_string());
        Outcome::Failed(message.to_string())
    }
}

struct ListInner {
    api: Arc<dyn HospitalApi>,
    state: RwLock<ListState>,
    // Held from request to state application so responses land in issue order.
    op_gate: Mutex<()>,
}

/// Handle to one mounted hospital list. Clones share the same mirror.
#[derive(Clone)]
pub struct HospitalListController {
    inner: Arc<ListInner>,
}

impl HospitalListController {
    pub fn new(api: Arc<dyn HospitalApi>) -> Self {
        Self {
            inner: Arc::new(ListInner {
                api,
                state: RwLock::new(ListState {
                    hospitals: Vec::new(),
                    form: FormState::default(),
                    mounted: false,
                    active: true,
                }),
                op_gate: Mutex::new(()),
            }),
        }
    }

    /// Initial read of the collection. Only the first call per controller
    /// issues a request; later calls return `None`.
    pub async fn mount(&self) -> Option<Outcome> {
        {
            let mut state = self.inner.state.write().await;
            if state.mounted || !state.active {
                return None;
            }
            state.mounted = true;
        }
        Some(self.load().await)
    }

    /// Replaces the mirror with the server's current collection.
    pub async fn load(&self) -> Outcome {
        let _gate = self.inner.op_gate.lock().await;
        if !self.is_active().await {
            return Outcome::Discarded;
        }

        let result = self.inner.api.list().await;
        self.apply(HospitalOperation::List, |state| match result {
            Ok(hospitals) => {
                info!(count = hospitals.len(), "hospitals: mirror loaded");
                state.hospitals = hospitals;
                Outcome::Applied
            }
            Err(failure) => {
                log_failure(&failure);
                state.fail(LOAD_FAILED)
            }
        })
        .await
    }

    /// Form submission: update while editing, create otherwise.
    pub async fn submit(&self) -> Outcome {
        let editing = self.inner.state.read().await.form.editing_id().is_some();
        if editing {
            self.update().await
        } else {
            self.create().await
        }
    }

    pub async fn create(&self) -> Outcome {
        let fields = {
            let state = self.inner.state.read().await;
            if !state.form.has_required_fields() {
                return Outcome::Alert(REQUIRED_FIELDS_ALERT.to_string());
            }
            state.form.fields()
        };

        let _gate = self.inner.op_gate.lock().await;
        if !self.is_active().await {
            return Outcome::Discarded;
        }

        let result = self.inner.api.create(&fields).await;
        self.apply(HospitalOperation::Create, |state| match result {
            Ok(record) => {
                info!(hospital_id = %record.id, "hospitals: record created");
                match state.hospitals.iter_mut().find(|h| h.id == record.id) {
                    Some(existing) => {
                        warn!(
                            hospital_id = %record.id,
                            "hospitals: server returned an id already in the mirror"
                        );
                        *existing = record;
                    }
                    None => state.hospitals.push(record),
                }
                state.form.clear_fields();
                Outcome::Applied
            }
            Err(failure) => {
                log_failure(&failure);
                state.fail(CREATE_FAILED)
            }
        })
        .await
    }

    pub async fn update(&self) -> Outcome {
        let (id, fields) = {
            let state = self.inner.state.read().await;
            match state.form.editing_id() {
                Some(id) if state.form.has_required_fields() => (id.clone(), state.form.fields()),
                _ => return Outcome::Alert(ALL_FIELDS_ALERT.to_string()),
            }
        };

        let _gate = self.inner.op_gate.lock().await;
        if !self.is_active().await {
            return Outcome::Discarded;
        }

        let result = self.inner.api.update(&id, &fields).await;
        self.apply(HospitalOperation::Update, |state| match result {
            Ok(()) => {
                info!(hospital_id = %id, "hospitals: record updated");
                if let Some(record) = state.hospitals.iter_mut().find(|h| h.id == id) {
                    record.name = fields.name;
                    record.address = fields.address;
                }
                state.form.reset_to_viewing();
                Outcome::Applied
            }
            Err(failure) => {
                log_failure(&failure);
                state.fail(UPDATE_FAILED)
            }
        })
        .await
    }

    /// Deletes `id` after `confirm` agrees. Failures come back as an alert and
    /// leave the inline message alone.
    pub async fn delete(&self, id: &HospitalId, confirm: &dyn ConfirmPrompt) -> Outcome {
        if !self.is_active().await {
            return Outcome::Discarded;
        }
        if !confirm.confirm(DELETE_CONFIRM_PROMPT) {
            debug!(hospital_id = %id, "hospitals: delete cancelled");
            return Outcome::Cancelled;
        }

        let _gate = self.inner.op_gate.lock().await;
        if !self.is_active().await {
            return Outcome::Discarded;
        }

        let result = self.inner.api.delete(id).await;
        self.apply(HospitalOperation::Delete, |state| match result {
            Ok(()) => {
                info!(hospital_id = %id, "hospitals: record deleted");
                state.hospitals.retain(|h| &h.id != id);
                if state.form.editing_id() == Some(id) {
                    state.form.reset_to_viewing();
                }
                Outcome::Applied
            }
            Err(failure) => {
                log_failure(&failure);
                Outcome::Alert(DELETE_FAILED.to_string())
            }
        })
        .await
    }

    /// Copies the mirrored record into the form and enters edit mode. Returns
    /// `false` when `id` is not in the mirror.
    pub async fn begin_edit(&self, id: &HospitalId) -> bool {
        let mut state = self.inner.state.write().await;
        let Some(record) = state.hospitals.iter().find(|h| &h.id == id).cloned() else {
            return false;
        };
        state.form.load_record(&record);
        true
    }

    /// Leaves edit mode with an empty form, ready for a new record.
    pub async fn begin_create(&self) {
        self.inner.state.write().await.form.reset_to_viewing();
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.inner.state.write().await.form.name = name.into();
    }

    pub async fn set_address(&self, address: impl Into<String>) {
        self.inner.state.write().await.form.address = address.into();
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        let state = self.inner.state.read().await;
        ListSnapshot {
            hospitals: state.hospitals.clone(),
            form: state.form.clone(),
        }
    }

    pub async fn hospitals(&self) -> Vec<HospitalRecord> {
        self.inner.state.read().await.hospitals.clone()
    }

    pub async fn form(&self) -> FormState {
        self.inner.state.read().await.form.clone()
    }

    pub async fn edit_mode(&self) -> EditMode {
        self.inner.state.read().await.form.edit_mode.clone()
    }

    pub async fn is_active(&self) -> bool {
        self.inner.state.read().await.active
    }

    /// Tears the controller down. Responses still in flight are dropped
    /// instead of being applied.
    pub async fn unmount(&self) {
        self.inner.state.write().await.active = false;
    }

    async fn apply(
        &self,
        operation: HospitalOperation,
        mutate: impl FnOnce(&mut ListState) -> Outcome,
    ) -> Outcome {
        let mut state = self.inner.state.write().await;
        if !state.active {
            debug!(operation = %operation, "hospitals: discarding response after unmount");
            return Outcome::Discarded;
        }
        mutate(&mut state)
    }
}

fn log_failure(failure: &TransportFailure) {
    warn!(
        operation = %failure.operation,
        error = %failure.detail,
        "hospitals: operation failed"
    );
}

#[cfg(test)]
#[path = "tests/list_controller_tests.rs"]
mod tests;
