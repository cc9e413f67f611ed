use thiserror::Error;

use crate::domain::HospitalOperation;

/// Any non-success outcome of a hospital API call.
///
/// Connection errors, non-2xx statuses and undecodable bodies all collapse into
/// this one kind; callers only ever learn which operation failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} request failed: {detail}")]
pub struct TransportFailure {
    pub operation: HospitalOperation,
    pub detail: String,
}

impl TransportFailure {
    pub fn new(operation: HospitalOperation, detail: impl Into<String>) -> Self {
        Self {
            operation,
            detail: detail.into(),
        }
    }
}
