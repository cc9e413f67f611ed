use serde::{Deserialize, Serialize};

use crate::domain::HospitalRecord;

/// Body of `POST /hospitals` when the server assigns the id, and of
/// `PUT /hospitals/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalFields {
    pub name: String,
    pub address: String,
}

impl HospitalFields {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }
}

/// Ordered sequence returned by `GET /hospitals`.
pub type HospitalList = Vec<HospitalRecord>;
