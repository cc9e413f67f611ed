use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Hospital identifier as it appears on the wire.
///
/// Some backends hand out numeric ids; those are accepted and kept in their
/// decimal string form so the mirror compares ids uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HospitalId(pub String);

impl HospitalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for HospitalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for HospitalId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for HospitalId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => Self(value),
            RawId::Signed(value) => Self(value.to_string()),
            RawId::Unsigned(value) => Self(value.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalRecord {
    pub id: HospitalId,
    pub name: String,
    pub address: String,
}

impl HospitalRecord {
    pub fn new(
        id: impl Into<HospitalId>,
        name: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            address: address.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HospitalOperation {
    List,
    Create,
    CreateWithId,
    Update,
    Delete,
}

impl HospitalOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            HospitalOperation::List => "list",
            HospitalOperation::Create => "create",
            HospitalOperation::CreateWithId => "create_with_id",
            HospitalOperation::Update => "update",
            HospitalOperation::Delete => "delete",
        }
    }
}

impl fmt::Display for HospitalOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
