//! User-facing texts produced by the controllers.

pub const REQUIRED_FIELDS_ALERT: &str = "Name and address are required.";
pub const ALL_FIELDS_ALERT: &str = "All fields are required.";
pub const DELETE_CONFIRM_PROMPT: &str = "Are you sure you want to delete this hospital?";

pub const LOAD_FAILED: &str = "Failed to load hospitals.";
pub const CREATE_FAILED: &str = "Failed to add hospital.";
pub const UPDATE_FAILED: &str = "Failed to update hospital.";
pub const DELETE_FAILED: &str = "Failed to delete hospital.";

pub const CREATE_WITH_ID_SUCCEEDED: &str = "Hospital added successfully!";
pub const CREATE_WITH_ID_FAILED: &str = "Failed to add hospital.";
