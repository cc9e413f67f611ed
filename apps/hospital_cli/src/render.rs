use std::fmt::Write as _;

use client_core::{EditMode, FormState};
use shared::domain::HospitalRecord;

pub(crate) fn hospital_list(hospitals: &[HospitalRecord]) -> String {
    if hospitals.is_empty() {
        return "(no hospitals)\n".to_string();
    }
    let id_width = hospitals.iter().map(|h| h.id.as_str().len()).max().unwrap_or(0);
    let mut out = String::new();
    for hospital in hospitals {
        let _ = writeln!(
            out,
            "{:>id_width$}  {}  |  {}",
            hospital.id.as_str(),
            hospital.name,
            hospital.address
        );
    }
    out
}

pub(crate) fn form(form: &FormState) -> String {
    let mut out = match &form.edit_mode {
        EditMode::Viewing => "Add hospital\n".to_string(),
        EditMode::Editing(id) => format!("Edit hospital {id}\n"),
    };
    if let Some(message) = &form.message {
        let _ = writeln!(out, "  ! {message}");
    }
    let _ = writeln!(out, "  name:    {}", form.name);
    let _ = writeln!(out, "  address: {}", form.address);
    out
}
