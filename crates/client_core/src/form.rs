use shared::{
    domain::{HospitalId, HospitalRecord},
    protocol::HospitalFields,
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing(HospitalId),
}

/// Form backing the list controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub name: String,
    pub address: String,
    pub edit_mode: EditMode,
    pub message: Option<String>,
}

impl FormState {
    pub fn editing_id(&self) -> Option<&HospitalId> {
        match &self.edit_mode {
            EditMode::Viewing => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    pub fn has_required_fields(&self) -> bool {
        !is_blank(&self.name) && !is_blank(&self.address)
    }

    pub fn fields(&self) -> HospitalFields {
        HospitalFields::new(self.name.clone(), self.address.clone())
    }

    pub(crate) fn load_record(&mut self, record: &HospitalRecord) {
        self.name = record.name.clone();
        self.address = record.address.clone();
        self.edit_mode = EditMode::Editing(record.id.clone());
    }

    pub(crate) fn clear_fields(&mut self) {
        self.name.clear();
        self.address.clear();
    }

    pub(crate) fn reset_to_viewing(&mut self) {
        self.edit_mode = EditMode::Viewing;
        self.clear_fields();
    }
}

/// Form backing the standalone create controller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateFormState {
    pub id: String,
    pub name: String,
    pub address: String,
    pub message: Option<String>,
}

impl CreateFormState {
    pub fn has_required_fields(&self) -> bool {
        !is_blank(&self.id) && !is_blank(&self.name) && !is_blank(&self.address)
    }

    pub fn record(&self) -> HospitalRecord {
        HospitalRecord::new(self.id.as_str(), self.name.clone(), self.address.clone())
    }

    pub(crate) fn clear_fields(&mut self) {
        self.id.clear();
        self.name.clear();
        self.address.clear();
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
