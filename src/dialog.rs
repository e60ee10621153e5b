use serde::Serialize;
use std::collections::HashMap;

use crate::error::CatalogError;

/// The word that must be typed to arm a delete.
pub const DELETE_CONFIRMATION: &str = "delete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteDialog {
    pub state: DialogState,
    pub confirm_text: String,
}

impl DeleteDialog {
    pub fn is_enabled(&self) -> bool {
        self.state == DialogState::Open && self.confirm_text.to_lowercase() == DELETE_CONFIRMATION
    }
}

/// Per-product modal state: the detail view and the typed-confirmation
/// delete dialog. Anything not in the maps is closed.
#[derive(Debug, Default)]
pub struct Dialogs {
    detail: HashMap<i64, DialogState>,
    delete: HashMap<i64, DeleteDialog>,
}

impl Dialogs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn detail_state(&self, id: i64) -> DialogState {
        self.detail.get(&id).copied().unwrap_or_default()
    }

    pub fn open_detail(&mut self, id: i64) {
        self.detail.insert(id, DialogState::Open);
    }

    pub fn close_detail(&mut self, id: i64) {
        self.detail.remove(&id);
    }

    pub fn delete_dialog(&self, id: i64) -> DeleteDialog {
        self.delete.get(&id).cloned().unwrap_or_default()
    }

    pub fn open_delete(&mut self, id: i64) -> DeleteDialog {
        let dialog = self.delete.entry(id).or_default();
        dialog.state = DialogState::Open;
        dialog.clone()
    }

    /// Records what has been typed so far. Only meaningful while open.
    pub fn type_confirmation(&mut self, id: i64, text: &str) -> Result<DeleteDialog, CatalogError> {
        match self.delete.get_mut(&id) {
            Some(dialog) if dialog.state == DialogState::Open => {
                dialog.confirm_text = text.to_string();
                Ok(dialog.clone())
            }
            _ => Err(CatalogError::ConfirmationRequired),
        }
    }

    pub fn cancel_delete(&mut self, id: i64) {
        self.delete.remove(&id);
    }

    /// Consumes an armed dialog. Closed or unarmed dialogs are refused and
    /// left as they are.
    pub fn confirm_delete(&mut self, id: i64) -> Result<(), CatalogError> {
        if !self.delete_dialog(id).is_enabled() {
            return Err(CatalogError::ConfirmationRequired);
        }
        self.delete.remove(&id);
        Ok(())
    }

    /// Drops every dialog belonging to a record that no longer exists.
    pub fn forget(&mut self, id: i64) {
        self.detail.remove(&id);
        self.delete.remove(&id);
    }
}
