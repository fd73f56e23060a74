//! JSON file contact store.
//!
//! The contact list is owned and edited elsewhere; the gateway only reads
//! it.  The file is re-read on every snapshot so edits take effect on the
//! next alert without a restart.
//!
//! ```json
//! [
//!   { "name": "Chidi", "phone": "0803 123 4567", "type": "caregiver" },
//!   { "name": "Dr. Eze", "phone": "+2348090000000", "type": "medical" }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::ContactStore;
use crate::dispatch::Contact;

pub struct JsonContactStore {
    path: PathBuf,
}

impl JsonContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactStore for JsonContactStore {
    /// An unreadable or malformed file yields an empty snapshot, which the
    /// dispatcher reports as `NoRecipients`.
    fn list_contacts(&self) -> Vec<Contact> {
        let text = match fs::read_to_string(&self.path) {
            Ok(t) => t,
            Err(e) => {
                warn!("CONTACTS: cannot read {}: {}", self.path.display(), e);
                return Vec::new();
            }
        };
        match serde_json::from_str(&text) {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!("CONTACTS: {} is not a contact list: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}
