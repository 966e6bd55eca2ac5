//! Contact repository: the four operations over the shared store.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::model::{Contact, ContactPayload};
use crate::error::ContactError;
use crate::store::ContactStore;

/// Maps create/list/update/delete intents onto a `ContactStore`,
/// translating store outcomes into `ContactError`.
#[derive(Clone)]
pub struct ContactRepository {
    store: Arc<dyn ContactStore>,
}

impl ContactRepository {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new contact.
    pub async fn create(&self, payload: ContactPayload) -> Result<Contact, ContactError> {
        let new_contact = payload.validate()?;
        let contact = self
            .store
            .insert_contact(&new_contact)
            .await
            .map_err(|e| log_store_error("create", e))?;
        info!(contact_id = %contact.id, "Contact created");
        Ok(contact)
    }

    /// Every stored contact, in storage order.
    pub async fn list(&self) -> Result<Vec<Contact>, ContactError> {
        self.store
            .list_contacts()
            .await
            .map_err(|e| log_store_error("list", e))
    }

    /// Replace all three fields of the contact with `id`.
    ///
    /// The payload is validated before the lookup.
    pub async fn update_by_id(
        &self,
        id: &str,
        payload: ContactPayload,
    ) -> Result<Contact, ContactError> {
        let replacement = payload.validate()?;
        let key = parse_id(id)?;
        let contact = self
            .store
            .update_contact(key, &replacement)
            .await
            .map_err(|e| log_store_error("update", e))?
            .ok_or_else(|| not_found(id))?;
        info!(contact_id = %contact.id, "Contact updated");
        Ok(contact)
    }

    /// Remove the contact with `id`, returning its prior state.
    pub async fn delete_by_id(&self, id: &str) -> Result<Contact, ContactError> {
        let key = parse_id(id)?;
        let contact = self
            .store
            .delete_contact(key)
            .await
            .map_err(|e| log_store_error("delete", e))?
            .ok_or_else(|| not_found(id))?;
        info!(contact_id = %contact.id, "Contact deleted");
        Ok(contact)
    }
}

/// Ids are UUIDs; anything else cannot name a stored contact.
fn parse_id(id: &str) -> Result<Uuid, ContactError> {
    Uuid::parse_str(id).map_err(|_| not_found(id))
}

fn not_found(id: &str) -> ContactError {
    ContactError::NotFound { id: id.to_string() }
}

/// Convert a store failure, keeping the driver detail in the log only.
fn log_store_error(op: &'static str, err: crate::error::DatabaseError) -> ContactError {
    warn!(op, error = %err, "Contact store operation failed");
    ContactError::from(err)
}
