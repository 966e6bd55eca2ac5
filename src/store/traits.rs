//! `ContactStore` trait: the async persistence seam for contacts.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contacts::model::{Contact, NewContact};
use crate::error::DatabaseError;

/// Backend-agnostic store for the contact collection.
///
/// Update and delete are find-and-modify primitives: each is a single atomic
/// operation that reports `None` when no record has the given id.
#[async_trait]
pub trait ContactStore: Send + Sync {
    /// Run all pending schema migrations.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Persist a new contact under a freshly generated id.
    async fn insert_contact(&self, contact: &NewContact) -> Result<Contact, DatabaseError>;

    /// All contacts, in storage order.
    async fn list_contacts(&self) -> Result<Vec<Contact>, DatabaseError>;

    /// Replace all three fields; returns the post-update record.
    async fn update_contact(
        &self,
        id: Uuid,
        contact: &NewContact,
    ) -> Result<Option<Contact>, DatabaseError>;

    /// Remove a contact; returns its state before removal.
    async fn delete_contact(&self, id: Uuid) -> Result<Option<Contact>, DatabaseError>;
}
