//! libSQL backend — async `ContactStore` implementation.
//!
//! Supports local file, in-memory, and remote (`libsql://`) databases.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use libsql::{Connection, Database as LibSqlDatabase, params};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::StoreConfig;
use crate::contacts::model::{Contact, NewContact};
use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::ContactStore;

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
/// `libsql::Connection` is `Send + Sync` and safe for concurrent async use.
pub struct LibSqlBackend {
    #[allow(dead_code)]
    db: Arc<LibSqlDatabase>,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open the store described by `config` and run migrations.
    pub async fn open(config: &StoreConfig) -> Result<Self, DatabaseError> {
        match config {
            StoreConfig::Local { path } => Self::new_local(Path::new(path)).await,
            StoreConfig::Memory => Self::new_memory().await,
            StoreConfig::Remote { url, auth_token } => Self::new_remote(url, auth_token).await,
        }
    }

    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Connection(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open libSQL database: {e}")))?;

        let backend = Self::from_database(db).await?;
        info!(path = %path.display(), "Database opened");
        Ok(backend)
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Connection(format!("Failed to create in-memory database: {e}"))
            })?;

        Self::from_database(db).await
    }

    /// Connect to a remote libSQL server and run migrations.
    pub async fn new_remote(url: &str, auth_token: &SecretString) -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_remote(url.to_string(), auth_token.expose_secret().to_string())
            .build()
            .await
            .map_err(|e| DatabaseError::Connection(format!("Failed to open remote database: {e}")))?;

        let backend = Self::from_database(db).await?;
        info!(url = %url, "Remote database connected");
        Ok(backend)
    }

    async fn from_database(db: LibSqlDatabase) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Connection(format!("Failed to create connection: {e}")))?;

        let backend = Self {
            db: Arc::new(db),
            conn,
        };
        backend.run_migrations().await?;
        Ok(backend)
    }

    /// Get the connection.
    fn conn(&self) -> &Connection {
        &self.conn
    }
}

// ── Helper functions ────────────────────────────────────────────────

const CONTACT_COLUMNS: &str = "id, name, email, message";

/// Map a libsql Row to a Contact.
///
/// Column order matches CONTACT_COLUMNS.
fn row_to_contact(row: &libsql::Row) -> Result<Contact, DatabaseError> {
    let id_str: String = row
        .get(0)
        .map_err(|e| DatabaseError::Query(format!("contact row id: {e}")))?;
    let id = Uuid::parse_str(&id_str)
        .map_err(|e| DatabaseError::Query(format!("contact row id {id_str:?}: {e}")))?;
    let text = |idx: i32, column: &str| -> Result<String, DatabaseError> {
        row.get::<String>(idx)
            .map_err(|e| DatabaseError::Query(format!("contact row {column}: {e}")))
    };

    Ok(Contact {
        id,
        name: text(1, "name")?,
        email: text(2, "email")?,
        message: text(3, "message")?,
    })
}

/// Read at most one contact from a `RETURNING` result set.
async fn first_contact(
    mut rows: libsql::Rows,
    op: &str,
) -> Result<Option<Contact>, DatabaseError> {
    match rows.next().await {
        Ok(Some(row)) => Ok(Some(row_to_contact(&row)?)),
        Ok(None) => Ok(None),
        Err(e) => Err(DatabaseError::Query(format!("{op} row: {e}"))),
    }
}

// ── Trait implementation ────────────────────────────────────────────

#[async_trait]
impl ContactStore for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(self.conn()).await
    }

    async fn insert_contact(&self, contact: &NewContact) -> Result<Contact, DatabaseError> {
        let id = Uuid::new_v4();
        self.conn()
            .execute(
                "INSERT INTO contacts (id, name, email, message) VALUES (?1, ?2, ?3, ?4)",
                params![
                    id.to_string(),
                    contact.name.as_str(),
                    contact.email.as_str(),
                    contact.message.as_str(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_statement("insert_contact", e))?;

        debug!(contact_id = %id, "Contact inserted into DB");
        Ok(contact.clone().with_id(id))
    }

    async fn list_contacts(&self) -> Result<Vec<Contact>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY rowid ASC"),
                (),
            )
            .await
            .map_err(|e| DatabaseError::from_statement("list_contacts", e))?;

        let mut contacts = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("list_contacts row: {e}")))?
        {
            contacts.push(row_to_contact(&row)?);
        }
        Ok(contacts)
    }

    async fn update_contact(
        &self,
        id: Uuid,
        contact: &NewContact,
    ) -> Result<Option<Contact>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!(
                    "UPDATE contacts SET name = ?1, email = ?2, message = ?3, updated_at = datetime('now') \
                     WHERE id = ?4 RETURNING {CONTACT_COLUMNS}"
                ),
                params![
                    contact.name.as_str(),
                    contact.email.as_str(),
                    contact.message.as_str(),
                    id.to_string(),
                ],
            )
            .await
            .map_err(|e| DatabaseError::from_statement("update_contact", e))?;

        let updated = first_contact(rows, "update_contact").await?;
        debug!(contact_id = %id, found = updated.is_some(), "Contact update applied");
        Ok(updated)
    }

    async fn delete_contact(&self, id: Uuid) -> Result<Option<Contact>, DatabaseError> {
        let rows = self
            .conn()
            .query(
                &format!("DELETE FROM contacts WHERE id = ?1 RETURNING {CONTACT_COLUMNS}"),
                params![id.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::from_statement("delete_contact", e))?;

        let deleted = first_contact(rows, "delete_contact").await?;
        debug!(contact_id = %id, found = deleted.is_some(), "Contact delete applied");
        Ok(deleted)
    }
}
