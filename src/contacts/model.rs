//! Contact data model and request validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// A stored contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Generated by the store on insert; never changes afterwards.
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// The three user-supplied fields of a contact, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl NewContact {
    /// Attach a store-assigned id.
    pub fn with_id(self, id: Uuid) -> Contact {
        Contact {
            id,
            name: self.name,
            email: self.email,
            message: self.message,
        }
    }
}

/// Request body for create and update, as it arrives on the wire.
///
/// Every field is optional here so that a missing field becomes a
/// `ValidationError` instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ContactPayload {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            message: Some(message.into()),
        }
    }

    /// Check that all three fields are present and non-empty.
    ///
    /// Reports every missing field at once, in declaration order.
    pub fn validate(self) -> Result<NewContact, ValidationError> {
        let mut missing = Vec::new();
        let name = required("name", self.name, &mut missing);
        let email = required("email", self.email, &mut missing);
        let message = required("message", self.message, &mut missing);

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) => Ok(NewContact {
                name,
                email,
                message,
            }),
            _ => Err(ValidationError::MissingFields(missing)),
        }
    }
}

fn required(
    field: &'static str,
    value: Option<String>,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}
