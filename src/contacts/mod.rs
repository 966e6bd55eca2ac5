//! The contact resource: model, repository, and HTTP routes.

pub mod model;
pub mod repository;
pub mod routes;

pub use model::{Contact, ContactPayload, NewContact};
pub use repository::ContactRepository;
pub use routes::contact_routes;
