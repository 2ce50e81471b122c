//! Document types stored by the server and exchanged over HTTP.
//!
//! Field names follow the camelCase JSON the web client already speaks;
//! the document id is always serialized as `_id`.

pub mod class;
pub mod ids;
pub mod payment;
pub mod selection;
pub mod user;

pub use class::{Class, ClassDraft, ClassStatus, ClassUpdate, StatusChange};
pub use ids::{ObjectId, ObjectIdError};
pub use payment::{Enrollment, Payment, PaymentRequest};
pub use selection::{NewSelection, Selection};
pub use user::{NewUser, Role, User};
