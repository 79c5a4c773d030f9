//! Database access layer.
//!
//! Plain query functions over a `PgPool`; no business logic. Store errors
//! are stringified into [`AuthError::Database`](crate::errors::AuthError)
//! at this boundary and stay fatal all the way up.

pub mod consumers;
pub mod jwt_secrets;
