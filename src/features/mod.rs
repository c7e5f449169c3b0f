//! Domain-level console features and their shared logic. Views import these
//! modules to keep rendering code free of session, routing and API handling.

pub mod academic;
pub mod auth;
pub mod password;
pub mod reports;
