//! Auth feature module covering the login form, role resolution, the persisted
//! session and the navigation guard. It keeps authentication logic out of the
//! views. Credentials and tokens cross this boundary, so nothing here logs them.
//!
//! Flow Overview: `LoginForm::submit` validates locally, posts the credentials,
//! hands the response to `role::resolve`, writes the `Session` through
//! `SessionStore`, and tells the `NavigationGuard` the user is authenticated so
//! it can pin the history to the application root before routing to the
//! dashboard.

pub mod client;
mod guard;
mod login;
pub mod role;
mod session;
pub mod types;

pub use guard::{
    GuardRegistration, GuardState, History, NavigationGuard, NavigationListener, NavigationOutcome,
};
pub use login::{AuthError, LoginForm, LoginOutcome};
pub use role::{Resolution, Role};
pub use session::{keys, OrganizationContext, Session, SessionStore};
pub use types::{Credentials, LoginRequest};
