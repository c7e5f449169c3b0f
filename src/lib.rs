//! # Campusdesk (back-office console session core)
//!
//! `campusdesk` is the client-side core of the school back-office console. It
//! owns the part of the console that carries state: signing in, deciding where a
//! user lands, keeping the browser history from leading back to the login view,
//! and fetching protected report cards.
//!
//! ## Login and Role Routing
//!
//! 1. **Submit:** `features::auth::LoginForm` checks the required fields locally and
//!    posts the credentials to `RegisterEmployee/Login/`.
//! 2. **Resolve:** `features::auth::role::resolve` maps the server user type to a
//!    closed `Role` and its dashboard `Route`.
//! 3. **Persist:** `features::auth::SessionStore` writes `userRole`, `userId` and
//!    `loginId` together.
//! 4. **Lock out:** `features::auth::NavigationGuard` replaces the current history
//!    entry with the application root and keeps re-asserting it on Back/Forward.
//!
//! ## Report Cards
//!
//! Report files live next to the API namespace (`/media/...`), not under it. The
//! fetcher strips the `/api/` suffix from the base URL, attaches the per-tab
//! bearer token when present, and hands the bytes to a `SaveSink`.
//!
//! Platform concerns (storage, history, saving files, alerts) are traits. The
//! `platform` module ships in-process adapters for native targets and browser
//! adapters for `wasm32`.

pub mod app_lib;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod features;
pub mod platform;
pub mod routes;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
