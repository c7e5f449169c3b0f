//! Academic-session bootstrap. Dashboards need the current academic year id;
//! it is resolved once per browser profile and cached in long-lived storage.

pub mod client;
pub mod types;

pub use client::{ensure_academic_session, fetch_academic_years, AcademicError};
pub use types::{select_current, AcademicYear};
