//! Navigable locations of the console. Views and guards refer to routes by
//! variant; only the history adapters deal in raw paths.

use std::fmt;

pub mod paths {
    pub const ROOT: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const STAFF_DASHBOARD: &str = "/staff/dashboard";
    pub const STUDENT_DASHBOARD: &str = "/student/dashboards";
    pub const ADMIN_DASHBOARD: &str = "/admin/dashboard";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    StaffDashboard,
    StudentDashboard,
    AdminDashboard,
}

impl Route {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Root => paths::ROOT,
            Self::Login => paths::LOGIN,
            Self::StaffDashboard => paths::STAFF_DASHBOARD,
            Self::StudentDashboard => paths::STUDENT_DASHBOARD,
            Self::AdminDashboard => paths::ADMIN_DASHBOARD,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}
