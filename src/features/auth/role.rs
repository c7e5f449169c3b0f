//! Maps the login response to a closed `Role` and its landing route.
//!
//! The server sends two loosely-typed fields, `user_type_id` and
//! `user_type_name`. The key is taken from the first one that is textual,
//! lower-cased; if neither is textual the raw `user_type_name` is compared,
//! which can never match a role name and therefore lands on `Role::Default`.
//! This function is pure so every case can be tested without I/O.

use crate::{app_lib::json::field_text, features::auth::session::Session, routes::Route};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Staff,
    Student,
    Principal,
    Default,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Student => "student",
            Self::Principal => "principal",
            Self::Default => "default",
        }
    }

    /// Case-insensitive lookup; anything unrecognized is `Default`.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.to_lowercase().as_str() {
            "staff" => Self::Staff,
            "student" => Self::Student,
            "principal" => Self::Principal,
            _ => Self::Default,
        }
    }

    /// Dashboard the role lands on; `Default` stays where it is.
    #[must_use]
    pub const fn landing(self) -> Option<Route> {
        match self {
            Self::Staff => Some(Route::StaffDashboard),
            Self::Student => Some(Route::StudentDashboard),
            Self::Principal => Some(Route::AdminDashboard),
            Self::Default => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Outcome of resolving a login response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub session: Session,
    pub route: Option<Route>,
}

impl Resolution {
    #[must_use]
    pub fn role(&self) -> Role {
        self.session.role
    }
}

fn role_key(type_code: Option<&Value>, type_name: Option<&Value>) -> Role {
    match (type_code, type_name) {
        (Some(Value::String(code)), _) => Role::from_key(code),
        (_, Some(Value::String(name))) => Role::from_key(name),
        _ => Role::Default,
    }
}

/// Resolves the login response body into a session and an optional redirect.
#[must_use]
pub fn resolve(response: &Value) -> Resolution {
    let Some(body) = response.as_object() else {
        return Resolution {
            session: Session {
                role: Role::Default,
                user_id: String::new(),
                login_id: String::new(),
            },
            route: None,
        };
    };

    let type_code = body.get("user_type_id");
    let role = role_key(type_code, body.get("user_type_name"));

    Resolution {
        session: Session {
            role,
            user_id: field_text(type_code),
            login_id: field_text(body.get("login_id")),
        },
        route: role.landing(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn staff_is_case_insensitive() {
        for code in ["STAFF", "Staff", "staff"] {
            let resolution = resolve(&json!({
                "user_type_id": code,
                "user_type_name": "Lecturer",
                "login_id": 12
            }));
            assert_eq!(resolution.role(), Role::Staff, "code {code}");
            assert_eq!(resolution.route, Some(Route::StaffDashboard));
        }
    }

    #[test]
    fn table_maps_each_role_to_its_dashboard() {
        let cases = [
            ("student", Role::Student, Some(Route::StudentDashboard)),
            ("Principal", Role::Principal, Some(Route::AdminDashboard)),
            ("staff", Role::Staff, Some(Route::StaffDashboard)),
        ];
        for (code, role, route) in cases {
            let resolution = resolve(&json!({"user_type_id": code, "login_id": "L1"}));
            assert_eq!(resolution.role(), role);
            assert_eq!(resolution.route, route);
        }
    }

    #[test]
    fn unrecognized_codes_are_default_without_redirect() {
        let bodies = [
            json!({"user_type_id": "warden", "login_id": 1}),
            json!({"user_type_id": null, "user_type_name": null}),
            json!({"login_id": 1}),
        ];
        for body in bodies {
            let resolution = resolve(&body);
            assert_eq!(resolution.role(), Role::Default, "body {body}");
            assert_eq!(resolution.route, None);
        }
    }

    #[test]
    fn numeric_code_falls_back_to_textual_name() {
        let resolution = resolve(&json!({
            "user_type_id": 3,
            "user_type_name": "PRINCIPAL",
            "login_id": 77
        }));
        assert_eq!(resolution.role(), Role::Principal);
        assert_eq!(resolution.session.user_id, "3");
        assert_eq!(resolution.session.login_id, "77");
    }

    #[test]
    fn textual_code_wins_over_name() {
        let resolution = resolve(&json!({
            "user_type_id": "Student",
            "user_type_name": "staff"
        }));
        assert_eq!(resolution.role(), Role::Student);
    }

    #[test]
    fn non_textual_name_never_matches() {
        let resolution = resolve(&json!({"user_type_id": 1, "user_type_name": 2}));
        assert_eq!(resolution.role(), Role::Default);
    }

    #[test]
    fn non_object_body_degrades_to_default() {
        for body in [json!(null), json!("staff"), json!(["staff"])] {
            let resolution = resolve(&body);
            assert_eq!(resolution.role(), Role::Default);
            assert_eq!(resolution.route, None);
            assert!(resolution.session.user_id.is_empty());
        }
    }
}
