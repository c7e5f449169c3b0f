use crate::{
    app_lib::{ApiClient, AppError, StorageError},
    features::{
        academic::types::{select_current, AcademicYear},
        auth::{OrganizationContext, SessionStore},
    },
};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
use url::form_urlencoded;

pub const ACADEMIC_YEARS_PATH: &str = "AcademicYear/GetAllAcademicYear/";

#[derive(Debug, Error)]
pub enum AcademicError {
    #[error("failed to load academic years: {0}")]
    Transport(#[from] AppError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default, Deserialize)]
struct AcademicYearList {
    #[serde(default)]
    data: Vec<AcademicYear>,
}

/// Academic years configured for an organization branch.
///
/// # Errors
/// Returns an error on transport failure, a non-success status, or an
/// undecodable body.
pub async fn fetch_academic_years(
    client: &ApiClient,
    organization: &OrganizationContext,
) -> Result<Vec<AcademicYear>, AppError> {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("organization_id", &organization.organization_id)
        .append_pair("branch_id", &organization.branch_id)
        .finish();
    let list: AcademicYearList = client
        .get_json(&format!("{ACADEMIC_YEARS_PATH}?{query}"), None)
        .await?;
    Ok(list.data)
}

/// Returns the cached academic-session id, resolving and caching it first when
/// missing. Without an organization context nothing is fetched.
///
/// # Errors
/// Returns an error if storage cannot be read or written, or the academic
/// years cannot be loaded.
pub async fn ensure_academic_session(
    client: &ApiClient,
    session: &SessionStore,
    today: NaiveDate,
) -> Result<Option<String>, AcademicError> {
    if let Some(id) = session.academic_session_id()? {
        debug!(academic_session_id = %id, "academic session already set");
        return Ok(Some(id));
    }

    let Some(organization) = session.organization()? else {
        debug!("no organization context; academic session left unset");
        return Ok(None);
    };

    let years = fetch_academic_years(client, &organization).await?;
    let Some(year) = select_current(&years, today) else {
        return Ok(None);
    };

    let id = year.id_text();
    session.set_academic_session_id(&id)?;
    info!(academic_session_id = %id, "academic session initialized");
    Ok(Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app_lib::AppConfig, features::auth::keys, platform::MemoryStorage};
    use anyhow::Result;
    use serde_json::json;
    use std::{net::TcpListener, sync::Arc};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap_or_default()
    }

    async fn server_with_years(expected_calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/AcademicYear/GetAllAcademicYear/"))
            .and(query_param("organization_id", "1"))
            .and(query_param("branch_id", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": 7, "date_from": "2023-06-01", "date_to": "2024-05-31"},
                    {"id": 8, "date_from": "2024-06-01", "date_to": "2025-05-31"}
                ]
            })))
            .expect(expected_calls)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn resolves_and_caches_current_year() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = server_with_years(1).await;
        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let local = Arc::new(MemoryStorage::with_items([
            (keys::ORG_ID, "1"),
            (keys::BRANCH_ID, "2"),
        ]));
        let session = SessionStore::new(local.clone(), Arc::new(MemoryStorage::new()));

        let id = ensure_academic_session(&client, &session, today()).await?;
        assert_eq!(id.as_deref(), Some("8"));

        // cached: no second request
        let again = ensure_academic_session(&client, &session, today()).await?;
        assert_eq!(again.as_deref(), Some("8"));
        assert_eq!(
            local.snapshot().get(keys::ACADEMIC_SESSION_ID).map(String::as_str),
            Some("8")
        );
        Ok(())
    }

    #[tokio::test]
    async fn without_organization_nothing_is_fetched() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = server_with_years(0).await;
        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let session = SessionStore::new(
            Arc::new(MemoryStorage::with_items([(keys::ORG_ID, "1")])),
            Arc::new(MemoryStorage::new()),
        );

        assert_eq!(ensure_academic_session(&client, &session, today()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn empty_list_leaves_cache_unset() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .mount(&server)
            .await;
        let client = ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?;
        let local = Arc::new(MemoryStorage::new());
        let tab = Arc::new(MemoryStorage::with_items([
            (keys::TAB_ORGANIZATION_ID, "1"),
            (keys::TAB_BRANCH_ID, "2"),
        ]));
        let session = SessionStore::new(local.clone(), tab);

        assert_eq!(ensure_academic_session(&client, &session, today()).await?, None);
        assert!(local.snapshot().is_empty());
        Ok(())
    }
}
