use crate::{
    app_lib::{ApiClient, AppError},
    features::reports::types::{ReportCard, ReportList},
};
use secrecy::SecretString;
use serde_json::Value;
use tracing::debug;

/// Fetches a report envelope; a success response that is not JSON, or has an
/// unexpected shape, yields an empty list.
async fn fetch_cards(
    client: &ApiClient,
    path: &str,
    bearer: Option<&SecretString>,
) -> Result<Vec<ReportCard>, AppError> {
    let body = match client.get_json::<Value>(path, bearer).await {
        Ok(body) => body,
        Err(AppError::Parse(err)) => {
            debug!("report list is not JSON: {err}");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    Ok(serde_json::from_value::<ReportList>(body)
        .map(ReportList::into_cards)
        .unwrap_or_default())
}

/// Report cards uploaded for `student_id`, restricted to `semester_id`.
///
/// A success response with an unexpected shape yields an empty list.
///
/// # Errors
/// Returns an error on transport failure or a non-success status.
pub async fn list_reports(
    client: &ApiClient,
    student_id: &str,
    semester_id: &str,
    bearer: Option<&SecretString>,
) -> Result<Vec<ReportCard>, AppError> {
    let path = format!(
        "reportcard/get-reports-by-student/{}/",
        student_id.trim()
    );
    let cards = fetch_cards(client, &path, bearer).await?;

    Ok(cards
        .into_iter()
        .filter(|card| card.in_semester(semester_id))
        .collect())
}

/// Report cards stored for one student course enrolment, most recent first.
///
/// # Errors
/// Returns an error on transport failure or a non-success status.
pub async fn list_course_reports(
    client: &ApiClient,
    student_course_id: &str,
    bearer: Option<&SecretString>,
) -> Result<Vec<ReportCard>, AppError> {
    let path = format!("reportcard/get-reports/{}/", student_course_id.trim());
    fetch_cards(client, &path, bearer).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::AppConfig;
    use anyhow::Result;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    async fn client_for(server: &MockServer) -> Result<ApiClient> {
        Ok(ApiClient::new(AppConfig::new(format!("{}/api/", server.uri())))?)
    }

    #[tokio::test]
    async fn keeps_only_requested_semester() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reportcard/get-reports-by-student/12/"))
            .and(header("Authorization", "Bearer tab-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [
                    {"id": 1, "semester_id": 3, "semester_code": "S3", "pdf_url": "/media/reports/card_1.pdf"},
                    {"id": 2, "semester_id": 4, "semester_code": "S4", "pdf_url": "/media/reports/card_2.pdf"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await?;
        let token = SecretString::from("tab-token".to_string());
        let cards = list_reports(&client, "12", "4", Some(&token)).await?;

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].semester_label(), "S4");
        Ok(())
    }

    #[tokio::test]
    async fn unexpected_body_is_empty() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reportcard/get-reports-by-student/12/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await?;
        assert!(list_reports(&client, "12", "4", None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn server_error_surfaces() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server).await?;
        let result = list_reports(&client, "12", "4", None).await;
        assert_eq!(result.err().and_then(|err| err.status()), Some(500));
        Ok(())
    }

    #[tokio::test]
    async fn course_reports_keep_every_semester() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/reportcard/get-reports/88/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success",
                "data": [
                    {"id": 9, "semester_id": "4", "pdf_url": "/media/reports/card_9.pdf"},
                    {"id": 5, "semester_id": 3, "pdf_url": "/media/reports/card_5.pdf"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await?;
        let cards = list_course_reports(&client, " 88 ", None).await?;

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].file_path(), Some("/media/reports/card_9.pdf"));
        Ok(())
    }
}
