//! Staff-side report-card upload. The form carries the cached academic session
//! and the signed-in account as the uploader; both may be missing after a
//! partial logout, in which case the fields go out empty and the server
//! decides.

use crate::{
    app_lib::{
        api::Blob,
        json::field_text,
        ApiClient, AppError, BusyFlag, Notifier, StorageError,
    },
    features::auth::SessionStore,
};
use reqwest::multipart::{Form, Part};
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub const SAVE_PDF_PATH: &str = "reportcard/save-pdf/";
pub const UPLOAD_REMARKS: &str = "Uploaded via Staff/Admin Panel";
pub const UPLOADED: &str = "Document uploaded successfully!";
pub const NO_STUDENT: &str = "No student data available. Please select a student first.";
pub const NO_DOCUMENT: &str = "Please select a document to upload.";
pub const UPLOAD_FAILED: &str = "An error occurred while uploading the document.";
const UNKNOWN_ERROR: &str = "Unknown error";

/// The enrolment a report card belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StudentCourse {
    pub student_course_id: String,
    pub semester_id: String,
}

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportDocument {
    pub filename: String,
    pub blob: Blob,
}

/// Display text doubles as the alert shown to the user.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{}", NO_STUDENT)]
    MissingStudent,
    #[error("{}", NO_DOCUMENT)]
    MissingDocument,
    #[error("upload already in progress")]
    Busy,
    #[error("Error uploading document: {0}")]
    Rejected(String),
    #[error("{}", UPLOAD_FAILED)]
    Transport(AppError),
    #[error("{}", UPLOAD_FAILED)]
    Storage(#[from] StorageError),
}

/// Uploads report cards for one mounted view.
pub struct ReportUploader {
    client: ApiClient,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    busy: BusyFlag,
}

impl ReportUploader {
    pub fn new(client: ApiClient, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            session,
            notifier,
            busy: BusyFlag::new(),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Sends `document` as the report card of `course`. Every outcome except
    /// `Busy` is announced through the notifier.
    ///
    /// # Errors
    /// `MissingStudent`/`MissingDocument` before any request, `Busy` while
    /// another upload runs, `Rejected` when the server refuses the file,
    /// `Transport`/`Storage` otherwise.
    #[instrument(skip(self, document, bearer), fields(student_course_id = %course.student_course_id))]
    pub async fn upload(
        &self,
        course: &StudentCourse,
        document: Option<ReportDocument>,
        bearer: Option<&SecretString>,
    ) -> Result<(), UploadError> {
        let result = self.send(course, document, bearer).await;
        match &result {
            Ok(()) => self.notifier.alert(UPLOADED),
            Err(UploadError::Busy) => {}
            Err(err) => {
                warn!("upload failed: {err}");
                self.notifier.alert(&err.to_string());
            }
        }
        result
    }

    async fn send(
        &self,
        course: &StudentCourse,
        document: Option<ReportDocument>,
        bearer: Option<&SecretString>,
    ) -> Result<(), UploadError> {
        let student_course_id = course.student_course_id.trim();
        if student_course_id.is_empty() {
            return Err(UploadError::MissingStudent);
        }
        let document = document
            .filter(|document| !document.blob.bytes.is_empty())
            .ok_or(UploadError::MissingDocument)?;

        let _busy = self.busy.try_acquire().ok_or(UploadError::Busy)?;

        let academic_year_id = self.session.academic_session_id()?.unwrap_or_default();
        if academic_year_id.is_empty() {
            warn!("no academic session cached, uploading without one");
        }
        let created_by = self
            .session
            .read()?
            .map(|session| session.login_id)
            .unwrap_or_default();

        let form = Form::new()
            .text("student_course_id", student_course_id.to_string())
            .text("academic_year_id", academic_year_id)
            .text("semester_id", course.semester_id.trim().to_string())
            .text("created_by", created_by)
            .part("pdf_file", document_part(document)?)
            .text("remarks", UPLOAD_REMARKS);

        let body = match self
            .client
            .post_multipart::<Value>(SAVE_PDF_PATH, form, bearer)
            .await
        {
            Ok(body) => body,
            Err(AppError::Http { status, detail, .. }) => {
                warn!(status, "upload rejected");
                return Err(UploadError::Rejected(
                    detail.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
                ));
            }
            Err(err) => return Err(UploadError::Transport(err)),
        };

        if field_text(body.get("status")) == "success" {
            info!("report card uploaded");
            return Ok(());
        }
        let message = field_text(body.get("message"));
        Err(UploadError::Rejected(if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        }))
    }
}

fn document_part(document: ReportDocument) -> Result<Part, UploadError> {
    let part = Part::bytes(document.blob.bytes).file_name(document.filename);
    match document.blob.content_type {
        Some(content_type) => part.mime_str(&content_type).map_err(|err| {
            UploadError::Transport(AppError::Serialization(format!(
                "Invalid content type {content_type:?}: {err}"
            )))
        }),
        None => Ok(part),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app_lib::{AppConfig, KeyValueStorage},
        platform::{MemoryStorage, RecordingNotifier},
    };
    use anyhow::{anyhow, Result};
    use serde_json::json;
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    struct Fixture {
        uploader: ReportUploader,
        local: Arc<MemoryStorage>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixture(base: &str, local: MemoryStorage) -> Result<Fixture> {
        let client = ApiClient::new(AppConfig::new(format!("{base}/api/")))?;
        let local = Arc::new(local);
        let session = SessionStore::new(local.clone(), Arc::new(MemoryStorage::new()));
        let notifier = Arc::new(RecordingNotifier::new());
        let uploader = ReportUploader::new(client, session, notifier.clone());
        Ok(Fixture {
            uploader,
            local,
            notifier,
        })
    }

    fn signed_in() -> MemoryStorage {
        MemoryStorage::with_items([
            ("userRole", "staff"),
            ("userId", "Staff"),
            ("loginId", "41"),
            ("academicSessionId", "2024"),
        ])
    }

    fn course() -> StudentCourse {
        StudentCourse {
            student_course_id: "88".to_string(),
            semester_id: "4".to_string(),
        }
    }

    fn pdf() -> ReportDocument {
        ReportDocument {
            filename: "card_88.pdf".to_string(),
            blob: Blob {
                bytes: b"%PDF-1.4".to_vec(),
                content_type: Some("application/pdf".to_string()),
            },
        }
    }

    /// Value of a text field in a multipart body.
    fn form_field(body: &str, name: &str) -> Option<String> {
        let marker = format!("name=\"{name}\"\r\n\r\n");
        let start = body.find(&marker)? + marker.len();
        body[start..].split("\r\n").next().map(ToString::to_string)
    }

    async fn only_body(server: &MockServer) -> Result<String> {
        let requests = server.received_requests().await.unwrap_or_default();
        let [request] = requests.as_slice() else {
            return Err(anyhow!("expected one request, got {}", requests.len()));
        };
        Ok(String::from_utf8_lossy(&request.body).into_owned())
    }

    #[tokio::test]
    async fn upload_sends_session_ids_and_file() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .and(header("Authorization", "Bearer tab-token"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let token = SecretString::from("tab-token".to_string());
        fx.uploader.upload(&course(), Some(pdf()), Some(&token)).await?;

        let body = only_body(&server).await?;
        assert_eq!(form_field(&body, "student_course_id").as_deref(), Some("88"));
        assert_eq!(form_field(&body, "academic_year_id").as_deref(), Some("2024"));
        assert_eq!(form_field(&body, "semester_id").as_deref(), Some("4"));
        assert_eq!(form_field(&body, "created_by").as_deref(), Some("41"));
        assert_eq!(form_field(&body, "remarks").as_deref(), Some(UPLOAD_REMARKS));
        assert!(body.contains("name=\"pdf_file\"; filename=\"card_88.pdf\""));
        assert!(body.contains("%PDF-1.4"));
        assert_eq!(fx.notifier.alerts(), vec![UPLOADED]);
        Ok(())
    }

    #[tokio::test]
    async fn missing_academic_session_still_uploads() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .expect(1)
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        fx.local.remove("academicSessionId")?;
        fx.uploader.upload(&course(), Some(pdf()), None).await?;

        let body = only_body(&server).await?;
        assert_eq!(form_field(&body, "academic_year_id").as_deref(), Some(""));
        assert_eq!(form_field(&body, "created_by").as_deref(), Some("41"));
        Ok(())
    }

    #[tokio::test]
    async fn missing_student_or_file_sends_nothing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let no_student = StudentCourse {
            student_course_id: "  ".to_string(),
            semester_id: "4".to_string(),
        };
        let result = fx.uploader.upload(&no_student, Some(pdf()), None).await;
        assert!(matches!(result, Err(UploadError::MissingStudent)));

        let empty = ReportDocument {
            filename: "card.pdf".to_string(),
            blob: Blob {
                bytes: Vec::new(),
                content_type: None,
            },
        };
        let result = fx.uploader.upload(&course(), Some(empty), None).await;
        assert!(matches!(result, Err(UploadError::MissingDocument)));
        let result = fx.uploader.upload(&course(), None, None).await;
        assert!(matches!(result, Err(UploadError::MissingDocument)));

        assert_eq!(fx.notifier.alerts(), vec![NO_STUDENT, NO_DOCUMENT, NO_DOCUMENT]);
        Ok(())
    }

    #[tokio::test]
    async fn refusal_alerts_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "error",
                "message": "Report already exists",
                "errors": {"pdf_file": ["x".repeat(300)]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let result = fx.uploader.upload(&course(), Some(pdf()), None).await;

        assert!(
            matches!(result, Err(UploadError::Rejected(ref message)) if message == "Report already exists")
        );
        assert_eq!(
            fx.notifier.alerts(),
            vec!["Error uploading document: Report already exists"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn ok_status_without_success_is_unknown_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "pending"})))
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let result = fx.uploader.upload(&course(), Some(pdf()), None).await;

        assert!(matches!(result, Err(UploadError::Rejected(ref message)) if message == UNKNOWN_ERROR));
        assert_eq!(
            fx.notifier.alerts(),
            vec!["Error uploading document: Unknown error"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn non_json_reply_is_generic_failure() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let result = fx.uploader.upload(&course(), Some(pdf()), None).await;

        assert!(matches!(result, Err(UploadError::Transport(AppError::Parse(_)))));
        assert_eq!(fx.notifier.alerts(), vec![UPLOAD_FAILED]);
        Ok(())
    }

    #[tokio::test]
    async fn second_upload_while_busy_is_suppressed() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/reportcard/save-pdf/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let fx = fixture(&server.uri(), signed_in())?;
        let first_course = course();
        let (first, second) = tokio::join!(
            fx.uploader.upload(&first_course, Some(pdf()), None),
            async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                fx.uploader.upload(&course(), Some(pdf()), None).await
            }
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(UploadError::Busy)));
        assert_eq!(fx.notifier.alerts(), vec![UPLOADED]);
        Ok(())
    }
}
