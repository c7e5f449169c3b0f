//! Report-card listing, the staff upload, and the authenticated download of
//! the stored PDFs.
//!
//! Files under the media root are protected, so the browser cannot simply
//! follow a link: `ReportFetcher` fetches the bytes with the bearer token,
//! hands them to a `SaveSink` as an object URL, triggers the save and revokes
//! the URL shortly after.

pub mod client;
mod download;
pub mod types;
mod upload;

pub use client::{list_course_reports, list_reports};
pub use download::{
    file_name, Cleanup, DownloadError, DownloadOutcome, ObjectUrl, ReportFetcher, SaveSink, Saved,
    DOWNLOAD_FAILED, REVOKE_DELAY,
};
pub use types::{ReportCard, ReportList};
pub use upload::{
    ReportDocument, ReportUploader, StudentCourse, UploadError, NO_DOCUMENT, NO_STUDENT,
    SAVE_PDF_PATH, UPLOADED, UPLOAD_FAILED, UPLOAD_REMARKS,
};
