use crate::{
    app_lib::api::Blob,
    cli::globals::{Console, GlobalArgs},
    features::reports::{list_course_reports, ReportDocument, ReportUploader, StudentCourse},
    platform::StderrNotifier,
};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub file: PathBuf,
    pub student_course: String,
    pub semester: String,
}

fn read_document(file: &Path) -> Result<ReportDocument> {
    let filename = file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("not a file name: {}", file.display()))?
        .to_string();
    let bytes = fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
    let content_type = file
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.eq_ignore_ascii_case("pdf"))
        .map(|_| "application/pdf".to_string());

    Ok(ReportDocument {
        filename,
        blob: Blob {
            bytes,
            content_type,
        },
    })
}

/// Shows the course's current report card, then uploads `file` in its place.
/// # Errors
/// Returns an error if the file cannot be read or the upload fails.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(&args.globals)?;
    let token = console.session.access_token()?;

    match list_course_reports(&console.client, &args.student_course, token.as_ref()).await {
        Ok(cards) => match cards.first().and_then(|card| card.file_path()) {
            Some(existing) => println!("existing report: {existing}"),
            None => println!("no report uploaded yet"),
        },
        Err(err) => warn!("could not load existing reports: {err}"),
    }

    let document = read_document(&args.file)?;
    let uploader = ReportUploader::new(
        console.client.clone(),
        console.session.clone(),
        Arc::new(StderrNotifier),
    );
    let course = StudentCourse {
        student_course_id: args.student_course,
        semester_id: args.semester,
    };
    uploader
        .upload(&course, Some(document), token.as_ref())
        .await?;
    Ok(())
}
