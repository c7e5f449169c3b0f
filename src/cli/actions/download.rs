use crate::{
    cli::globals::{Console, GlobalArgs},
    features::reports::{DownloadOutcome, ReportFetcher},
    platform::{DiskSink, StderrNotifier},
};
use anyhow::{anyhow, Result};
use std::{path::PathBuf, sync::Arc};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
    pub out: PathBuf,
}

/// Downloads one protected file into `out` and waits for its cleanup.
/// # Errors
/// Returns an error if the file cannot be fetched or written.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(&args.globals)?;
    let token = console.session.access_token()?;

    let sink = Arc::new(DiskSink::new(args.out));
    let fetcher = ReportFetcher::new(console.client, sink.clone(), Arc::new(StderrNotifier));

    match fetcher.download(&args.path, token.as_ref()).await? {
        DownloadOutcome::Saved(saved) => {
            let target = sink.target(&saved.filename)?;
            saved.cleanup.finished().await;
            println!("saved {}", target.display());
            Ok(())
        }
        DownloadOutcome::Stale => Err(anyhow!("download response arrived after the view closed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn saves_into_out_dir_with_token() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/media/reports/card_12.pdf"))
            .and(header("Authorization", "Bearer tab-token"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let state = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let mut globals = GlobalArgs::new(format!("{}/api/", server.uri()), state.path().into());
        globals.set_token(secrecy::SecretString::from("tab-token".to_string()));

        execute(Args {
            globals,
            path: "/media/reports/card_12.pdf".to_string(),
            out: out.path().to_path_buf(),
        })
        .await?;

        assert_eq!(std::fs::read(out.path().join("card_12.pdf"))?, b"%PDF-1.4");
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_fails_without_writing() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let state = tempfile::tempdir()?;
        let out = tempfile::tempdir()?;
        let globals = GlobalArgs::new(format!("{}/api/", server.uri()), state.path().into());

        let result = execute(Args {
            globals,
            path: "/media/reports/card_12.pdf".to_string(),
            out: out.path().to_path_buf(),
        })
        .await;

        assert!(result.is_err());
        assert!(!out.path().join("card_12.pdf").exists());
        Ok(())
    }
}
