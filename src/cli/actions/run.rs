use crate::cli::actions::{academic, download, password, reports, session, upload, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => session::login(args).await,
        Action::Logout(globals) => session::logout(&globals),
        Action::Whoami(globals) => session::whoami(&globals),
        Action::Back(globals) => session::back(&globals),
        Action::Reports(args) => reports::execute(args).await,
        Action::Upload(args) => upload::execute(args).await,
        Action::Download(args) => download::execute(args).await,
        Action::ChangePassword(args) => password::execute(args).await,
        Action::AcademicSession(args) => academic::execute(args).await,
    }
}
