pub mod academic;
pub mod download;
pub mod password;
pub mod reports;
pub mod session;
pub mod upload;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Logout(GlobalArgs),
    Whoami(GlobalArgs),
    Back(GlobalArgs),
    Reports(reports::Args),
    Upload(upload::Args),
    Download(download::Args),
    ChangePassword(password::Args),
    AcademicSession(academic::Args),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
