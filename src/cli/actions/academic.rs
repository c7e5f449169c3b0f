use crate::{
    cli::globals::{Console, GlobalArgs},
    features::{academic::ensure_academic_session, auth::OrganizationContext},
};
use anyhow::Result;
use chrono::Local;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub reset: bool,
    pub organization: Option<String>,
    pub branch: Option<String>,
}

/// # Errors
/// Returns an error if storage fails or the academic years cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(&args.globals)?;

    if let (Some(organization_id), Some(branch_id)) = (args.organization, args.branch) {
        console.session.set_organization(&OrganizationContext {
            organization_id,
            branch_id,
        })?;
    }
    if args.reset {
        console.session.clear_academic_session()?;
    }

    let today = Local::now().date_naive();
    match ensure_academic_session(&console.client, &console.session, today).await? {
        Some(id) => println!("academic session: {id}"),
        None => println!("academic session not set: organization context or academic years missing"),
    }
    Ok(())
}
