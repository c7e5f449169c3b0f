use crate::cli::{
    actions::{academic, download, password, reports, session, upload, Action},
    commands::{ARG_ACCESS_TOKEN, ARG_API_URL, ARG_STATE_DIR},
    globals::GlobalArgs,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let api_url = required(matches, ARG_API_URL)?;
    let state_dir = PathBuf::from(required(matches, ARG_STATE_DIR)?);

    let mut globals = GlobalArgs::new(api_url, state_dir);
    if let Some(token) = matches
        .get_one::<String>(ARG_ACCESS_TOKEN)
        .filter(|token| !token.trim().is_empty())
    {
        globals.set_token(SecretString::from(token.clone()));
    }
    Ok(globals)
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    let action = match matches.subcommand() {
        Some(("login", sub_m)) => Action::Login(session::LoginArgs {
            globals,
            username: required(sub_m, "username")?,
            password: SecretString::from(required(sub_m, "password")?),
        }),
        Some(("logout", _)) => Action::Logout(globals),
        Some(("whoami", _)) => Action::Whoami(globals),
        Some(("back", _)) => Action::Back(globals),
        Some(("reports", sub_m)) => Action::Reports(reports::Args {
            globals,
            student: required(sub_m, "student")?,
            semester: required(sub_m, "semester")?,
        }),
        Some(("upload", sub_m)) => Action::Upload(upload::Args {
            globals,
            file: PathBuf::from(required(sub_m, "file")?),
            student_course: required(sub_m, "student-course")?,
            semester: required(sub_m, "semester")?,
        }),
        Some(("download", sub_m)) => Action::Download(download::Args {
            globals,
            path: required(sub_m, "path")?,
            out: PathBuf::from(required(sub_m, "out")?),
        }),
        Some(("change-password", sub_m)) => Action::ChangePassword(password::Args {
            globals,
            username: required(sub_m, "username")?,
            old: SecretString::from(required(sub_m, "old")?),
            new: SecretString::from(required(sub_m, "new")?),
            confirm: SecretString::from(required(sub_m, "confirm")?),
        }),
        Some(("academic-session", sub_m)) => Action::AcademicSession(academic::Args {
            globals,
            reset: sub_m.get_flag("reset"),
            organization: sub_m.get_one::<String>("organization").cloned(),
            branch: sub_m.get_one::<String>("branch").cloned(),
        }),
        Some((name, _)) => anyhow::bail!("unknown command: {name}"),
        None => anyhow::bail!("no command given"),
    };

    Ok(action)
}
