use crate::{
    cli::globals::{Console, GlobalArgs},
    features::auth::{Credentials, History, LoginForm, LoginOutcome, NavigationOutcome},
};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

/// Signs in and reports where the role lands.
/// # Errors
/// Returns an error on validation failure, a rejected login, or a storage failure.
pub async fn login(args: LoginArgs) -> Result<()> {
    let console = Console::open(&args.globals)?;
    let _view = console.guard.mount();

    let form = LoginForm::new(
        console.client.clone(),
        console.session.clone(),
        console.guard.clone(),
    );
    let credentials = Credentials {
        username: args.username,
        password: args.password,
    };

    match form.submit(&credentials).await? {
        LoginOutcome::SignedIn(resolution) => {
            println!("signed in as {}", resolution.role());
            match resolution.route {
                Some(route) => println!("landing: {route}"),
                None => println!("landing: none for this role"),
            }
            Ok(())
        }
        LoginOutcome::Stale => Err(anyhow!("login response arrived after the form closed")),
    }
}

/// # Errors
/// Returns an error if the session cannot be cleared.
pub fn logout(globals: &GlobalArgs) -> Result<()> {
    let console = Console::open(globals)?;
    console.guard.logout()?;
    println!("signed out");
    Ok(())
}

/// # Errors
/// Returns an error if the stored session cannot be read.
pub fn whoami(globals: &GlobalArgs) -> Result<()> {
    let console = Console::open(globals)?;
    let Some(session) = console.session.read()? else {
        println!("not signed in");
        return Ok(());
    };

    println!("role: {}", session.role);
    println!("user id: {}", session.user_id);
    println!("login id: {}", session.login_id);
    if let Some(id) = console.session.academic_session_id()? {
        println!("academic session: {id}");
    }
    Ok(())
}

/// Replays one Back event on a freshly loaded console.
/// # Errors
/// Returns an error if the console cannot be opened.
pub fn back(globals: &GlobalArgs) -> Result<()> {
    let console = Console::open(globals)?;
    let _view = console.guard.mount();

    // a fresh page load holds a single entry, so the event fires in place
    let outcome = console
        .history
        .notify()
        .unwrap_or(NavigationOutcome::Ignored);
    debug!(?outcome, "back event");
    let summary = match outcome {
        NavigationOutcome::Ignored => "ignored",
        NavigationOutcome::RootReasserted => "root reasserted",
        NavigationOutcome::LoggedOut => "signed out",
    };
    println!("{summary}: {}", console.history.current());
    Ok(())
}
