use crate::{
    cli::globals::{Console, GlobalArgs},
    features::password::{change_password, ChangePasswordForm, PASSWORD_CHANGED},
};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub old: SecretString,
    pub new: SecretString,
    pub confirm: SecretString,
}

/// # Errors
/// Returns an error if the form is invalid or the server refuses the change.
pub async fn execute(args: Args) -> Result<()> {
    let console = Console::open(&args.globals)?;
    let token = console.session.access_token()?;

    let form = ChangePasswordForm {
        username: args.username,
        old_password: args.old,
        new_password: args.new,
        confirm_password: args.confirm,
    };
    change_password(&console.client, &form, token.as_ref()).await?;

    println!("{PASSWORD_CHANGED}");
    Ok(())
}
