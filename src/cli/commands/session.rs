use clap::{Arg, Command};

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("login")
                .about("Sign in and route to the role's dashboard")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("User name")
                        .env("CAMPUSDESK_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .long("password")
                        .help("Password")
                        .env("CAMPUSDESK_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(Command::new("logout").about("Clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the stored session"))
        .subcommand(
            Command::new("back").about("Replay a Back navigation against the stored session"),
        )
}
