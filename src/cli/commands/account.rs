use clap::{Arg, ArgAction, Command};

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new("change-password")
                .about("Change a staff member's password")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .help("User name (staff e-mail)")
                        .env("CAMPUSDESK_USERNAME")
                        .required(true),
                )
                .arg(
                    Arg::new("old")
                        .long("old")
                        .help("Current password")
                        .env("CAMPUSDESK_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                )
                .arg(
                    Arg::new("new")
                        .long("new")
                        .help("New password")
                        .required(true),
                )
                .arg(
                    Arg::new("confirm")
                        .long("confirm")
                        .help("New password, again")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("academic-session")
                .about("Resolve and cache the current academic session")
                .arg(
                    Arg::new("reset")
                        .long("reset")
                        .help("Drop the cached academic session first")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("organization")
                        .long("organization")
                        .help("Organization id for this run")
                        .env("CAMPUSDESK_ORGANIZATION_ID")
                        .requires("branch"),
                )
                .arg(
                    Arg::new("branch")
                        .long("branch")
                        .help("Branch id for this run")
                        .env("CAMPUSDESK_BRANCH_ID")
                        .requires("organization"),
                ),
        )
}
