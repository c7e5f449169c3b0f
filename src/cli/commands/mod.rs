mod account;
pub mod logging;
mod reports;
mod session;

use crate::app_lib::config::{API_URL_ENV, DEFAULT_API_BASE_URL};
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_STATE_DIR: &str = "state-dir";
pub const ARG_ACCESS_TOKEN: &str = "access-token";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("campusdesk")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("API base URL, example: http://127.0.0.1:8000/api/")
                .env(API_URL_ENV)
                .default_value(DEFAULT_API_BASE_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding the persisted session")
                .env("CAMPUSDESK_STATE_DIR")
                .default_value(".campusdesk")
                .global(true),
        )
        .arg(
            Arg::new(ARG_ACCESS_TOKEN)
                .long("access-token")
                .help("Bearer token for protected files")
                .env("CAMPUSDESK_ACCESS_TOKEN")
                .hide_env_values(true)
                .global(true),
        );

    let command = session::with_subcommands(command);
    let command = reports::with_subcommands(command);
    let command = account::with_subcommands(command);
    logging::with_args(command)
}
