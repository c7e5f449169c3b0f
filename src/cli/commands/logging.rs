//! `-v` flag shared by every campusdesk subcommand. Logs go to stderr so the
//! command output on stdout stays clean.

use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const LOG_LEVEL_ENV: &str = "CAMPUSDESK_LOG_LEVEL";

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or its index (`0` = error .. `4` = trace), so
/// `CAMPUSDESK_LOG_LEVEL=debug` and `-vvv` mean the same thing.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        let level = level.trim().to_lowercase();
        if let Ok(parsed) = level.parse::<u8>() {
            if usize::from(parsed) < LEVELS.len() {
                return Ok(parsed);
            }
        }

        LEVELS
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("invalid log level, expected one of: {}", LEVELS.join(", ")))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env(LOG_LEVEL_ENV)
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(level: &str) -> Result<u8, String> {
        let command = with_args(Command::new("campusdesk"));
        temp_env::with_vars([(LOG_LEVEL_ENV, Some(level))], || {
            command
                .try_get_matches_from(["campusdesk"])
                .map(|matches| matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0))
                .map_err(|err| err.kind().to_string())
        })
    }

    #[test]
    fn accepts_names_and_indexes() {
        assert_eq!(parse("DEBUG"), Ok(3));
        assert_eq!(parse(" warn "), Ok(1));
        assert_eq!(parse("4"), Ok(4));
    }

    #[test]
    fn rejects_out_of_range_levels() {
        assert!(parse("5").is_err());
        assert!(parse("verbose").is_err());
    }
}
