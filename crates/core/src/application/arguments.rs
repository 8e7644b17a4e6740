// Command argument allow-listing

use crate::application::constants::{ALLOWED_COMMANDS, FLAG_PREFIX};
use crate::domain::ArgumentError;

/// Check an argument list before anything is spawned
///
/// Only the first argument (the subcommand) is checked. Sub-arguments are
/// passed through unvalidated.
pub fn validate_command_args<S: AsRef<str>>(args: &[S]) -> Result<(), ArgumentError> {
    let Some(command) = args.first() else {
        return Err(ArgumentError::NoArguments);
    };

    let command = command.as_ref();
    if !is_allowed_command(command) {
        return Err(ArgumentError::DisallowedCommand(command.to_string()));
    }

    Ok(())
}

/// Whether `command` (with at most one leading `-` removed) is allow-listed
pub fn is_allowed_command(command: &str) -> bool {
    let name = command.strip_prefix(FLAG_PREFIX).unwrap_or(command);
    ALLOWED_COMMANDS.contains(&name)
}
