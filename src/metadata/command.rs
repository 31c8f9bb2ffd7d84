use std::ffi::OsStr;
use std::process::{Command, Stdio};

use super::error::MetadataError;

/// Run `program` with `args` and return its standard output as text.
///
/// Output that is not valid UTF-8 is converted lossily; standard error is
/// discarded so tool chatter doesn't end up in the mount's log stream.
///
/// # Errors
/// * `MetadataError::Spawn` if the program cannot be started.
/// * `MetadataError::ExitStatus` if it exits unsuccessfully.
pub fn run_for_output<I, S>(program: &str, args: I) -> Result<String, MetadataError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .map_err(|source| MetadataError::Spawn {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(MetadataError::ExitStatus {
            program: program.to_string(),
            status: output.status,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
