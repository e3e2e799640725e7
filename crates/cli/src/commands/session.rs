//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! stockroom session login --token <TOKEN>
//! stockroom session logout
//! ```
//!
//! # Environment Variables
//!
//! - `STOCKROOM_SESSION_FILE` - Where the token is stored (default: .stockroom-session)

use stockroom_client::Session;
use stockroom_client::config::session_file_from_env;

use super::CliError;
use crate::output;

/// Store `token` so later commands are signed in.
///
/// # Errors
///
/// Returns error if the token is blank or the session file cannot be written.
pub fn login(token: &str) -> Result<(), CliError> {
    let path = session_file_from_env();
    Session::new(token)?.persist(&path)?;
    output::print("Signed in");
    Ok(())
}

/// Remove the stored session.
///
/// # Errors
///
/// Returns error if the session file exists but cannot be removed.
pub fn logout() -> Result<(), CliError> {
    let path = session_file_from_env();
    if Session::invalidate(&path)? {
        output::print("Signed out");
    } else {
        output::print("No active session");
    }
    Ok(())
}
