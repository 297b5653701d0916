//! Progress monitor command
//!
//! Listens on a progress address and hands every decoded message to a
//! callback. Malformed datagrams are logged and skipped.

use crate::error::{MastermindError, Result};
use crate::progress::{ProgressAddress, ProgressListener, ProgressMessage};
use tracing::{info, warn};

/// Receive progress messages until `limit` have arrived, or forever
///
/// # Errors
/// Returns `Configuration` for a malformed address and `Io` if the socket
/// fails.
pub fn run_monitor(
    address: &str,
    limit: Option<usize>,
    mut on_message: impl FnMut(&ProgressMessage),
) -> Result<usize> {
    let address = ProgressAddress::parse(address)?;
    let listener = ProgressListener::bind(&address)?;
    info!("listening for progress on {address:?}");

    let mut received = 0;
    while limit.is_none_or(|n| received < n) {
        match listener.recv() {
            Ok(msg) => {
                received += 1;
                on_message(&msg);
            }
            Err(MastermindError::Validation(e)) => warn!("dropping malformed progress message: {e}"),
            Err(e) => return Err(e),
        }
    }
    Ok(received)
}
