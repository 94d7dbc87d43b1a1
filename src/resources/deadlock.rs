/*!
 * Deadlock Heuristic
 * CPU contention check run after every denied request
 */

use super::ledger::Ledger;
use crate::core::errors::ProcessResult;
use crate::process::record::ProcessRecord;
use crate::process::types::TerminationCause;
use tracing::error;

/// Declared when the CPU is held and at least two waiters lack it
///
/// Not a cycle detector; it only flags CPU contention.
pub(super) fn detect(ledger: &Ledger) -> bool {
    !ledger.cpu_available() && ledger.cpu_waiters() >= 2
}

/// Terminate the requester that triggered detection and drop its wait entry
pub(super) fn resolve(ledger: &mut Ledger, victim: &mut ProcessRecord) -> ProcessResult<()> {
    let pid = victim.pid();
    ledger.waiting.remove(&pid);
    victim.terminate(TerminationCause::Deadlock)?;
    error!(
        pid,
        holder = ?ledger.cpu_holder,
        "Deadlock detected; terminating requester"
    );
    Ok(())
}
