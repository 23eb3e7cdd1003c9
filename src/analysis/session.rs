// Session-level stability from a run log
//
// A session is unstable if any run failed or timed out, or if any run
// needed a retry. Instability only blocks the VERIFIED decision class.

use serde::Serialize;

use crate::records::SessionRecord;

const FAILED_STATUSES: [&str; 2] = ["failed", "timed_out"];

/// Session log summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionStability {
    pub total_sessions: usize,
    pub failed_sessions: usize,
    pub retried_sessions: usize,
    pub stable: bool,
}

impl Default for SessionStability {
    /// An empty log: no sessions, nothing failed, stable
    fn default() -> Self {
        Self {
            total_sessions: 0,
            failed_sessions: 0,
            retried_sessions: 0,
            stable: true,
        }
    }
}

/// Count failed and retried sessions
pub fn check_session_stability(records: &[SessionRecord]) -> SessionStability {
    let failed_sessions = records
        .iter()
        .filter(|r| {
            r.status
                .as_deref()
                .is_some_and(|status| FAILED_STATUSES.contains(&status))
        })
        .count();
    let retried_sessions = records.iter().filter(|r| r.attempt > 1).count();

    let stability = SessionStability {
        total_sessions: records.len(),
        failed_sessions,
        retried_sessions,
        stable: failed_sessions == 0 && retried_sessions == 0,
    };

    tracing::debug!(
        total = stability.total_sessions,
        failed = stability.failed_sessions,
        retried = stability.retried_sessions,
        "session stability checked"
    );

    stability
}
