use crate::location::LocationName;

use super::types::SessionPhase;

/// Inputs the session engine accepts from buttons, the companion link, the
/// location resolver and countdown tasks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionInput {
    Boot,
    PairingConfirmed,
    ReturnToAwake,
    BreakRequested,
    ResumeRequested,
    CountdownExpired { phase: SessionPhase, generation: u32 },
    LocationResolved(LocationName),
    LinkChanged { connected: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SessionEvent {
    Boot,
    PairingConfirmed,
    ReturnToAwake,
    BreakRequested,
    ResumeRequested,
    CountdownExpired,
    WalkingDetected,
    BreakGestureDetected,
}
