use statig::prelude::*;

use super::actions::SessionApplyStatus;
use super::events::SessionEvent;
use super::types::{BreakReason, SessionPhase};

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct SessionMachine {
    pub(super) phase: SessionPhase,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: SessionApplyStatus,
    pub(super) transition: Option<(SessionPhase, SessionPhase)>,
    pub(super) break_reason: Option<BreakReason>,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: SessionApplyStatus::Unchanged,
            transition: None,
            break_reason: None,
        }
    }
}

impl SessionMachine {
    fn move_to(&mut self, context: &mut DispatchContext, target: SessionPhase) {
        context.transition = Some((self.phase, target));
        context.status = SessionApplyStatus::Applied;
        self.phase = target;
    }

    fn start_break(&mut self, context: &mut DispatchContext, reason: BreakReason) -> Outcome<State> {
        context.break_reason = Some(reason);
        self.move_to(context, SessionPhase::Break);
        Transition(State::on_break())
    }
}

#[state_machine(initial = "State::initializing()")]
impl SessionMachine {
    #[state]
    fn initializing(
        &mut self,
        context: &mut DispatchContext,
        event: &SessionEvent,
    ) -> Outcome<State> {
        match event {
            SessionEvent::Boot => {
                self.move_to(context, SessionPhase::Awake);
                Transition(State::awake())
            }
            _ => {
                context.status = SessionApplyStatus::InvalidTransition;
                Handled
            }
        }
    }

    #[state(superstate = "active")]
    fn awake(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::PairingConfirmed => {
                self.move_to(context, SessionPhase::Working);
                Transition(State::working())
            }
            _ => Super,
        }
    }

    #[state(superstate = "active")]
    fn working(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::CountdownExpired => {
                self.start_break(context, BreakReason::CountdownExpired)
            }
            SessionEvent::WalkingDetected => self.start_break(context, BreakReason::Walking),
            SessionEvent::BreakGestureDetected => self.start_break(context, BreakReason::Gesture),
            SessionEvent::BreakRequested => self.start_break(context, BreakReason::User),
            _ => Super,
        }
    }

    #[state(superstate = "active")]
    fn on_break(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::CountdownExpired | SessionEvent::ResumeRequested => {
                self.move_to(context, SessionPhase::Working);
                Transition(State::working())
            }
            _ => Super,
        }
    }

    #[superstate]
    fn active(&mut self, context: &mut DispatchContext, event: &SessionEvent) -> Outcome<State> {
        match event {
            SessionEvent::ReturnToAwake => {
                if self.phase == SessionPhase::Awake {
                    context.status = SessionApplyStatus::Unchanged;
                    return Handled;
                }
                self.move_to(context, SessionPhase::Awake);
                Transition(State::awake())
            }
            SessionEvent::CountdownExpired
            | SessionEvent::WalkingDetected
            | SessionEvent::BreakGestureDetected => {
                context.status = SessionApplyStatus::Unchanged;
                Handled
            }
            SessionEvent::Boot
            | SessionEvent::PairingConfirmed
            | SessionEvent::BreakRequested
            | SessionEvent::ResumeRequested => {
                context.status = SessionApplyStatus::InvalidTransition;
                Handled
            }
        }
    }
}
