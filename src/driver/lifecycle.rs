use chrono::{DateTime, Utc};
use statig::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverEvent {
    /// The user asked for the analysis to start.
    Trigger,
}

/// Externally visible phase of the polling driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    Idle,
    Running,
}

/// Idle → Running, once. There is no way back to Idle.
#[derive(Debug, Default)]
pub struct DriverLifecycle {
    pub started_at: Option<DateTime<Utc>>,
}

#[state_machine(initial = "State::idle()", state(derive(Debug, PartialEq, Eq)))]
impl DriverLifecycle {
    #[state]
    fn idle(&mut self, event: &DriverEvent) -> Outcome<State> {
        match event {
            DriverEvent::Trigger => {
                self.started_at = Some(Utc::now());
                tracing::info!("Polling driver started");
                Transition(State::running())
            }
        }
    }

    #[state]
    fn running(&mut self, event: &DriverEvent) -> Outcome<State> {
        match event {
            DriverEvent::Trigger => {
                tracing::debug!("Polling driver already running; trigger ignored");
                Handled
            }
        }
    }
}

pub fn phase_of(machine: &StateMachine<DriverLifecycle>) -> DriverPhase {
    if *machine.state() == State::running() {
        DriverPhase::Running
    } else {
        DriverPhase::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_moves_idle_to_running_once() {
        let mut sm = DriverLifecycle::default().state_machine();
        assert_eq!(phase_of(&sm), DriverPhase::Idle);
        assert!(sm.inner().started_at.is_none());

        sm.handle(&DriverEvent::Trigger);
        assert_eq!(phase_of(&sm), DriverPhase::Running);
        let started = sm.inner().started_at;
        assert!(started.is_some());

        sm.handle(&DriverEvent::Trigger);
        assert_eq!(phase_of(&sm), DriverPhase::Running);
        assert_eq!(sm.inner().started_at, started);
    }
}
