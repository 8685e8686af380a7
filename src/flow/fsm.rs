use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    Idle,
    AwaitingResponse,
    Rendered,
    Errored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEvent {
    Submit,
    ResponseRendered,
    Failed,
}

impl fmt::Display for RequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Lifecycle of the single request a flow may have outstanding.
#[derive(Debug)]
pub struct RequestStateMachine {
    state: RequestState,
    last_error: Option<String>,
}

impl Default for RequestStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestStateMachine {
    pub fn new() -> Self {
        Self {
            state: RequestState::Idle,
            last_error: None,
        }
    }

    pub fn current_state(&self) -> RequestState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_awaiting(&self) -> bool {
        self.state == RequestState::AwaitingResponse
    }

    pub fn transition(&mut self, event: RequestEvent) -> Result<RequestState> {
        let old_state = self.state;
        debug!("Request FSM processing {:?} in state {:?}", event, old_state);

        let new_state = match (old_state, event) {
            (
                RequestState::Idle | RequestState::Rendered | RequestState::Errored,
                RequestEvent::Submit,
            ) => RequestState::AwaitingResponse,
            (RequestState::AwaitingResponse, RequestEvent::ResponseRendered) => {
                RequestState::Rendered
            }
            (RequestState::AwaitingResponse, RequestEvent::Failed) => RequestState::Errored,
            _ => {
                warn!(
                    "Invalid request transition from {:?} with event {:?}",
                    old_state, event
                );
                return Err(Error::InvalidTransition {
                    current: old_state.to_string(),
                    requested: format!("{:?}", event),
                });
            }
        };

        if event == RequestEvent::Submit {
            self.last_error = None;
        }
        self.state = new_state;
        Ok(new_state)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<RequestState> {
        let state = self.transition(RequestEvent::Failed)?;
        self.last_error = Some(message.into());
        Ok(state)
    }
}

/// Shared gate in front of one flow's upstream call.
///
/// `begin` refuses a second submission while one is outstanding; there is no
/// queue and no cancellation.
#[derive(Debug)]
pub struct FlowTracker {
    name: &'static str,
    machine: Mutex<RequestStateMachine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowStatus {
    pub flow: &'static str,
    pub state: RequestState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl FlowTracker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            machine: Mutex::new(RequestStateMachine::new()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn status(&self) -> Result<FlowStatus> {
        let machine = self.lock()?;
        Ok(FlowStatus {
            flow: self.name,
            state: machine.current_state(),
            last_error: machine.last_error().map(str::to_string),
        })
    }

    /// Claims the flow for one request. The returned guard must be finished
    /// with the outcome; dropping it early marks the request abandoned.
    pub fn begin(&self) -> Result<FlowGuard<'_>> {
        let mut machine = self.lock()?;
        if machine.is_awaiting() {
            warn!("Rejected {} submission: request already in flight", self.name);
            return Err(Error::busy(self.name));
        }
        machine.transition(RequestEvent::Submit)?;
        Ok(FlowGuard {
            tracker: self,
            settled: false,
        })
    }

    fn settle<T>(&self, outcome: &Result<T>) -> Result<()> {
        let mut machine = self.lock()?;
        match outcome {
            Ok(_) => {
                machine.transition(RequestEvent::ResponseRendered)?;
                info!("{} request completed", self.name);
            }
            Err(e) => {
                machine.fail(e.to_string())?;
                info!("{} request failed: {}", self.name, e);
            }
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, RequestStateMachine>> {
        self.machine
            .lock()
            .map_err(|e| Error::internal(format!("Mutex lock failed: {e}")))
    }
}

pub const REQUEST_ABANDONED: &str = "Request abandoned before completion";

/// One outstanding request on a [`FlowTracker`].
#[must_use = "dropping the guard marks the request abandoned"]
#[derive(Debug)]
pub struct FlowGuard<'a> {
    tracker: &'a FlowTracker,
    settled: bool,
}

impl FlowGuard<'_> {
    /// Records the outcome. Bookkeeping failures are logged, never returned,
    /// so the caller always sees the upstream result.
    pub fn finish<T>(mut self, outcome: &Result<T>) {
        self.settled = true;
        if let Err(e) = self.tracker.settle(outcome) {
            error!("Failed to record {} outcome: {}", self.tracker.name, e);
        }
    }
}

impl Drop for FlowGuard<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("{} request dropped before completion", self.tracker.name);
        let result = self
            .tracker
            .lock()
            .and_then(|mut machine| machine.fail(REQUEST_ABANDONED).map(|_| ()));
        if let Err(e) = result {
            error!("Failed to release {} flow: {}", self.tracker.name, e);
        }
    }
}
