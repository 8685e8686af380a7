pub mod fsm;

pub use fsm::{
    FlowGuard, FlowStatus, FlowTracker, REQUEST_ABANDONED, RequestEvent, RequestState,
    RequestStateMachine,
};
