pub mod direction_ctx;
pub mod direction_flow;
pub mod pipeline_state;

pub use direction_ctx::DirectionCtx;
pub use direction_flow::{DirectionFlow, DirectionReport};
pub use pipeline_state::{DirectionState, PipelineStage, PipelineState, StateMachine};
