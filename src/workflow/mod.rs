pub mod navigation;
pub mod order_ctx;
pub mod order_flow;

pub use navigation::{dismiss_modal_if_visible, navigate_to_order_form};
pub use order_ctx::OrderCtx;
pub use order_flow::{FailureReason, OrderFlow, ProcessResult, SubmissionState, MAX_SUBMIT_ATTEMPTS};
