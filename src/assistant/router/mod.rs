//! Message classifier choosing between the general and sleep branches.

pub mod classifier;
pub mod prompt;

pub use classifier::MessageRouter;
pub use prompt::ROUTER_PREAMBLE;
