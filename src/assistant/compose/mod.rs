//! Response composition.

pub mod composer;

pub use composer::{
    CLARIFICATION_REPLY, ComposedReply, EMPTY_GENERATION_REPLY, NO_MATCH_REPLY, ResponseComposer,
};
