//! Controller layer: pointer input to gesture events, and the queue that feeds
//! them to the transition controller.

pub mod events;
pub mod orchestration;
