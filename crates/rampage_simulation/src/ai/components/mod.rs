//! AI components

pub mod blackboard;
pub mod fsm;


pub use blackboard::*;
pub use fsm::*;
