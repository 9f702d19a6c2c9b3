//! Combat systems

pub mod destruction;
pub mod fire;
pub mod hits;
pub mod outcome;

pub use destruction::*;
pub use fire::*;
pub use hits::*;
pub use outcome::*;
