//! AI systems (sensing → transitions → orders)

pub mod decisions;
pub mod orders;
pub mod sensing;
pub mod weapons;

#[cfg(test)]
mod orders_tests;

// Re-export all systems
pub use decisions::*;
pub use orders::*;
pub use sensing::*;
pub use weapons::*;
