//! ECS компоненты танка (данные, без логики систем)

pub mod control;
pub mod health;
pub mod pose;
pub mod vehicle;


pub use control::*;
pub use health::*;
pub use pose::*;
pub use vehicle::*;
