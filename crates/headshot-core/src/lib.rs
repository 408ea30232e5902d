pub mod config;
pub mod logging;

pub mod fetch;
pub mod hints;
pub mod name;
pub mod players;
pub mod resolver;
pub mod sources;
pub mod validate;
pub mod workflow;

pub use hints::{Hints, Sport};
pub use resolver::{PhotoResolver, Resolution};
