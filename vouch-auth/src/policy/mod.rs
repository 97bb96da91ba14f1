//! Named authorization policies over claim sets.

mod engine;

pub use engine::{PolicyDecision, PolicyEngine, PolicyRule};
