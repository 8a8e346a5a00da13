// extensions/mod.rs
//
// Optional helpers that widgets opt into. Nothing in the runtime depends on them.

pub mod easing;

pub use easing::{ease, Easing};
