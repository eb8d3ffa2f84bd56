//! Concrete node implementations.

pub mod together;

pub use together::ChatTogetherAiNode;
