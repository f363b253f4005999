//! Concrete inference engine implementations

pub mod lamini;

pub use lamini::{LaminiConfig, LaminiEngine, LaminiFactory};
