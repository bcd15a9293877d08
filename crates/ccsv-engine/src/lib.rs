#![doc = include_str!("../README.md")]

pub mod config;
pub mod engine;
pub mod property;
pub mod protocol;
pub mod satisfiability;

pub use config::EngineConfig;
pub use engine::{Engine, EngineError, ProgramSource, ProgramText};
pub use property::{Property, PropertyError, PropertyId, Question};
pub use satisfiability::Satisfiability;
