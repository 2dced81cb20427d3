pub mod automaton;
pub mod config;
pub mod correction;
pub mod elimination;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod regex;
pub mod validation;
