use regaut_macros::config;
use serde::{Deserialize, Serialize};

use crate::logger::LogLevel;

pub trait GeneralConfig {
    fn logger(&self) -> &LoggerConfig;
}

config! {
    pub struct LoggerConfig {
        enabled: bool = false,
        /// Write the log to `./logs/` instead of stderr.
        log_file: bool = false,
        log_level: LogLevel = LogLevel::Warn,
    }
}

config! {
    /// How a regex is turned into deterministic automata.
    pub struct ConversionConfig {
        /// Materialize the empty subset as an explicit trap state during subset
        /// construction.
        complete: bool = false,
        minimize: bool = true,
    }
}

/// The strategy used to pick the next state to rip during state elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliminationOrder {
    /// Pick the state with the smallest estimated label blow-up.
    Heuristic,
    /// Pick the state with the smallest id.
    Ascending,
}

config! {
    pub struct EliminationConfig {
        order: EliminationOrder = EliminationOrder::Heuristic,
        /// Eliminate states of the minimized DFA (lifted back to an NFA) instead
        /// of the Thompson NFA.
        from_minimized: bool = true,
        /// Compare the synthesized regex against the input on all words up to
        /// this length.
        verify_word_length: Option<usize> = Some(6),
    }
}

config! {
    pub struct CorrectionConfig {
        /// Add the transitions of the optimal alignment to the automaton.
        materialize: bool = true,
        from_minimized: bool = false,
    }
}

config! {
    pub struct RegautConfig {
        #[section]
        conversion: ConversionConfig,
        #[section]
        elimination: EliminationConfig,
        #[section]
        correction: CorrectionConfig,
        #[section]
        logger: LoggerConfig,
    }
}

impl GeneralConfig for RegautConfig {
    fn logger(&self) -> &LoggerConfig {
        &self.logger
    }
}
