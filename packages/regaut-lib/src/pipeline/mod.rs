//! The end-to-end flow from a regex string to automata, back to a regex and
//! on to approximate matching, driven by a [RegautConfig].

use serde::{Deserialize, Serialize};

use crate::{
    automaton::{
        Language,
        dfa::{DFA, minimization::Minimizable},
        nfa::NFA,
        render::Snapshot,
    },
    config::RegautConfig,
    correction::{AlignmentStep, align},
    elimination::synthesize,
    error::ParseError,
    regex::{
        Postfix,
        compiler::{construct_nfa, construct_string},
        parser::parse_regex,
    },
    validation::same_language::same_language,
};

/// Every automaton built for a single regex.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub postfix: Postfix<char>,
    pub nfa: NFA<char>,
    pub dfa: DFA<char>,
    /// Only present if minimization is enabled.
    pub minimized: Option<DFA<char>>,
}

impl Compiled {
    /// The smallest deterministic automaton that was built.
    pub fn final_dfa(&self) -> &DFA<char> {
        self.minimized.as_ref().unwrap_or(&self.dfa)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub regex: String,
    pub postfix: String,
    /// The regex rendered back from its postfix form.
    pub reconstructed: String,
    pub nfa_states: usize,
    pub nfa_transitions: usize,
    pub dfa_states: usize,
    pub dfa_complete: bool,
    pub minimized_states: Option<usize>,
    /// The regex obtained by state elimination, `None` for the empty
    /// language.
    pub synthesized: Option<String>,
    /// Whether the synthesized regex agrees with the input on all words up to
    /// the configured length. `None` if verification is disabled.
    pub equivalent: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptReport {
    pub word: String,
    pub nfa: bool,
    pub dfa: bool,
    pub minimized: Option<bool>,
}

impl AcceptReport {
    /// Whether all automata agree on the word.
    pub fn consistent(&self) -> bool {
        self.nfa == self.dfa && self.minimized.is_none_or(|m| m == self.nfa)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionReport {
    pub word: String,
    /// `None` if the regex does not match anything.
    pub distance: Option<usize>,
    pub entry_cost: usize,
    pub steps: Vec<AlignmentStep<char>>,
    /// The repaired automaton, only if materialization is enabled.
    pub corrected: Option<Snapshot>,
    pub corrected_accepts: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RegautConfig,
}

impl Pipeline {
    pub fn new(config: RegautConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &RegautConfig {
        &self.config
    }

    pub fn compile(&self, regex: &str) -> Result<Compiled, ParseError> {
        let conversion = self.config.get_conversion();

        let postfix = parse_regex(regex)?;
        let nfa = construct_nfa(&postfix)?;
        let dfa = nfa.to_dfa(*conversion.get_complete());
        let minimized = conversion.get_minimize().then(|| dfa.minimize());

        tracing::info!(
            regex,
            postfix = %postfix,
            nfa_states = nfa.state_count(),
            dfa_states = dfa.state_count(),
            minimized_states = minimized.as_ref().map(DFA::state_count),
            "Compiled regex"
        );

        Ok(Compiled {
            postfix,
            nfa,
            dfa,
            minimized,
        })
    }

    /// Synthesizes a regex for the compiled language, starting from either
    /// the Thompson NFA or the smallest DFA.
    pub fn synthesize(&self, compiled: &Compiled) -> Option<Postfix<char>> {
        let elimination = self.config.get_elimination();

        let source = if *elimination.get_from_minimized() {
            compiled.final_dfa().to_nfa()
        } else {
            compiled.nfa.clone()
        };

        synthesize(&source, *elimination.get_order())
    }

    pub fn report(&self, regex: &str) -> Result<PipelineReport, ParseError> {
        let compiled = self.compile(regex)?;
        let synthesized = self.synthesize(&compiled);

        let synthesized_nfa = match &synthesized {
            Some(postfix) => construct_nfa(postfix)?,
            None => NFA::new(vec![]),
        };
        let equivalent = self
            .config
            .get_elimination()
            .get_verify_word_length()
            .map(|length| same_language(&compiled.nfa, &synthesized_nfa, length));

        let synthesized = synthesized
            .map(|postfix| construct_string(&postfix))
            .transpose()?;

        tracing::info!(
            synthesized = synthesized.as_deref().unwrap_or("∅"),
            equivalent,
            "Eliminated states"
        );

        Ok(PipelineReport {
            regex: regex.to_string(),
            postfix: compiled.postfix.to_string(),
            reconstructed: construct_string(&compiled.postfix)?,
            nfa_states: compiled.nfa.state_count(),
            nfa_transitions: compiled.nfa.transition_count(),
            dfa_states: compiled.dfa.state_count(),
            dfa_complete: compiled.dfa.is_complete(),
            minimized_states: compiled.minimized.as_ref().map(DFA::state_count),
            synthesized,
            equivalent,
        })
    }

    pub fn accepts(&self, regex: &str, word: &str) -> Result<AcceptReport, ParseError> {
        let compiled = self.compile(regex)?;
        Ok(Self::accepts_compiled(&compiled, word))
    }

    pub fn accepts_compiled(compiled: &Compiled, word: &str) -> AcceptReport {
        let input: Vec<char> = word.chars().collect();

        AcceptReport {
            word: word.to_string(),
            nfa: compiled.nfa.accepts(&input),
            dfa: compiled.dfa.accepts(&input),
            minimized: compiled.minimized.as_ref().map(|m| m.accepts(&input)),
        }
    }

    pub fn correct(&self, regex: &str, word: &str) -> Result<CorrectionReport, ParseError> {
        let correction = self.config.get_correction();
        let compiled = self.compile(regex)?;

        let mut nfa = if *correction.get_from_minimized() {
            compiled.final_dfa().to_nfa()
        } else {
            compiled.nfa
        };
        let input: Vec<char> = word.chars().collect();

        let Some(alignment) = align(&nfa, &input) else {
            tracing::warn!(regex, "The regex matches nothing, no correction possible");
            return Ok(CorrectionReport {
                word: word.to_string(),
                distance: None,
                entry_cost: 0,
                steps: Vec::new(),
                corrected: None,
                corrected_accepts: None,
            });
        };
        tracing::info!(word, distance = alignment.distance, "Aligned word");

        let (corrected, corrected_accepts) = if *correction.get_materialize() {
            alignment.apply(&mut nfa);
            (
                Some(Snapshot::capture_display(&nfa)),
                Some(nfa.accepts(&input)),
            )
        } else {
            (None, None)
        };

        Ok(CorrectionReport {
            word: word.to_string(),
            distance: Some(alignment.distance),
            entry_cost: alignment.entry_cost,
            steps: alignment.steps,
            corrected,
            corrected_accepts,
        })
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(RegautConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConversionConfig;

    #[test]
    fn test_compile_without_minimization() {
        let config = RegautConfig::default()
            .with_conversion(ConversionConfig::default().with_minimize(false));
        let compiled = Pipeline::new(config).compile("ab|c").unwrap();

        assert!(compiled.minimized.is_none());
        assert_eq!(compiled.final_dfa().state_count(), compiled.dfa.state_count());
    }

    #[test]
    fn test_report() {
        let report = Pipeline::default().report("a(aa)*b*").unwrap();

        assert_eq!(report.postfix, "a a a · * b * · ·");
        assert_eq!(report.reconstructed, "a(aa)*b*");
        assert_eq!(report.minimized_states, Some(3));
        assert_eq!(report.equivalent, Some(true));
        assert!(report.synthesized.is_some());
    }

    #[test]
    fn test_accepts() {
        let report = Pipeline::default().accepts("(a|b)*c", "abac").unwrap();

        assert!(report.nfa);
        assert!(report.consistent());
    }

    #[test]
    fn test_parse_errors_propagate() {
        assert!(Pipeline::default().report("(a").is_err());
        assert!(Pipeline::default().correct("a\\", "a").is_err());
    }
}
