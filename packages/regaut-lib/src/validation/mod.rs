//! Bounded language comparison by enumerating words. Used by the tests and
//! by the pipeline to check synthesized regexes.

use itertools::{Itertools, repeat_n};

use crate::automaton::Letter;

pub mod same_language;

/// All words over `alphabet` of length at most `max_word_length`, shortest
/// first and in lexicographic order within one length.
pub fn words_up_to<L: Letter>(
    alphabet: &[L],
    max_word_length: usize,
) -> impl Iterator<Item = Vec<L>> + '_ {
    (0..=max_word_length).flat_map(move |length| {
        repeat_n(alphabet.iter(), length)
            .multi_cartesian_product()
            .map(|word| word.into_iter().cloned().collect_vec())
    })
}

/// The union of two sorted alphabets.
pub fn merged_alphabet<L: Letter>(a: &[L], b: &[L]) -> Vec<L> {
    a.iter().merge(b.iter()).dedup().cloned().collect_vec()
}
