use crate::{
    automaton::Language,
    validation::{merged_alphabet, words_up_to},
};

/// The shortest word up to `max_word_length` that is accepted by exactly one
/// of the two automata. Words are drawn from the union of both alphabets, so
/// automata over different alphabets can be compared.
pub fn find_difference<A, B>(a: &A, b: &B, max_word_length: usize) -> Option<Vec<A::Letter>>
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    let alphabet = merged_alphabet(a.alphabet(), b.alphabet());

    words_up_to(&alphabet, max_word_length).find(|word| a.accepts(word) != b.accepts(word))
}

/// Checks if two automata accept the same words up to a certain length.
pub fn same_language<A, B>(a: &A, b: &B, max_word_length: usize) -> bool
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    find_difference(a, b, max_word_length).is_none()
}

pub fn assert_same_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    if let Some(word) = find_difference(a, b, max_word_length) {
        if a.accepts(&word) {
            panic!(
                "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                word
            );
        } else {
            panic!(
                "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                word
            );
        }
    }
}

/// Assert that the language accepted by automaton `a` is a subset of the
/// language accepted by automaton `b`.
pub fn assert_subset_language<A, B>(a: &A, b: &B, max_word_length: usize)
where
    A: Language,
    B: Language<Letter = A::Letter>,
{
    let alphabet = merged_alphabet(a.alphabet(), b.alphabet());

    for word in words_up_to(&alphabet, max_word_length) {
        if a.accepts(&word) && !b.accepts(&word) {
            panic!(
                "{:?} is accepted by automaton `a` but not by automaton `b`. Thus the language of `a` is not a subset of `b`.",
                word
            );
        }
    }
}

/// Assert that exactly the given words up to `max_word_length` are accepted.
pub fn assert_language_matches<A: Language>(
    automaton: &A,
    max_word_length: usize,
    expected: impl Fn(&[A::Letter]) -> bool,
) {
    for word in words_up_to(automaton.alphabet(), max_word_length) {
        assert_eq!(
            automaton.accepts(&word),
            expected(word.as_slice()),
            "Unexpected verdict for {:?}",
            word
        );
    }
}
