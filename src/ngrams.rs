//! Contiguous n-gram windows over token sequences.

use std::collections::HashSet;

use crate::types::Term;

/// True when every token in the window is distinct.
fn is_distinct<S: AsRef<str>>(window: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(window.len());
    window.iter().all(|token| seen.insert(token.as_ref()))
}

/// Windows of `n` pairwise-distinct tokens, left to right, as token slices.
///
/// Sequences shorter than `n` (and `n == 0`) produce no windows.
pub fn windows<S: AsRef<str>>(tokens: &[S], n: usize) -> impl Iterator<Item = &[S]> {
    let size = n.max(1);
    tokens
        .windows(size)
        .filter(move |window| n > 0 && is_distinct(window))
}

/// Raw (unjoined) windows for every sequence.
pub fn extract_raw<S: AsRef<str>>(sequences: &[Vec<S>], n: usize) -> Vec<Vec<Vec<Term>>> {
    sequences
        .iter()
        .map(|tokens| {
            windows(tokens, n)
                .map(|window| window.iter().map(|t| t.as_ref().to_string()).collect())
                .collect()
        })
        .collect()
}

/// Windows for every sequence, rendered with a custom join.
pub fn extract_with<S, F>(sequences: &[Vec<S>], n: usize, join: F) -> Vec<Vec<Term>>
where
    S: AsRef<str>,
    F: Fn(&[S]) -> Term,
{
    sequences
        .iter()
        .map(|tokens| windows(tokens, n).map(&join).collect())
        .collect()
}

/// Windows for every sequence, space-joined.
pub fn extract<S: AsRef<str>>(sequences: &[Vec<S>], n: usize) -> Vec<Vec<Term>> {
    extract_with(sequences, n, join_space)
}

fn join_space<S: AsRef<str>>(window: &[S]) -> Term {
    window
        .iter()
        .map(|token| token.as_ref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// N-grams of a normalized record: each line is windowed on its own, so no
/// window spans a line break.
pub fn record_ngrams(record: &str, n: usize) -> Vec<Term> {
    record
        .split('\n')
        .flat_map(|line| {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            windows(&tokens, n).map(join_space).collect::<Vec<_>>()
        })
        .collect()
}
