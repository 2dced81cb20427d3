//! Approximate matching of a word against an automaton, following Wagner's
//! order-n correction for regular languages (CACM 17(5), 1974).
//!
//! The distance of a word to an automaton is the smallest number of edits
//! (substituting, inserting or deleting a symbol) needed to turn the word
//! into one the automaton accepts. The optimal alignment can be written back
//! into the automaton, which then accepts the word.

use hashbrown::HashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::automaton::{
    Letter, State,
    nfa::{NFA, NFAEdge},
};

const UNREACHABLE: usize = usize::MAX;

fn finite(cost: usize) -> Option<usize> {
    (cost != UNREACHABLE).then_some(cost)
}

/// All-pairs path costs of an automaton. A path costs the number of symbol
/// transitions on it, ε-transitions are free.
#[derive(Debug, Clone)]
pub struct PathCostTable<L: Letter> {
    states: Vec<State>,
    index: HashMap<State, usize>,
    /// `distance[p][q]`, the cheapest path from `p` to `q`. Every state
    /// reaches itself for free.
    distance: Vec<Vec<usize>>,
    /// Per symbol `a`, the cheapest path from `p` to `q` that takes at least
    /// one `a`-transition.
    via_symbol: HashMap<L, Vec<Vec<usize>>>,
}

impl<L: Letter> PathCostTable<L> {
    pub fn new(nfa: &NFA<L>) -> Self {
        let states = nfa.states();
        let index: HashMap<State, usize> = states
            .iter()
            .enumerate()
            .map(|(i, state)| (*state, i))
            .collect();
        let n = states.len();

        let mut distance = vec![vec![UNREACHABLE; n]; n];
        for (i, row) in distance.iter_mut().enumerate() {
            row[i] = 0;
        }
        for (from, label, to) in nfa.transitions() {
            let cost = if label.is_epsilon() { 0 } else { 1 };
            let cell = &mut distance[index[&from]][index[&to]];
            *cell = (*cell).min(cost);
        }

        // Floyd-Warshall
        for k in 0..n {
            for i in 0..n {
                if distance[i][k] == UNREACHABLE {
                    continue;
                }
                for j in 0..n {
                    let through = distance[i][k].saturating_add(distance[k][j]);
                    if through < distance[i][j] {
                        distance[i][j] = through;
                    }
                }
            }
        }

        let mut via_symbol = HashMap::new();
        for (from, label, to) in nfa.transitions() {
            let NFAEdge::Symbol(symbol) = label else {
                continue;
            };

            let (u, v) = (index[&from], index[&to]);
            let table = via_symbol
                .entry(symbol.clone())
                .or_insert_with(|| vec![vec![UNREACHABLE; n]; n]);
            for p in 0..n {
                let to_edge = distance[p][u];
                if to_edge == UNREACHABLE {
                    continue;
                }
                for q in 0..n {
                    let cost = to_edge
                        .saturating_add(1)
                        .saturating_add(distance[v][q]);
                    if cost < table[p][q] {
                        table[p][q] = cost;
                    }
                }
            }
        }

        PathCostTable {
            states,
            index,
            distance,
            via_symbol,
        }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// The number of symbols on the cheapest path from `from` to `to`, `None`
    /// if there is none.
    pub fn cost(&self, from: State, to: State) -> Option<usize> {
        finite(self.distance[*self.index.get(&from)?][*self.index.get(&to)?])
    }

    /// The cost of reading `symbol` while moving from `from` to `to`.
    ///
    /// A path with an `symbol`-transition matches the input for free and
    /// pays one insertion per further symbol on it. Any other path pays one
    /// substitution for its first symbol and one insertion for each further
    /// one, a path without symbols deletes the input symbol.
    pub fn step_cost(&self, from: State, to: State, symbol: &L) -> Option<usize> {
        let (p, q) = (*self.index.get(&from)?, *self.index.get(&to)?);
        self.step_cost_at(p, q, symbol)
    }

    fn step_cost_at(&self, p: usize, q: usize, symbol: &L) -> Option<usize> {
        let plain = finite(self.distance[p][q])?.max(1);
        let matching = self
            .via_symbol
            .get(symbol)
            .and_then(|table| finite(table[p][q]))
            .map(|cost| cost - 1);

        Some(matching.map_or(plain, |m| m.min(plain)))
    }
}

/// One input symbol of an optimal alignment: reading `symbol` moves the
/// automaton from `from` to `to` at the given cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentStep<L> {
    pub from: State,
    pub to: State,
    pub symbol: L,
    pub cost: usize,
}

/// An optimal alignment of a word against an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment<L> {
    pub distance: usize,
    /// The state the alignment starts in, before reading the first symbol.
    pub entry: State,
    /// The cost of getting from the start state to `entry`, i.e. the number
    /// of inserted symbols in front of the word.
    pub entry_cost: usize,
    pub steps: Vec<AlignmentStep<L>>,
}

impl<L: Letter> Alignment<L> {
    /// Adds transitions along the alignment, so that the automaton accepts
    /// the aligned word. Steps that are already free are left alone, so an
    /// accepted word does not change the automaton.
    pub fn apply(&self, nfa: &mut NFA<L>) {
        if self.entry_cost > 0 {
            nfa.add_transition(nfa.start(), NFAEdge::Epsilon, self.entry);
        }

        for step in self.steps.iter().filter(|step| step.cost > 0) {
            nfa.add_transition(step.from, NFAEdge::Symbol(step.symbol.clone()), step.to);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    cost: usize,
    predecessor: Option<usize>,
}

/// The dynamic programming table: `column i` holds, for every state, the
/// cheapest cost of reading the first `i` input symbols and ending there.
#[derive(Debug, Clone)]
pub struct CorrectionTable<'a, L: Letter> {
    costs: PathCostTable<L>,
    input: &'a [L],
    columns: Vec<Vec<Cell>>,
    start: usize,
    final_state: usize,
}

impl<'a, L: Letter> CorrectionTable<'a, L> {
    pub fn new(nfa: &NFA<L>, input: &'a [L]) -> Self {
        let costs = PathCostTable::new(nfa);
        let start = costs.index[&nfa.start()];
        let final_state = costs.index[&nfa.final_state()];
        let n = costs.states.len();

        let first = (0..n)
            .map(|q| Cell {
                cost: costs.distance[start][q],
                predecessor: None,
            })
            .collect_vec();
        let mut columns = vec![first];

        for symbol in input {
            let previous = columns.last().map(Vec::as_slice).unwrap_or_default();
            let column = (0..n)
                .map(|q| {
                    let mut best = Cell {
                        cost: UNREACHABLE,
                        predecessor: None,
                    };
                    for (p, cell) in previous.iter().enumerate() {
                        if cell.cost == UNREACHABLE {
                            continue;
                        }
                        let Some(step) = costs.step_cost_at(p, q, symbol) else {
                            continue;
                        };

                        let cost = cell.cost.saturating_add(step);
                        if cost < best.cost {
                            best = Cell {
                                cost,
                                predecessor: Some(p),
                            };
                        }
                    }
                    best
                })
                .collect_vec();
            columns.push(column);
        }

        let table = CorrectionTable {
            costs,
            input,
            columns,
            start,
            final_state,
        };
        tracing::debug!("Correction table:\n{}", table.to_table_string());

        table
    }

    /// The edit distance of the input to the language, `None` if the
    /// automaton accepts nothing.
    pub fn distance(&self) -> Option<usize> {
        self.columns
            .last()
            .and_then(|column| finite(column[self.final_state].cost))
    }

    /// Backtracks the optimal alignment from the final state.
    pub fn alignment(&self) -> Option<Alignment<L>> {
        let distance = self.distance()?;

        let mut steps = Vec::with_capacity(self.input.len());
        let mut current = self.final_state;
        for (i, symbol) in self.input.iter().enumerate().rev() {
            let previous = self.columns[i + 1][current].predecessor?;
            let cost = self.costs.step_cost_at(previous, current, symbol)?;

            steps.push(AlignmentStep {
                from: self.costs.states[previous],
                to: self.costs.states[current],
                symbol: symbol.clone(),
                cost,
            });
            current = previous;
        }
        steps.reverse();

        Some(Alignment {
            distance,
            entry: self.costs.states[current],
            entry_cost: self.costs.distance[self.start][current],
            steps,
        })
    }

    /// Renders the table with one row per state, `-` marking unreachable
    /// cells. The start state is marked with `>`, the final state with `*`.
    pub fn to_table_string(&self) -> String {
        let mut lines = Vec::with_capacity(self.costs.states.len() + 1);
        lines.push(format!(
            "{:>6} {}",
            "",
            std::iter::once("ε".to_string())
                .chain(self.input.iter().map(|s| format!("{:?}", s)))
                .map(|s| format!("{:>8}", s))
                .join("")
        ));

        for (q, state) in self.costs.states.iter().enumerate() {
            let marker = match (q == self.start, q == self.final_state) {
                (true, true) => ">*",
                (true, false) => "> ",
                (false, true) => " *",
                (false, false) => "  ",
            };
            let cells = self
                .columns
                .iter()
                .map(|column| match (finite(column[q].cost), column[q].predecessor) {
                    (None, _) => format!("{:>8}", "-"),
                    (Some(cost), None) => format!("{:>8}", cost),
                    (Some(cost), Some(p)) => {
                        format!("{:>8}", format!("{},{}", cost, self.costs.states[p]))
                    }
                })
                .join("");
            lines.push(format!("{}{:>4} {}", marker, state, cells));
        }

        lines.join("\n")
    }
}

/// The result of [correct].
#[derive(Debug, Clone)]
pub struct Correction<L: Letter> {
    /// The automaton extended by the alignment. It accepts the input.
    pub nfa: NFA<L>,
    pub alignment: Alignment<L>,
}

impl<L: Letter> Correction<L> {
    pub fn distance(&self) -> usize {
        self.alignment.distance
    }
}

/// Computes the edit distance of `input` to the language of `nfa` together
/// with an optimal alignment, `None` if the language is empty.
pub fn align<L: Letter>(nfa: &NFA<L>, input: &[L]) -> Option<Alignment<L>> {
    CorrectionTable::new(nfa, input).alignment()
}

/// Like [align], and additionally returns a copy of `nfa` that is repaired
/// to accept `input` along the optimal alignment.
pub fn correct<L: Letter>(nfa: &NFA<L>, input: &[L]) -> Option<Correction<L>> {
    let alignment = align(nfa, input)?;
    let mut corrected = nfa.clone();
    alignment.apply(&mut corrected);

    tracing::debug!(
        distance = alignment.distance,
        added = corrected.transition_count() - nfa.transition_count(),
        "Corrected automaton"
    );

    Some(Correction {
        nfa: corrected,
        alignment,
    })
}
