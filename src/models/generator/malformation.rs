use itertools::Itertools;
use rand::Rng;
use strum::{Display, EnumCount, EnumIter};

use crate::models::{operator::Operator, query::Query};

/// The syntax faults a generator can inject into a query.
///
/// A fault never touches the first term and never adds an operator,
/// so a malformed query still begins with a term and has fewer operators
/// than the query's term budget. Tokens stay single space separated
/// on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumCount)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Malformation {
    /// `a OR b` becomes `a OR`
    DanglingOperator,
    /// `a OR b AND c` becomes `a OR AND c`
    DoubledOperator,
    /// `a OR b` becomes `a b`
    MissingOperator,
    /// `a OR b` becomes `a OR ( b`
    UnclosedParen,
    /// `a OR b` becomes `a OR b )`
    StrayCloseParen,
}

const ALL: [Malformation; Malformation::COUNT] = [
    Malformation::DanglingOperator,
    Malformation::DoubledOperator,
    Malformation::MissingOperator,
    Malformation::UnclosedParen,
    Malformation::StrayCloseParen,
];

fn is_operator(token: &str) -> bool {
    token.parse::<Operator>().is_ok()
}

/// Removes the word or number of a token, keeping any parentheses
/// glued to it. Drops the token altogether if nothing is left.
fn drop_leaf(tokens: &mut Vec<String>, i: usize) {
    let parens: String = tokens[i].chars().filter(|c| *c == '(' || *c == ')').collect();
    if parens.is_empty() {
        tokens.remove(i);
    } else {
        tokens[i] = parens;
    }
}

impl Malformation {
    /// The fewest terms a query needs for this fault to apply.
    pub fn min_terms(&self) -> usize {
        match self {
            Malformation::DoubledOperator => 3,
            Malformation::DanglingOperator | Malformation::MissingOperator => 2,
            Malformation::UnclosedParen | Malformation::StrayCloseParen => 1,
        }
    }

    /// A fault drawn uniformly among those applicable to `q`.
    pub fn random<R: Rng>(q: &Query, rng: &mut R) -> Self {
        let n_terms = q.n_terms();
        let candidates = ALL.iter().filter(|m| m.min_terms() <= n_terms).collect_vec();
        *candidates[rng.random_range(0..candidates.len())]
    }

    /// Renders the query with this fault. A query with too few
    /// terms for the fault gets a stray closing parenthesis instead.
    pub fn apply(&self, q: &Query) -> String {
        let text = q.to_string();
        let mut tokens = text.split(' ').map(String::from).collect_vec();
        let leaves = tokens
            .iter()
            .positions(|t| !is_operator(t))
            .collect_vec();

        if leaves.len() < self.min_terms() {
            return Malformation::StrayCloseParen.apply(q);
        }

        match self {
            Malformation::DanglingOperator => drop_leaf(&mut tokens, leaves[leaves.len() - 1]),
            Malformation::DoubledOperator => drop_leaf(&mut tokens, leaves[leaves.len() - 2]),
            Malformation::MissingOperator => {
                tokens.remove(leaves[leaves.len() - 1] - 1);
            }
            Malformation::UnclosedParen => match leaves.len() {
                1 => tokens.push("(".into()),
                n => tokens.insert(leaves[n - 1], "(".into()),
            },
            Malformation::StrayCloseParen => tokens.push(")".into()),
        }
        tokens.join(" ")
    }
}
