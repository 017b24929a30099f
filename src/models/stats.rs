use std::fmt;

use hstats::Hstats;
use strum::{EnumCount, IntoEnumIterator};

use crate::models::{generator::Generated, operator::Operator};

/// Added to the longest query length when reporting
/// the buffer size a consumer needs (newline and terminator).
pub const LENGTH_MARGIN: usize = 2;

///
/// Some statistics about a batch of generated queries.
/// [`Display`] is implemented for quick convenient output.
#[derive(Debug, Clone)]
pub struct BatchStats {
    n_queries: usize,
    max_len: usize,
    malformed: usize,
    n_terms: usize,
    n_numbers: usize,
    n_groups: usize,
    operator_counts: [usize; Operator::COUNT],
    terms_per_query: Hstats<f64>,
    query_lengths: Hstats<f64>,
}

impl Default for BatchStats {
    fn default() -> Self {
        Self {
            n_queries: Default::default(),
            max_len: Default::default(),
            malformed: Default::default(),
            n_terms: Default::default(),
            n_numbers: Default::default(),
            n_groups: Default::default(),
            operator_counts: Default::default(),
            terms_per_query: Hstats::new(0.0, 50.0, 25),
            query_lengths: Hstats::new(0.0, 500.0, 25),
        }
    }
}

impl fmt::Display for BatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "🔎 N queries={}", self.n_queries)?;
        writeln!(f, "📏 Longest query={} chars", self.max_len)?;
        writeln!(f, "💥 Malformed={}", self.malformed)?;
        writeln!(
            f,
            "🔢 Terms={} (numbers={}, groups={})",
            self.n_terms, self.n_numbers, self.n_groups
        )?;
        for op in Operator::iter() {
            writeln!(
                f,
                "⚙️ {}={} ({:.3})",
                op,
                self.operator_count(op),
                self.operator_frequency(op)
            )?;
        }
        write!(
            f,
            "❓ Terms per query:
{}
📏 Query lengths:
{}",
            self.terms_per_query, self.query_lengths
        )
    }
}

impl BatchStats {
    pub fn record(&mut self, g: &Generated) {
        self.n_queries += 1;
        let len = g.text().chars().count();
        self.max_len = self.max_len.max(len);
        if g.is_malformed() {
            self.malformed += 1;
        }

        let q = g.query();
        self.n_terms += q.n_terms();
        self.n_numbers += q.terms().filter(|t| t.is_number()).count();
        self.n_groups += q.n_groups();
        q.operators()
            .for_each(|op| self.operator_counts[op.index()] += 1);

        self.terms_per_query.add(q.n_terms() as f64);
        self.query_lengths.add(len as f64);
    }

    /// The number of queries considered
    pub fn n_queries(&self) -> usize {
        self.n_queries
    }

    /// Length in characters of the longest query.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// What a consumer should size its query buffer to.
    pub fn longest_query_hint(&self) -> usize {
        self.max_len + LENGTH_MARGIN
    }

    /// The number of deliberately malformed queries
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    pub fn n_numbers(&self) -> usize {
        self.n_numbers
    }

    /// Parenthesised groups, nested ones included.
    pub fn n_groups(&self) -> usize {
        self.n_groups
    }

    pub fn operator_count(&self, op: Operator) -> usize {
        self.operator_counts[op.index()]
    }

    pub fn n_operators(&self) -> usize {
        self.operator_counts.iter().sum()
    }

    /// Share of this operator among all drawn operators.
    pub fn operator_frequency(&self, op: Operator) -> f64 {
        match self.n_operators() {
            0 => 0.0,
            n => self.operator_count(op) as f64 / n as f64,
        }
    }

    /// Distribution of number of terms per query
    pub fn terms_per_query(&self) -> &Hstats<f64> {
        &self.terms_per_query
    }

    /// Distribution of query lengths
    pub fn query_lengths(&self) -> &Hstats<f64> {
        &self.query_lengths
    }
}
