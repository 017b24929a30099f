use rand::{Rng, distr::Distribution, distr::weighted::WeightedIndex};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::error::GeneratorError;

/// The boolean operators joining terms in a query.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, EnumCount, AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Operator {
    #[strum(serialize = "AND")]
    And,
    #[strum(serialize = "OR")]
    Or,
    #[strum(serialize = "ANDNOT")]
    AndNot,
}

impl Operator {
    /// Position of this operator in [`Operator::iter`] order.
    /// Handy for indexing per operator counters.
    pub fn index(&self) -> usize {
        match self {
            Operator::And => 0,
            Operator::Or => 1,
            Operator::AndNot => 2,
        }
    }
}

/// Relative weights of the operators.
///
/// The weights do not need to sum to anything in particular,
/// they only define relative draw probabilities.
/// The default is `AND: 1, OR: 3, ANDNOT: 1`, so three draws out
/// of five produce `OR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorWeights {
    and: u32,
    or: u32,
    and_not: u32,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            and: 1,
            or: 3,
            and_not: 1,
        }
    }
}

impl OperatorWeights {
    pub fn new(and: u32, or: u32, and_not: u32) -> Self {
        Self { and, or, and_not }
    }

    /// Every operator equally likely.
    pub fn uniform() -> Self {
        Self::new(1, 1, 1)
    }

    pub fn weight(&self, op: Operator) -> u32 {
        match op {
            Operator::And => self.and,
            Operator::Or => self.or,
            Operator::AndNot => self.and_not,
        }
    }

    /// Returns a copy with the given operator re-weighted.
    pub fn with_weight(mut self, op: Operator, w: u32) -> Self {
        match op {
            Operator::And => self.and = w,
            Operator::Or => self.or = w,
            Operator::AndNot => self.and_not = w,
        }
        self
    }

    /// The probability of drawing the given operator.
    pub fn probability(&self, op: Operator) -> f64 {
        let total: u64 = Operator::iter().map(|o| u64::from(self.weight(o))).sum();
        if total == 0 {
            return 0.0;
        }
        f64::from(self.weight(op)) / total as f64
    }

    pub(crate) fn distribution(&self) -> Result<OperatorDistribution, GeneratorError> {
        let ops: Vec<Operator> = Operator::iter().collect();
        let index = WeightedIndex::new(ops.iter().map(|o| self.weight(*o)))
            .map_err(|e| GeneratorError::invalid(format!("operator weights {self:?}: {e}")))?;
        Ok(OperatorDistribution { ops, index })
    }
}

// Weighted draw over the operators.
#[derive(Debug, Clone)]
pub(crate) struct OperatorDistribution {
    ops: Vec<Operator>,
    index: WeightedIndex<u32>,
}

impl Distribution<Operator> for OperatorDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Operator {
        self.ops[self.index.sample(rng)]
    }
}
