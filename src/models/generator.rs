use std::num::NonZeroUsize;

use log::{debug, info};
use rand::{
    Rng,
    distr::{Bernoulli, Distribution},
};

use crate::{
    error::GeneratorError,
    models::{
        operator::{Operator, OperatorDistribution, OperatorWeights},
        query::{Query, Term},
        vocabulary::Vocabulary,
    },
};

pub(crate) mod malformation;
pub use malformation::Malformation;

/// The range the number of extensions (` OPERATOR term` groups
/// after the first term) is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExtensionRange {
    /// Extensions in `0..=max_terms - 1`. Queries have up to `max_terms` terms.
    #[default]
    UpToMax,
    /// Extensions in `0..max_terms - 1`. Queries have up to `max_terms - 1`
    /// terms, but never less than one.
    BelowMax,
}

impl ExtensionRange {
    fn draw<R: Rng>(&self, max_terms: NonZeroUsize, rng: &mut R) -> usize {
        let max = max_terms.get();
        match self {
            ExtensionRange::UpToMax => rng.random_range(0..max),
            ExtensionRange::BelowMax if max < 2 => 0,
            ExtensionRange::BelowMax => rng.random_range(0..max - 1),
        }
    }

    /// The largest number of terms a query can have under this convention.
    pub fn reachable_terms(&self, max_terms: NonZeroUsize) -> usize {
        match self {
            ExtensionRange::UpToMax => max_terms.get(),
            ExtensionRange::BelowMax => (max_terms.get() - 1).max(1),
        }
    }
}

/// Everything a [`Generator`] needs. Build it with the `with_` methods
/// or through [`Generator::builder`].
///
/// Nothing is checked until [`Generator::from_config`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    vocabulary: Vec<String>,
    numeric_max: i64,
    operator_weights: OperatorWeights,
    max_terms: usize,
    word_probability: f64,
    extension_range: ExtensionRange,
    malformed_rate: f64,
    group_probability: f64,
    max_depth: usize,
}

/// The range numbers are drawn from by default.
pub const DEFAULT_NUMERIC_MAX: i64 = 1_600_000;

/// Default maximum number of terms in a query.
pub const DEFAULT_MAX_TERMS: usize = 5;

/// Default bound on group nesting.
pub const DEFAULT_MAX_DEPTH: usize = 2;

impl GeneratorConfig {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: words.into_iter().map(Into::into).collect(),
            numeric_max: DEFAULT_NUMERIC_MAX,
            operator_weights: OperatorWeights::default(),
            max_terms: DEFAULT_MAX_TERMS,
            word_probability: 0.5,
            extension_range: ExtensionRange::default(),
            malformed_rate: 0.0,
            group_probability: 0.0,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn from_vocabulary(v: &Vocabulary) -> Self {
        Self::new(v.iter())
    }

    pub fn with_numeric_max(mut self, n: i64) -> Self {
        self.numeric_max = n;
        self
    }

    pub fn with_operator_weights(mut self, w: OperatorWeights) -> Self {
        self.operator_weights = w;
        self
    }

    pub fn with_max_terms(mut self, n: usize) -> Self {
        self.max_terms = n;
        self
    }

    pub fn with_word_probability(mut self, p: f64) -> Self {
        self.word_probability = p;
        self
    }

    pub fn with_extension_range(mut self, r: ExtensionRange) -> Self {
        self.extension_range = r;
        self
    }

    pub fn with_malformed_rate(mut self, p: f64) -> Self {
        self.malformed_rate = p;
        self
    }

    pub fn with_group_probability(mut self, p: f64) -> Self {
        self.group_probability = p;
        self
    }

    pub fn with_max_depth(mut self, d: usize) -> Self {
        self.max_depth = d;
        self
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Numbers are drawn in `0..=numeric_max`.
    ///
    /// The default is 1600000.
    pub fn numeric_max(&self) -> i64 {
        self.numeric_max
    }

    /// The default is `AND: 1, OR: 3, ANDNOT: 1`
    pub fn operator_weights(&self) -> OperatorWeights {
        self.operator_weights
    }

    /// The default is 5.
    pub fn max_terms(&self) -> usize {
        self.max_terms
    }

    /// Probability of a term being a vocabulary word rather than a number.
    ///
    /// The default is 0.5
    pub fn word_probability(&self) -> f64 {
        self.word_probability
    }

    pub fn extension_range(&self) -> ExtensionRange {
        self.extension_range
    }

    /// Probability of a query being deliberately malformed.
    ///
    /// The default is 0.0
    pub fn malformed_rate(&self) -> f64 {
        self.malformed_rate
    }

    /// Probability for a term to open a parenthesised group, when
    /// at least two terms are left to place and nesting allows it.
    ///
    /// The default is 0.0, meaning flat queries.
    pub fn group_probability(&self) -> f64 {
        self.group_probability
    }

    /// How deep groups can nest.
    ///
    /// The default is 2
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

/// A builder should you prefer building the generator directly.
#[derive(Debug, Clone)]
pub struct GeneratorBuilder {
    config: GeneratorConfig,
}

impl GeneratorBuilder {
    pub fn build(self) -> Result<Generator, GeneratorError> {
        Generator::from_config(self.config)
    }

    pub fn numeric_max(mut self, n: i64) -> Self {
        self.config = self.config.with_numeric_max(n);
        self
    }

    /// Example:
    /// ```
    /// use querygen::prelude::*;
    ///
    /// let g = Generator::builder(["a"])
    ///     .operator_weights(OperatorWeights::new(1, 0, 0))
    ///     .build()
    ///     .unwrap();
    /// let mut rng = rand::rng();
    /// assert!(g.generate_structured(&mut rng).operators().all(|o| o == Operator::And));
    /// ```
    pub fn operator_weights(mut self, w: OperatorWeights) -> Self {
        self.config = self.config.with_operator_weights(w);
        self
    }

    pub fn max_terms(mut self, n: usize) -> Self {
        self.config = self.config.with_max_terms(n);
        self
    }

    pub fn word_probability(mut self, p: f64) -> Self {
        self.config = self.config.with_word_probability(p);
        self
    }

    pub fn extension_range(mut self, r: ExtensionRange) -> Self {
        self.config = self.config.with_extension_range(r);
        self
    }

    /// Makes a fraction of the queries deliberately malformed.
    /// See [`Malformation`] for the kinds of faults.
    ///
    /// The default is 0.0, meaning all queries are well formed.
    pub fn malformed_rate(mut self, p: f64) -> Self {
        self.config = self.config.with_malformed_rate(p);
        self
    }

    /// Gathers terms in parenthesised groups, like `(a AND b) ANDNOT (x OR c)`.
    /// Groups share the query's term budget, they never add terms.
    ///
    /// Example:
    /// ```
    /// use querygen::prelude::*;
    ///
    /// let g = Generator::builder(["a", "b"])
    ///     .max_terms(6)
    ///     .group_probability(0.5)
    ///     .build()
    ///     .unwrap();
    /// let mut rng = rand::rng();
    /// let q = g.generate_structured(&mut rng);
    /// assert!(q.n_terms() <= 6);
    /// assert!(q.depth() <= 2);
    /// ```
    pub fn group_probability(mut self, p: f64) -> Self {
        self.config = self.config.with_group_probability(p);
        self
    }

    pub fn max_depth(mut self, d: usize) -> Self {
        self.config = self.config.with_max_depth(d);
        self
    }
}

/// One generated query, with how it was made.
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    query: Query,
    malformation: Option<Malformation>,
    text: String,
}

impl Generated {
    /// The well formed query, before any malformation.
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn malformation(&self) -> Option<Malformation> {
        self.malformation
    }

    pub fn is_malformed(&self) -> bool {
        self.malformation.is_some()
    }

    /// What goes on the wire.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Generates random boolean queries like `cat OR 1234 ANDNOT dog`.
///
/// A generator is immutable once built. The randomness comes from
/// the `Rng` given to each call, so sharing a generator between
/// threads only requires one `Rng` per thread.
///
/// Example:
/// ```
/// use querygen::prelude::*;
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let g = Generator::builder(["cat", "dog"]).max_terms(3).build().unwrap();
/// let mut rng = StdRng::seed_from_u64(42);
/// let q = g.generate_query(&mut rng);
/// assert!(Query::is_well_formed(&q));
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    vocabulary: Vocabulary,
    max_terms: NonZeroUsize,
    words: Bernoulli,
    operators: OperatorDistribution,
    malformed: Bernoulli,
    groups: Bernoulli,
}

fn probability(name: &str, p: f64) -> Result<Bernoulli, GeneratorError> {
    Bernoulli::new(p).map_err(|_| GeneratorError::invalid(format!("{name} {p} not in [0, 1]")))
}

impl Generator {
    pub fn builder<I, S>(words: I) -> GeneratorBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GeneratorBuilder {
            config: GeneratorConfig::new(words),
        }
    }

    /// Checks the configuration and builds the generator.
    pub fn from_config(config: GeneratorConfig) -> Result<Self, GeneratorError> {
        let vocabulary = Vocabulary::new(config.vocabulary.clone())?;
        let max_terms = NonZeroUsize::new(config.max_terms)
            .ok_or_else(|| GeneratorError::invalid("max terms per query must be at least 1"))?;
        if config.numeric_max < 0 {
            return Err(GeneratorError::invalid(format!(
                "numeric max {} is negative",
                config.numeric_max
            )));
        }
        let words = probability("word probability", config.word_probability)?;
        let malformed = probability("malformed rate", config.malformed_rate)?;
        let groups = probability("group probability", config.group_probability)?;
        let operators = config.operator_weights.distribution()?;

        debug!(
            "Generator: {} words, numbers in 0..={}, up to {} terms ({:?}), {:?}",
            vocabulary.len(),
            config.numeric_max,
            max_terms,
            config.extension_range,
            config.operator_weights
        );
        if config.group_probability > 0.0 {
            debug!(
                "Grouping terms with probability {}, nesting up to {}",
                config.group_probability, config.max_depth
            );
        }
        if config.malformed_rate > 0.0 {
            info!(
                "About 1 query in {:.0} will be malformed on purpose",
                1.0 / config.malformed_rate
            );
        }

        Ok(Self {
            config,
            vocabulary,
            max_terms,
            words,
            operators,
            malformed,
            groups,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn max_terms(&self) -> NonZeroUsize {
        self.max_terms
    }

    /// A vocabulary word or a number, following the word probability.
    pub fn generate_term<R: Rng>(&self, rng: &mut R) -> Term {
        if self.words.sample(rng) {
            Term::Word(self.vocabulary.choose(rng).to_string())
        } else {
            Term::Number(rng.random_range(0..=self.config.numeric_max))
        }
    }

    pub fn generate_operator<R: Rng>(&self, rng: &mut R) -> Operator {
        self.operators.sample(rng)
    }

    /// A query that is always well formed, whatever the malformed rate.
    pub fn generate_structured<R: Rng>(&self, rng: &mut R) -> Query {
        let n_terms = 1 + self.config.extension_range.draw(self.max_terms, rng);
        self.generate_sequence(n_terms, 0, rng)
    }

    // Exactly `n_terms` words and numbers, some of them gathered in groups.
    fn generate_sequence<R: Rng>(&self, n_terms: usize, depth: usize, rng: &mut R) -> Query {
        let (first, mut left) = self.generate_item(n_terms, depth, rng);
        let mut q = Query::new(first);
        while left > 0 {
            let op = self.generate_operator(rng);
            let (t, l) = self.generate_item(left, depth, rng);
            q.push(op, t);
            left = l;
        }
        q
    }

    // A term or a group taking at least two of the `budget` terms.
    // Returns what is left of the budget.
    fn generate_item<R: Rng>(&self, budget: usize, depth: usize, rng: &mut R) -> (Term, usize) {
        if budget >= 2 && depth < self.config.max_depth && self.groups.sample(rng) {
            let size = rng.random_range(2..=budget);
            let group = self.generate_sequence(size, depth + 1, rng);
            (Term::group(group), budget - size)
        } else {
            (self.generate_term(rng), budget - 1)
        }
    }

    /// A query, possibly malformed on purpose.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Generated {
        let query = self.generate_structured(rng);
        let malformation = if self.malformed.sample(rng) {
            Some(Malformation::random(&query, rng))
        } else {
            None
        };
        let text = match malformation {
            Some(m) => m.apply(&query),
            None => query.to_string(),
        };
        Generated {
            query,
            malformation,
            text,
        }
    }

    pub fn generate_query<R: Rng>(&self, rng: &mut R) -> String {
        self.generate(rng).into_text()
    }

    /// An endless stream of queries.
    pub fn queries<'a, R: Rng>(
        &'a self,
        rng: &'a mut R,
    ) -> impl Iterator<Item = String> + 'a {
        std::iter::repeat_with(move || self.generate_query(&mut *rng))
    }
}
