//! Testing oriented utilities.
use std::sync::LazyLock;

use rand::{SeedableRng, rngs::StdRng};

use crate::prelude::{Generator, Query, Vocabulary};

static LOREM_GENERATOR: LazyLock<Generator> = LazyLock::new(|| {
    let mut rng = StdRng::seed_from_u64(0);
    let vocabulary = Vocabulary::lorem(30, &mut rng).expect("Lorem words are never empty");
    Generator::builder(vocabulary.iter())
        .max_terms(6)
        .numeric_max(1000)
        .build()
        .expect("Valid default configuration")
});

impl Query {
    /// Builds a random query over lorem ipsum words.
    /// This is mainly useful for testing and benchmarking.
    /// Example:
    /// ```
    /// use querygen::prelude::Query;
    ///
    /// let mut rng = rand::rng();
    /// let q = Query::random(&mut rng);
    /// assert!(q.n_terms() >= 1);
    /// ```
    pub fn random<U: rand::Rng>(rng: &mut U) -> Self {
        LOREM_GENERATOR.generate_structured(rng)
    }

    /// Generate a random query string, compatible with parsing.
    /// This is mainly useful for testing and benchmarking.
    ///
    /// Example:
    /// ```
    /// use querygen::prelude::Query;
    ///
    /// let mut rng = rand::rng();
    /// let s = Query::random_string(&mut rng);
    /// assert!( s.parse::<Query>().is_ok() )
    /// ```
    pub fn random_string<U: rand::Rng>(rng: &mut U) -> String {
        Self::random(rng).to_string()
    }
}
