//! Random boolean queries to stress search engines.
//!
//! A [`prelude::Generator`] draws queries like `cat OR 1234 ANDNOT dog`
//! from a vocabulary of words and a range of numbers, optionally gathering
//! terms in parenthesised groups:
//!
//! ```
//! use querygen::prelude::*;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let g = Generator::builder(["cat", "dog", "mouse"])
//!     .max_terms(4)
//!     .numeric_max(100)
//!     .build()
//!     .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! for q in g.queries(&mut rng).take(10) {
//!     let parsed: Query = q.parse().unwrap();
//!     assert!(parsed.n_terms() <= 4);
//! }
//! ```
//!
//! Queries are always well formed unless a malformed rate is set, in
//! which case a fraction of them get a deliberate syntax fault
//! (see [`prelude::Malformation`]). This is meant for fuzzing the
//! query parser of the engine under test.
pub mod error;
pub mod models;
pub mod prelude;
mod testing;
