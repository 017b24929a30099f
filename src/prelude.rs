pub use crate::error::GeneratorError;
pub use crate::models::batch::generate;
pub use crate::models::generator::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_TERMS, DEFAULT_NUMERIC_MAX, ExtensionRange, Generated, Generator,
    GeneratorBuilder, GeneratorConfig, Malformation,
};
pub use crate::models::operator::{Operator, OperatorWeights};
pub use crate::models::query::{Query, Term};
pub use crate::models::stats::{BatchStats, LENGTH_MARGIN};
pub use crate::models::vocabulary::Vocabulary;
