pub mod batch;
pub mod generator;
pub mod operator;
pub mod query;
pub mod stats;
pub mod vocabulary;
