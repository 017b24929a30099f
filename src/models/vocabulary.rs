use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use fake::{Fake, faker::lorem::en::Word};
use itertools::Itertools;
use log::debug;
use nonempty::NonEmpty;
use rand::Rng;

use crate::{error::GeneratorError, models::operator::Operator};

/// The words a generator can use as terms.
///
/// A vocabulary is never empty. Its words are never empty and never
/// contain whitespace or parentheses, so generated queries stay on a single
/// line with single space separation. A word can not be an operator keyword
/// or an integer either, or it would read back as something else.
///
/// Example:
/// ```
/// use querygen::prelude::Vocabulary;
///
/// let v = Vocabulary::new(vec!["alpha".into(), "beta".into()]).unwrap();
/// assert_eq!(v.len(), 2);
/// assert!(Vocabulary::new(vec![]).is_err());
/// assert!(Vocabulary::new(vec!["42".into()]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vocabulary(NonEmpty<String>);

impl Vocabulary {
    pub fn new(words: Vec<String>) -> Result<Self, GeneratorError> {
        if let Some((bad, why)) = words
            .iter()
            .find_map(|w| unusable_word(w).map(|why| (w, why)))
        {
            return Err(GeneratorError::invalid(format!(
                "vocabulary word {bad:?} {why}"
            )));
        }
        NonEmpty::from_vec(words)
            .map(Self)
            .ok_or_else(|| GeneratorError::invalid("empty vocabulary"))
    }

    /// Reads whitespace separated words, in order of appearance.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, GeneratorError> {
        let mut words = vec![];
        for line in reader.lines() {
            words.extend(line?.split_whitespace().map(String::from));
        }
        Self::new(words)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, GeneratorError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GeneratorError::io(path, e))?;
        let v = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            GeneratorError::Stream(source) => GeneratorError::io(path, source),
            e => e,
        })?;
        debug!("Loaded {} words from {}", v.len(), path.display());
        Ok(v)
    }

    /// A vocabulary of at most `n` distinct lorem ipsum words.
    /// The lorem word list is small, so large `n` will yield
    /// less words than asked.
    pub fn lorem<R: Rng>(n: usize, rng: &mut R) -> Result<Self, GeneratorError> {
        let words = (0..n)
            .map(|_| Word().fake_with_rng::<String, R>(rng))
            .unique()
            .collect_vec();
        debug!("Synthesized {} distinct lorem words", words.len());
        Self::new(words)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    // Always false, a vocabulary has at least one word.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.0.get(i).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.iter().any(|w| w == word)
    }

    /// A uniformly drawn word.
    pub fn choose<R: Rng>(&self, rng: &mut R) -> &str {
        let i = rng.random_range(0..self.0.len());
        self.0.get(i).unwrap_or(&self.0.head)
    }
}

fn unusable_word(w: &str) -> Option<&'static str> {
    if w.is_empty() {
        Some("is empty")
    } else if w.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
        Some("contains whitespace or parentheses")
    } else if w.parse::<Operator>().is_ok() {
        Some("is an operator")
    } else if w.parse::<i64>().is_ok() {
        Some("reads as a number")
    } else {
        None
    }
}
