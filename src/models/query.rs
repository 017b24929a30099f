use std::{fmt, str::FromStr};

use itertools::Itertools;

use crate::{error::GeneratorError, models::operator::Operator};

pub(crate) mod parsing;

/// A term of a query: a leaf, or a parenthesised sub-query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Term {
    Word(String),
    Number(i64),
    Group(Box<Query>),
}

impl Term {
    /// Integers become numbers, anything else is a word.
    pub fn from_token(token: &str) -> Self {
        token
            .parse::<i64>()
            .map(Term::Number)
            .unwrap_or_else(|_| Term::Word(token.to_string()))
    }

    pub fn group(q: Query) -> Self {
        Term::Group(Box::new(q))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Term::Number(_))
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Term::Group(_))
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Term>) {
        match self {
            Term::Group(q) => q.collect_leaves(out),
            leaf => out.push(leaf),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Word(w) => write!(f, "{w}"),
            Term::Number(n) => write!(f, "{n}"),
            Term::Group(q) => write!(f, "({q})"),
        }
    }
}

/// A boolean query: `term (OPERATOR term)*`, where a term can
/// itself be a parenthesised query.
///
/// There is no precedence here. How ungrouped operators
/// bind is up to the search engine consuming the query.
///
/// Counts and iterators look through groups: [`Query::terms`] yields
/// the words and numbers, never the groups themselves.
///
/// Example:
/// ```
/// use querygen::prelude::*;
///
/// let q: Query = "alpha OR 42 ANDNOT beta".parse().unwrap();
/// assert_eq!(q.n_terms(), 3);
/// assert_eq!(q.to_string(), "alpha OR 42 ANDNOT beta");
/// assert!(!Query::is_well_formed("alpha OR"));
///
/// let g: Query = "(a AND b) ANDNOT (x OR c)".parse().unwrap();
/// assert_eq!(g.n_terms(), 4);
/// assert_eq!(g.n_operators(), 3);
/// assert_eq!(g.depth(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Query {
    first: Term,
    rest: Vec<(Operator, Term)>,
}

impl Query {
    pub fn new(first: Term) -> Self {
        Self {
            first,
            rest: vec![],
        }
    }

    pub fn with_extension(mut self, op: Operator, t: Term) -> Self {
        self.push(op, t);
        self
    }

    pub fn push(&mut self, op: Operator, t: Term) {
        self.rest.push((op, t));
    }

    /// The first term at the top level. Can be a group.
    pub fn first(&self) -> &Term {
        &self.first
    }

    /// The ` OPERATOR term` pairs following the first term, top level only.
    pub fn extensions(&self) -> &[(Operator, Term)] {
        &self.rest
    }

    /// Words and numbers, in reading order, at any depth.
    pub fn terms(&self) -> impl Iterator<Item = &Term> {
        let mut leaves = vec![];
        self.collect_leaves(&mut leaves);
        leaves.into_iter()
    }

    /// Operators in reading order, at any depth.
    pub fn operators(&self) -> impl Iterator<Item = Operator> + '_ {
        let mut ops = vec![];
        self.collect_operators(&mut ops);
        ops.into_iter()
    }

    pub fn n_terms(&self) -> usize {
        self.terms().count()
    }

    pub fn n_operators(&self) -> usize {
        self.operators().count()
    }

    /// Number of parenthesised groups, nested ones included.
    pub fn n_groups(&self) -> usize {
        self.top_terms()
            .map(|t| match t {
                Term::Group(q) => 1 + q.n_groups(),
                _ => 0,
            })
            .sum()
    }

    /// How deep groups nest. Zero for a flat query.
    pub fn depth(&self) -> usize {
        self.top_terms()
            .map(|t| match t {
                Term::Group(q) => 1 + q.depth(),
                _ => 0,
            })
            .max()
            .unwrap_or(0)
    }

    /// True if the string is exactly a query as this crate writes them.
    pub fn is_well_formed(s: &str) -> bool {
        s.parse::<Query>().is_ok()
    }

    fn top_terms(&self) -> impl Iterator<Item = &Term> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, t)| t))
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Term>) {
        self.top_terms().for_each(|t| t.collect_leaves(out));
    }

    fn collect_operators(&self, out: &mut Vec<Operator>) {
        if let Term::Group(q) = &self.first {
            q.collect_operators(out);
        }
        for (o, t) in &self.rest {
            out.push(*o);
            if let Term::Group(q) = t {
                q.collect_operators(out);
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first)?;
        if !self.rest.is_empty() {
            write!(
                f,
                " {}",
                self.rest
                    .iter()
                    .map(|(o, t)| format!("{o} {t}"))
                    .join(" ")
            )?;
        }
        Ok(())
    }
}

impl FromStr for Query {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsing::parse_query(s)
            .ok_or_else(|| GeneratorError::MalformedQuery(s.to_string()))
    }
}
