// Recognizing generated queries
use chumsky::prelude::*;

use crate::models::{
    operator::Operator,
    query::{Query, Term},
};

pub(crate) fn parse_query(s: &str) -> Option<Query> {
    query_parser().parse(s).into_result().ok()
}

// Exactly one space around operators, nothing before
// the first term and nothing after the last one.
fn query_parser<'src>() -> impl Parser<'src, &'src str, Query> {
    sequence_parser().then_ignore(end())
}

// Groups hug their content: `(a OR b)`, never `( a OR b )`.
fn sequence_parser<'src>() -> impl Parser<'src, &'src str, Query> + Clone {
    recursive(|sequence| {
        let group = sequence
            .delimited_by(just('('), just(')'))
            .map(Term::group);
        let term = choice((group, term_parser())).boxed();

        let extension = just(' ')
            .ignore_then(operator_parser())
            .then_ignore(just(' '))
            .then(term.clone());

        term.then(extension.repeated().collect::<Vec<_>>())
            .map(|(first, rest)| {
                rest.into_iter()
                    .fold(Query::new(first), |q, (o, t)| q.with_extension(o, t))
            })
    })
}

fn operator_parser<'src>() -> impl Parser<'src, &'src str, Operator> + Clone {
    // ANDNOT before AND, or AND would win.
    choice((
        just("ANDNOT").to(Operator::AndNot),
        just("AND").to(Operator::And),
        just("OR").to(Operator::Or),
    ))
}

static NON_TOKEN: [char; 2] = ['(', ')'];

fn token_parser<'src>() -> impl Parser<'src, &'src str, String> + Clone {
    none_of(NON_TOKEN)
        .filter(|c: &char| !c.is_whitespace())
        .repeated()
        .at_least(1)
        .collect::<String>()
}

// Any token that is not an operator keyword.
fn term_parser<'src>() -> impl Parser<'src, &'src str, Term> + Clone {
    token_parser()
        .filter(|t: &String| t.parse::<Operator>().is_err())
        .map(|t| Term::from_token(&t))
}
