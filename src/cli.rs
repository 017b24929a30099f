use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use querygen::prelude::{BatchStats, DEFAULT_MAX_DEPTH, DEFAULT_NUMERIC_MAX, OperatorWeights};

#[derive(Parser, Debug)]
#[command(
    name = "generate",
    about = "Generate random boolean queries (AND, OR, ANDNOT) into a file",
    version
)]
pub struct Cli {
    /// File to write the queries to, one per line. Overwritten.
    pub outfile: PathBuf,

    /// Number of queries to generate
    pub n_queries: usize,

    /// Maximum number of terms in a query
    pub query_maxlen: usize,

    /// Word list file (whitespace separated). Lorem ipsum words if absent.
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// How many lorem ipsum words to draw when no word list is given
    #[arg(long, default_value_t = 2000)]
    pub lorem_words: usize,

    /// Numbers are drawn between 0 and this, inclusive
    #[arg(long, default_value_t = DEFAULT_NUMERIC_MAX, allow_negative_numbers = true)]
    pub numeric_max: i64,

    /// Probability of a term being a word rather than a number
    #[arg(long, default_value_t = 0.5)]
    pub word_probability: f64,

    /// Operator weights as AND,OR,ANDNOT
    #[arg(long, default_value = "1,3,1", value_parser = parse_weights)]
    pub weights: OperatorWeights,

    /// Fraction of queries made malformed on purpose
    #[arg(long, default_value_t = 1.0 / 5000.0)]
    pub malformed_rate: f64,

    /// Probability for a term to open a parenthesised group
    #[arg(long, default_value_t = 0.0)]
    pub group_probability: f64,

    /// How deep parenthesised groups can nest
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Never reach query_maxlen terms (at most query_maxlen - 1)
    #[arg(long)]
    pub below_max: bool,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print batch statistics
    #[arg(long)]
    pub stats: bool,

    /// Debug logging (unless RUST_LOG says otherwise)
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_weights(s: &str) -> Result<OperatorWeights, String> {
    let ws = s
        .split(',')
        .map(|w| w.trim().parse::<u32>().map_err(|e| format!("{w:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match ws.as_slice() {
        [and, or, and_not] => Ok(OperatorWeights::new(*and, *or, *and_not)),
        _ => Err(format!("expected 3 weights AND,OR,ANDNOT, got {}", ws.len())),
    }
}

/// What a run prints once the queries are written.
pub fn report<W: Write>(
    out: &mut W,
    stats: &BatchStats,
    malformed_rate: f64,
    show_stats: bool,
) -> io::Result<()> {
    writeln!(out, "char size of longest query = {}", stats.longest_query_hint())?;
    if malformed_rate > 0.0 {
        writeln!(
            out,
            "WARNING: generation typically has ≈ 1 error per {:.0} queries",
            1.0 / malformed_rate
        )?;
    }
    if show_stats {
        writeln!(out, "{stats}")?;
    }
    Ok(())
}

pub fn init_logger(verbose: bool) {
    let filters = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| if verbose { "debug" } else { "info" }.to_string());
    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}

#[cfg(test)]
mod test {
    use super::*;
    use querygen::prelude::Generator;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_positional_args() {
        let cli = Cli::try_parse_from(["generate", "out.txt", "5", "3"]).unwrap();
        assert_eq!(cli.outfile, PathBuf::from("out.txt"));
        assert_eq!(cli.n_queries, 5);
        assert_eq!(cli.query_maxlen, 3);
        assert_eq!(cli.weights, OperatorWeights::default());
        assert_eq!(cli.numeric_max, 1_600_000);
        assert_eq!(cli.malformed_rate, 0.0002);
        assert!(!cli.below_max);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.group_probability, 0.0);
        assert_eq!(cli.max_depth, 2);
    }

    #[test]
    fn test_wrong_arg_count() {
        assert!(Cli::try_parse_from(["generate"]).is_err());
        assert!(Cli::try_parse_from(["generate", "out.txt", "5"]).is_err());
        assert!(Cli::try_parse_from(["generate", "out.txt", "5", "3", "extra"]).is_err());
        assert!(Cli::try_parse_from(["generate", "out.txt", "five", "3"]).is_err());
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "generate",
            "out.txt",
            "5",
            "3",
            "--weights",
            "2,2,1",
            "--seed",
            "42",
            "--numeric-max",
            "-1",
            "--below-max",
            "--group-probability",
            "0.3",
        ])
        .unwrap();
        assert_eq!(cli.group_probability, 0.3);
        assert_eq!(cli.weights, OperatorWeights::new(2, 2, 1));
        assert_eq!(cli.seed, Some(42));
        assert_eq!(cli.numeric_max, -1);
        assert!(cli.below_max);
    }

    fn alpha_stats() -> BatchStats {
        let g = Generator::builder(["alpha"])
            .word_probability(1.0)
            .max_terms(1)
            .build()
            .unwrap();
        g.write_batch(&mut StdRng::seed_from_u64(7), 10, io::sink())
            .unwrap()
    }

    #[test]
    fn test_report() {
        let mut out = vec![];
        report(&mut out, &alpha_stats(), 0.0002, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "char size of longest query = 7\n\
             WARNING: generation typically has ≈ 1 error per 5000 queries\n"
        );

        let mut out = vec![];
        report(&mut out, &alpha_stats(), 0.0, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "char size of longest query = 7\n"
        );

        let mut out = vec![];
        report(&mut out, &alpha_stats(), 0.0, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("char size of longest query = 7\n"));
        assert!(text.contains("N queries=10"));
    }

    #[test]
    fn test_parse_weights() {
        assert_eq!(parse_weights("1, 3, 1"), Ok(OperatorWeights::default()));
        assert!(parse_weights("1,3").is_err());
        assert!(parse_weights("1,3,x").is_err());
        assert!(parse_weights("1,3,-1").is_err());
    }
}
