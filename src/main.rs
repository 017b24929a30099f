use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use querygen::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

mod cli;
use cli::Cli;

fn config_from_cli(cli: &Cli, rng: &mut StdRng) -> Result<GeneratorConfig> {
    let vocabulary = match &cli.words {
        Some(path) => Vocabulary::from_file(path)
            .with_context(|| format!("loading words from {}", path.display()))?,
        None => Vocabulary::lorem(cli.lorem_words, rng).context("synthesizing lorem words")?,
    };

    let extension_range = if cli.below_max {
        ExtensionRange::BelowMax
    } else {
        ExtensionRange::UpToMax
    };

    Ok(GeneratorConfig::from_vocabulary(&vocabulary)
        .with_max_terms(cli.query_maxlen)
        .with_numeric_max(cli.numeric_max)
        .with_word_probability(cli.word_probability)
        .with_operator_weights(cli.weights)
        .with_malformed_rate(cli.malformed_rate)
        .with_extension_range(extension_range)
        .with_group_probability(cli.group_probability)
        .with_max_depth(cli.max_depth))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logger(cli.verbose);

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    debug!("{cli:?}");

    let config = config_from_cli(&cli, &mut rng)?;
    let stats = generate(&cli.outfile, cli.n_queries, config, &mut rng)
        .with_context(|| format!("generating queries into {}", cli.outfile.display()))?;

    cli::report(&mut io::stdout().lock(), &stats, cli.malformed_rate, cli.stats)
        .context("writing the report")?;

    Ok(())
}
