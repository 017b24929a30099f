use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use log::{debug, info};
use rand::Rng;

use crate::{
    error::GeneratorError,
    models::{
        generator::{Generator, GeneratorConfig},
        stats::BatchStats,
    },
};

impl Generator {
    /// Writes `n` queries to the sink, one per line.
    ///
    /// Example:
    /// ```
    /// use querygen::prelude::*;
    ///
    /// let g = Generator::builder(["alpha", "beta"]).build().unwrap();
    /// let mut out = vec![];
    /// let stats = g.write_batch(&mut rand::rng(), 3, &mut out).unwrap();
    /// assert_eq!(stats.n_queries(), 3);
    /// assert_eq!(String::from_utf8(out).unwrap().lines().count(), 3);
    /// ```
    pub fn write_batch<R: Rng, W: Write>(
        &self,
        rng: &mut R,
        n: usize,
        mut sink: W,
    ) -> Result<BatchStats, GeneratorError> {
        let mut stats = BatchStats::default();
        for _ in 0..n {
            let generated = self.generate(rng);
            writeln!(sink, "{}", generated.text())?;
            stats.record(&generated);
        }
        sink.flush()?;
        Ok(stats)
    }
}

/// Generates `n_queries` queries into `outfile`, replacing its content.
///
/// The configuration is checked before the file is touched, so an
/// invalid configuration never leaves an empty file behind.
pub fn generate<P: AsRef<Path>, R: Rng>(
    outfile: P,
    n_queries: usize,
    config: GeneratorConfig,
    rng: &mut R,
) -> Result<BatchStats, GeneratorError> {
    let path = outfile.as_ref();
    let generator = Generator::from_config(config)?;

    debug!("Writing {} queries to {}", n_queries, path.display());
    let file = File::create(path).map_err(|e| GeneratorError::io(path, e))?;
    let stats = generator
        .write_batch(rng, n_queries, BufWriter::new(file))
        .map_err(|e| match e {
            GeneratorError::Stream(source) => GeneratorError::io(path, source),
            e => e,
        })?;

    info!(
        "Wrote {} queries to {} ({} malformed)",
        stats.n_queries(),
        path.display(),
        stats.malformed()
    );
    Ok(stats)
}
