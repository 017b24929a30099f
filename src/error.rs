use std::{io, path::PathBuf};

/// Everything that can go wrong when setting up a generator
/// or writing a batch of queries.
///
/// Note that a malformed query is never an error. Malformed
/// queries are a configured feature of the generator, see
/// [`crate::prelude::GeneratorBuilder::malformed_rate`].
#[derive(thiserror::Error, Debug)]
pub enum GeneratorError {
    /// The generator setup is unusable (empty vocabulary,
    /// zero max terms, negative numeric range, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A string is not a query as written by the generator.
    #[error("malformed query {0:?}")]
    MalformedQuery(String),

    /// A file could not be opened, read or written.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to an unnamed stream failed.
    #[error("i/o failure: {0}")]
    Stream(#[from] io::Error),
}

impl GeneratorError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GeneratorError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when this is a configuration problem.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, GeneratorError::InvalidConfiguration(_))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display() {
        let e = GeneratorError::invalid("empty vocabulary");
        assert_eq!(e.to_string(), "invalid configuration: empty vocabulary");
        assert!(e.is_invalid_configuration());

        let e = GeneratorError::io(
            "some/file.txt",
            io::Error::new(io::ErrorKind::NotFound, "nope"),
        );
        assert_eq!(e.to_string(), "some/file.txt: nope");
        assert!(!e.is_invalid_configuration());
    }
}
