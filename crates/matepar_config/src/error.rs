//! Errors raised while reading `matepar.toml`.

use std::path::PathBuf;

/// Why a `matepar.toml` could not be turned into engine settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        /// The file that was opened.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// The file is not valid TOML or names an unknown key.
    #[error("malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A well-formed value the engine cannot run with.
    #[error("`{key}` {reason}")]
    OutOfRange {
        /// Dotted path of the offending key, e.g. `engine.max_temperature`.
        key: &'static str,
        /// What the value must satisfy.
        reason: &'static str,
    },
}
