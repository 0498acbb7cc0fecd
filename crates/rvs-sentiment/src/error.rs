use thiserror::Error;

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed lexicon entry on line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("lexicon contains no entries")]
    Empty,
}
