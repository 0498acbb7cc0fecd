//! Polarity lexicon: token and idiom valences loaded once per process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use crate::error::LexiconError;

const BUILTIN_SOURCE: &str = include_str!("../lexicon/affect.tsv");

/// Valences outside this bound are rejected at load time.
const MAX_VALENCE: f64 = 4.0;

static BUILTIN: LazyLock<Arc<Lexicon>> = LazyLock::new(|| {
    Arc::new(Lexicon::parse(BUILTIN_SOURCE).expect("built-in lexicon is well-formed"))
});

/// Immutable mapping from tokens and multi-word idioms to affect intensity.
///
/// Source format: optional `# version: <tag>` header, other `#` lines are
/// comments, then one `token<TAB>valence` entry per line. Entries whose
/// token contains spaces are idioms and match consecutive tokens
/// case-insensitively.
#[derive(Debug, Clone)]
pub struct Lexicon {
    version: String,
    words: HashMap<String, f64>,
    idioms: HashMap<String, f64>,
    max_idiom_len: usize,
}

impl Lexicon {
    /// The lexicon compiled into this crate, parsed on first use.
    #[must_use]
    pub fn builtin() -> Arc<Self> {
        Arc::clone(&BUILTIN)
    }

    /// Load a replacement lexicon from disk.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError`] if the file cannot be read or contains a bad entry.
    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let content = std::fs::read_to_string(path).map_err(|e| LexiconError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let lexicon = Self::parse(&content)?;
        tracing::info!(
            path = %path.display(),
            version = %lexicon.version,
            entries = lexicon.len(),
            "loaded polarity lexicon"
        );
        Ok(lexicon)
    }

    /// Parse lexicon source text.
    ///
    /// # Errors
    ///
    /// Returns [`LexiconError::Malformed`] for a line without a tab-separated
    /// finite valence in `[-4, 4]`, and [`LexiconError::Empty`] if nothing was defined.
    pub fn parse(source: &str) -> Result<Self, LexiconError> {
        let mut version = String::from("unversioned");
        let mut words = HashMap::new();
        let mut idioms = HashMap::new();
        let mut max_idiom_len = 0;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(comment) = line.strip_prefix('#') {
                if let Some(tag) = comment.trim().strip_prefix("version:") {
                    version = tag.trim().to_string();
                }
                continue;
            }

            let malformed = |reason: &str| LexiconError::Malformed {
                line: line_no,
                reason: reason.to_string(),
            };

            let (token, value) = line
                .split_once('\t')
                .ok_or_else(|| malformed("expected token<TAB>valence"))?;
            let token = token.trim();
            if token.is_empty() {
                return Err(malformed("empty token"));
            }
            let valence: f64 = value
                .trim()
                .parse()
                .map_err(|_| malformed("valence is not a number"))?;
            if !valence.is_finite() || valence.abs() > MAX_VALENCE {
                return Err(malformed("valence must be within [-4, 4]"));
            }

            let parts: Vec<String> = token.split_whitespace().map(str::to_lowercase).collect();
            if parts.len() > 1 {
                max_idiom_len = max_idiom_len.max(parts.len());
                idioms.insert(parts.join(" "), valence);
            } else {
                words.insert(token.to_string(), valence);
            }
        }

        if words.is_empty() && idioms.is_empty() {
            return Err(LexiconError::Empty);
        }

        Ok(Self {
            version,
            words,
            idioms,
            max_idiom_len,
        })
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of single-token and idiom entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len() + self.idioms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Valence of a single token: lowercase lookup first, then the exact
    /// spelling (emoticons such as `:D` are case-sensitive).
    #[must_use]
    pub fn valence(&self, token: &str) -> Option<f64> {
        self.words
            .get(&token.to_lowercase())
            .or_else(|| self.words.get(token))
            .copied()
    }

    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.valence(token).is_some()
    }

    /// Valence of a space-joined lowercase phrase.
    #[must_use]
    pub fn idiom(&self, phrase: &str) -> Option<f64> {
        self.idioms.get(phrase).copied()
    }

    /// Token count of the longest idiom, or 0 when there are none.
    #[must_use]
    pub fn max_idiom_len(&self) -> usize {
        self.max_idiom_len
    }
}
