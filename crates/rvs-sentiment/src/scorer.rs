//! Rule-based composition of lexicon valences into a [`SentimentProfile`].

use std::sync::Arc;

use crate::lexicon::Lexicon;
use crate::types::SentimentProfile;

/// Magnitude added or removed by a degree word ("very", "slightly").
const BOOSTER_STEP: f64 = 0.293;
/// Magnitude added to an all-caps token when the rest of the text is not shouted.
const CAPS_BOOST: f64 = 0.733;
/// Factor applied to a negated valence.
const NEGATION_SCALAR: f64 = -0.74;
/// Saturation constant of the compound normalisation.
const ALPHA: f64 = 15.0;
const EXCLAMATION_STEP: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_STEP: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;
const BEFORE_CONTRAST: f64 = 0.5;
const AFTER_CONTRAST: f64 = 1.5;
/// How many preceding tokens negation and degree words reach.
const MODIFIER_WINDOW: usize = 3;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "neednt", "never", "none", "nope",
    "nor", "not", "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "uh-uh", "wasnt",
    "werent", "without", "wont", "wouldnt", "rarely", "seldom", "despite",
];

const INTENSIFIERS: &[&str] = &[
    "absolutely",
    "amazingly",
    "awfully",
    "completely",
    "considerably",
    "decidedly",
    "deeply",
    "enormously",
    "entirely",
    "especially",
    "exceptionally",
    "extremely",
    "fabulously",
    "fully",
    "greatly",
    "hella",
    "highly",
    "hugely",
    "incredibly",
    "intensely",
    "majorly",
    "more",
    "most",
    "particularly",
    "purely",
    "quite",
    "really",
    "remarkably",
    "so",
    "substantially",
    "super",
    "thoroughly",
    "totally",
    "tremendously",
    "uber",
    "unbelievably",
    "unusually",
    "utterly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "almost",
    "barely",
    "hardly",
    "kinda",
    "kindof",
    "kind-of",
    "less",
    "little",
    "marginally",
    "occasionally",
    "partly",
    "scarcely",
    "slightly",
    "somewhat",
    "sorta",
    "sortof",
    "sort-of",
];

const CONTRASTIVE: &[&str] = &["but", "however"];

/// Text → sentiment capability. Implementations must be deterministic and
/// safe to call from many threads at once.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentProfile;
}

/// Lexicon-driven scorer. Holds nothing but a shared, immutable lexicon.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Arc<Lexicon>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

/// A scored span: one lexicon token or a whole idiom.
struct Span {
    start: usize,
    end: usize,
    base: f64,
}

impl LexiconScorer {
    #[must_use]
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Split on whitespace and strip surrounding punctuation, except for
    /// tokens the lexicon knows verbatim (emoticons). Single characters are dropped.
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        text.split_whitespace()
            .map(|raw| {
                if self.lexicon.contains(raw) {
                    raw
                } else {
                    raw.trim_matches(|c: char| c.is_ascii_punctuation())
                }
            })
            .filter(|t| t.chars().count() > 1)
            .collect()
    }

    /// Group tokens into scored spans, preferring the longest idiom match.
    fn spans(&self, tokens: &[&str], lowered: &[String]) -> Vec<Span> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if let Some((len, base)) = self.idiom_at(lowered, i) {
                spans.push(Span {
                    start: i,
                    end: i + len - 1,
                    base,
                });
                i += len;
                continue;
            }
            let word = lowered[i].as_str();
            let hedge = word == "kind" && lowered.get(i + 1).is_some_and(|n| n == "of");
            // "no" directly before a scored word only negates it.
            let bare_no = word == "no"
                && lowered
                    .get(i + 1)
                    .is_some_and(|n| self.lexicon.contains(n));
            if !hedge && !bare_no && modifier_step(word).is_none() {
                if let Some(base) = self.lexicon.valence(tokens[i]) {
                    spans.push(Span {
                        start: i,
                        end: i,
                        base,
                    });
                }
            }
            i += 1;
        }
        spans
    }

    fn idiom_at(&self, lowered: &[String], start: usize) -> Option<(usize, f64)> {
        let longest = self.lexicon.max_idiom_len().min(lowered.len() - start);
        (2..=longest).rev().find_map(|len| {
            let phrase = lowered[start..start + len].join(" ");
            self.lexicon.idiom(&phrase).map(|v| (len, v))
        })
    }

    /// Apply shouting, degree words, negation and "least" to one span.
    fn adjusted_valence(
        &self,
        span: &Span,
        tokens: &[&str],
        lowered: &[String],
        caps_differ: bool,
    ) -> f64 {
        let mut valence = span.base;
        if caps_differ && span.start == span.end && is_shouting(tokens[span.start]) {
            valence += CAPS_BOOST.copysign(valence);
        }
        if preceded_by_no(lowered, span.start) {
            valence = span.base * NEGATION_SCALAR;
        }

        for distance in 1..=MODIFIER_WINDOW.min(span.start) {
            let j = span.start - distance;
            if self.lexicon.contains(&lowered[j]) {
                continue;
            }
            let mut step = modifier_adjustment(lowered, j, tokens[j], valence, caps_differ);
            match distance {
                2 => step *= 0.95,
                3 => step *= 0.9,
                _ => {}
            }
            valence += step;
            valence = negation_check(valence, lowered, span.start, distance);
        }

        least_check(valence, lowered, span.start)
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentProfile {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return SentimentProfile::NEUTRAL;
        }
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let shouted = tokens.iter().filter(|t| is_shouting(t)).count();
        let caps_differ = shouted > 0 && shouted < tokens.len();

        let mut valences = vec![0.0_f64; tokens.len()];
        for span in self.spans(&tokens, &lowered) {
            valences[span.end] = self.adjusted_valence(&span, &tokens, &lowered, caps_differ);
        }
        apply_contrast(&lowered, &mut valences);

        profile_from(&valences, punctuation_emphasis(text))
    }
}

fn is_shouting(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't") || word.contains("n\u{2019}t")
}

/// "no" one or two tokens back, or three back across "or"/"nor".
fn preceded_by_no(lowered: &[String], start: usize) -> bool {
    let at = |d: usize| start.checked_sub(d).map(|j| lowered[j].as_str());
    at(1) == Some("no")
        || at(2) == Some("no")
        || (at(3) == Some("no") && matches!(at(1), Some("or" | "nor")))
}

fn modifier_step(word: &str) -> Option<f64> {
    if INTENSIFIERS.contains(&word) {
        Some(BOOSTER_STEP)
    } else if DAMPENERS.contains(&word) {
        Some(-BOOSTER_STEP)
    } else {
        None
    }
}

/// Degree step of the token at `j`, treating "kind of" / "sort of" as dampeners.
fn degree_step(lowered: &[String], j: usize) -> Option<f64> {
    let hedge = lowered[j] == "of" && j > 0 && matches!(lowered[j - 1].as_str(), "kind" | "sort");
    if hedge {
        Some(-BOOSTER_STEP)
    } else {
        modifier_step(&lowered[j])
    }
}

/// Degree-word contribution of the token at `j` to a following valence,
/// signed to push away from (intensifier) or toward (dampener) zero.
fn modifier_adjustment(
    lowered: &[String],
    j: usize,
    raw: &str,
    valence: f64,
    caps_differ: bool,
) -> f64 {
    let Some(mut step) = degree_step(lowered, j) else {
        return 0.0;
    };
    if valence < 0.0 {
        step = -step;
    }
    if caps_differ && is_shouting(raw) {
        step += if valence > 0.0 { CAPS_BOOST } else { -CAPS_BOOST };
    }
    step
}

fn negation_check(valence: f64, lowered: &[String], start: usize, distance: usize) -> f64 {
    let before = |d: usize| lowered[start - d].as_str();
    let emphatic = |w: &str| w == "so" || w == "this";
    match distance {
        1 if is_negation(before(1)) => valence * NEGATION_SCALAR,
        2 if before(2) == "never" && emphatic(before(1)) => valence * 1.25,
        2 if is_negation(before(2)) => valence * NEGATION_SCALAR,
        3 if before(3) == "never" && (emphatic(before(2)) || emphatic(before(1))) => {
            valence * 1.25
        }
        3 if is_negation(before(3)) => valence * NEGATION_SCALAR,
        _ => valence,
    }
}

/// "least good" flips polarity; "at least" and "very least" do not.
fn least_check(valence: f64, lowered: &[String], start: usize) -> f64 {
    if start == 0 || lowered[start - 1] != "least" {
        return valence;
    }
    let qualified = start >= 2 && matches!(lowered[start - 2].as_str(), "at" | "very");
    if qualified {
        valence
    } else {
        valence * NEGATION_SCALAR
    }
}

/// Down-weight everything before the first contrastive conjunction and
/// up-weight everything after it.
fn apply_contrast(lowered: &[String], valences: &mut [f64]) {
    let Some(pivot) = lowered
        .iter()
        .position(|w| CONTRASTIVE.contains(&w.as_str()))
    else {
        return;
    };
    for (i, v) in valences.iter_mut().enumerate() {
        if i < pivot {
            *v *= BEFORE_CONTRAST;
        } else if i > pivot {
            *v *= AFTER_CONTRAST;
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn punctuation_emphasis(text: &str) -> f64 {
    let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f64 * QUESTION_STEP,
        _ => QUESTION_CAP,
    };
    bangs as f64 * EXCLAMATION_STEP + question_emphasis
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn profile_from(valences: &[f64], emphasis: f64) -> SentimentProfile {
    let mut sum: f64 = valences.iter().sum();
    if sum > 0.0 {
        sum += emphasis;
    } else if sum < 0.0 {
        sum -= emphasis;
    }
    // `+ 0.0` folds a rounded -0.0 into 0.0.
    let compound = (normalize(sum) * 10_000.0).round() / 10_000.0 + 0.0;

    let mut pos_sum = 0.0;
    let mut neg_sum = 0.0;
    let mut neutral_count = 0.0;
    for &v in valences {
        if v > 0.0 {
            pos_sum += v + 1.0;
        } else if v < 0.0 {
            neg_sum += v - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neutral_count;
    if total <= 0.0 {
        return SentimentProfile::NEUTRAL;
    }
    SentimentProfile {
        negative: neg_sum.abs() / total,
        neutral: neutral_count / total,
        positive: pos_sum / total,
        compound,
    }
}
