//! General-purpose lexicon sentiment scoring
//!
//! The classifier treats the base sentiment score as an external
//! collaborator behind [`SentimentScorer`]. [`LexiconScorer`] is the default
//! implementation: an AFINN-style word list with polarities in [-5, 5],
//! summed over every matching token.

use std::collections::HashMap;

/// Output of a sentiment scorer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentimentAnalysis {
    /// Sum of per-word polarities
    pub score: i32,
    /// Words that contributed positively, in text order
    pub positive: Vec<String>,
    /// Words that contributed negatively, in text order
    pub negative: Vec<String>,
}

/// Pluggable base sentiment scorer.
///
/// Implementations must be deterministic; the classifier's output is
/// required to be a pure function of its input.
pub trait SentimentScorer: Send + Sync {
    /// Score a piece of raw text
    fn score(&self, text: &str) -> SentimentAnalysis;

    /// Human-readable name for this scorer (used in logs)
    fn name(&self) -> &str;
}

/// Word-list scorer backed by an embedded AFINN-style lexicon
pub struct LexiconScorer {
    words: HashMap<&'static str, i32>,
}

impl LexiconScorer {
    /// Create a scorer with the built-in lexicon
    pub fn new() -> Self {
        Self {
            words: AFINN.iter().copied().collect(),
        }
    }

    /// Polarity of a single lowercase word, if known
    pub fn polarity(&self, word: &str) -> Option<i32> {
        self.words.get(word).copied()
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentAnalysis {
        let lower = text.to_lowercase();
        let mut analysis = SentimentAnalysis::default();

        for token in lower
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty())
        {
            let Some(polarity) = self.polarity(token) else {
                continue;
            };
            analysis.score += polarity;
            if polarity > 0 {
                analysis.positive.push(token.to_string());
            } else if polarity < 0 {
                analysis.negative.push(token.to_string());
            }
        }

        analysis
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

const AFINN: &[(&str, i32)] = &[
    ("abandoned", -2),
    ("accomplished", 2),
    ("achieve", 2),
    ("adore", 3),
    ("affection", 3),
    ("afraid", -2),
    ("agony", -3),
    ("alone", -2),
    ("amazing", 4),
    ("anger", -3),
    ("angry", -3),
    ("annoyed", -2),
    ("anxious", -2),
    ("appreciate", 2),
    ("appreciated", 2),
    ("ashamed", -2),
    ("awesome", 4),
    ("awful", -3),
    ("bad", -3),
    ("beautiful", 3),
    ("believe", 1),
    ("beloved", 3),
    ("best", 3),
    ("better", 2),
    ("bitter", -2),
    ("blessed", 2),
    ("bored", -2),
    ("brave", 2),
    ("broken", -1),
    ("calm", 2),
    ("capable", 1),
    ("care", 2),
    ("caring", 2),
    ("cheerful", 2),
    ("cherish", 2),
    ("comfort", 2),
    ("confident", 2),
    ("courage", 2),
    ("cried", -2),
    ("cry", -1),
    ("crying", -2),
    ("delighted", 3),
    ("depressed", -2),
    ("despair", -3),
    ("determined", 2),
    ("devastated", -2),
    ("disappointed", -2),
    ("down", -1),
    ("dread", -2),
    ("dream", 1),
    ("elated", 3),
    ("empty", -1),
    ("excited", 3),
    ("exhausted", -2),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("fear", -2),
    ("fearful", -2),
    ("fine", 2),
    ("fond", 2),
    ("frustrated", -2),
    ("fun", 4),
    ("furious", -3),
    ("glad", 3),
    ("gloomy", -2),
    ("good", 3),
    ("grateful", 3),
    ("gratitude", 3),
    ("great", 3),
    ("grief", -2),
    ("guilty", -3),
    ("happy", 3),
    ("hate", -3),
    ("hated", -3),
    ("heartbroken", -3),
    ("hope", 2),
    ("hopeful", 2),
    ("hopeless", -2),
    ("hurt", -2),
    ("inspired", 2),
    ("irritated", -3),
    ("joy", 3),
    ("joyful", 3),
    ("laugh", 1),
    ("lonely", -2),
    ("lost", -3),
    ("love", 3),
    ("loved", 3),
    ("lovely", 3),
    ("mad", -3),
    ("miserable", -3),
    ("nervous", -2),
    ("optimistic", 2),
    ("outraged", -3),
    ("overwhelmed", -2),
    ("pain", -2),
    ("panic", -3),
    ("peaceful", 2),
    ("pleased", 3),
    ("positive", 2),
    ("proud", 2),
    ("rage", -2),
    ("relaxed", 2),
    ("resent", -2),
    ("sad", -2),
    ("scared", -2),
    ("serene", 2),
    ("smile", 2),
    ("sorry", -1),
    ("strong", 2),
    ("stressed", -2),
    ("succeed", 3),
    ("success", 2),
    ("tears", -2),
    ("terrible", -3),
    ("terrified", -3),
    ("thank", 2),
    ("thankful", 2),
    ("thanks", 2),
    ("thrilled", 5),
    ("tired", -2),
    ("tranquil", 2),
    ("unhappy", -2),
    ("unstoppable", 2),
    ("upset", -2),
    ("win", 4),
    ("wonderful", 4),
    ("worried", -3),
    ("worry", -3),
    ("worthless", -2),
    ("wrong", -2),
];
