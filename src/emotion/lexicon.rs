//! Built-in emotion vocabulary
//!
//! Keywords are written in their natural form; the classifier stems them
//! once at construction. Multi-word entries are matched as consecutive
//! tokens.

use super::types::EmotionCategory;

/// A weighted keyword (or phrase) for one category
pub type WeightedKeyword = (&'static str, u32);

/// Weighted keywords for a category
pub fn keywords(category: EmotionCategory) -> &'static [WeightedKeyword] {
    match category {
        EmotionCategory::Joy => JOY,
        EmotionCategory::Sadness => SADNESS,
        EmotionCategory::Anger => ANGER,
        EmotionCategory::Fear => FEAR,
        EmotionCategory::Love => LOVE,
        EmotionCategory::Hope => HOPE,
        EmotionCategory::Calm => CALM,
        EmotionCategory::Gratitude => GRATITUDE,
        EmotionCategory::Confidence => CONFIDENCE,
    }
}

const JOY: &[WeightedKeyword] = &[
    ("happy", 2),
    ("joy", 3),
    ("joyful", 3),
    ("excited", 2),
    ("delighted", 3),
    ("cheerful", 2),
    ("pleased", 2),
    ("glad", 2),
    ("thrilled", 3),
    ("elated", 3),
    ("smile", 1),
    ("laugh", 1),
    ("fun", 1),
    ("wonderful", 2),
    ("amazing", 2),
];

const SADNESS: &[WeightedKeyword] = &[
    ("sad", 2),
    ("depressed", 3),
    ("unhappy", 2),
    ("miserable", 3),
    ("gloomy", 2),
    ("down", 1),
    ("cry", 2),
    ("tears", 2),
    ("lonely", 2),
    ("heartbroken", 3),
    ("grief", 3),
    ("hopeless", 3),
    ("hurt", 2),
    ("alone", 1),
    ("empty", 1),
];

const ANGER: &[WeightedKeyword] = &[
    ("angry", 3),
    ("furious", 3),
    ("annoyed", 2),
    ("irritated", 2),
    ("frustrated", 2),
    ("mad", 2),
    ("rage", 3),
    ("hate", 3),
    ("resent", 2),
    ("bitter", 2),
    ("outraged", 3),
];

const FEAR: &[WeightedKeyword] = &[
    ("afraid", 2),
    ("scared", 2),
    ("anxious", 2),
    ("worried", 2),
    ("nervous", 2),
    ("terrified", 3),
    ("panic", 3),
    ("dread", 2),
    ("fear", 2),
    ("overwhelmed", 2),
    ("stressed", 2),
];

const LOVE: &[WeightedKeyword] = &[
    ("love", 3),
    ("adore", 3),
    ("cherish", 2),
    ("affection", 2),
    ("fond", 1),
    ("caring", 1),
    ("warmth", 1),
    ("beloved", 2),
];

const HOPE: &[WeightedKeyword] = &[
    ("hope", 2),
    ("hopeful", 3),
    ("optimistic", 3),
    ("positive", 1),
    ("looking forward", 3),
    ("excited", 1),
    ("dream", 1),
    ("someday", 1),
    ("wish", 1),
    ("believe", 1),
];

const CALM: &[WeightedKeyword] = &[
    ("calm", 2),
    ("peaceful", 3),
    ("relaxed", 2),
    ("serene", 3),
    ("tranquil", 3),
    ("content", 2),
    ("rested", 1),
    ("quiet", 1),
    ("balanced", 1),
];

const GRATITUDE: &[WeightedKeyword] = &[
    ("thankful", 3),
    ("grateful", 3),
    ("gratitude", 3),
    ("appreciate", 2),
    ("blessed", 2),
    ("thanks", 2),
];

const CONFIDENCE: &[WeightedKeyword] = &[
    ("confident", 3),
    ("proud", 3),
    ("strong", 2),
    ("capable", 2),
    ("determined", 2),
    ("brave", 2),
    ("accomplished", 2),
    ("courage", 2),
    ("unstoppable", 3),
    ("achieve", 2),
];

/// Words that override a below-threshold neutral fallback with a positive mood
pub const POSITIVE_OVERRIDE: &[&str] = &["love", "grateful", "thankful", "happy", "proud", "blessed"];

/// Hedging vocabulary; caps confidence when present
pub const HEDGES: &[&str] = &[
    "maybe",
    "perhaps",
    "possibly",
    "probably",
    "might",
    "not sure",
    "unsure",
    "i guess",
    "i think",
    "i suppose",
];

/// Strong intensifiers
pub const INTENSITY_HIGH: &[&str] = &[
    "extremely",
    "incredibly",
    "absolutely",
    "completely",
    "totally",
    "utterly",
    "deeply",
    "intensely",
    "overwhelmingly",
    "so much",
];

/// Moderate intensifiers
pub const INTENSITY_MEDIUM: &[&str] = &["very", "really", "quite", "truly", "so", "super"];

/// Softeners
pub const INTENSITY_LOW: &[&str] = &[
    "slightly",
    "somewhat",
    "mildly",
    "barely",
    "a bit",
    "a little",
    "kind of",
    "sort of",
];

/// Phrasing that signals acute distress regardless of the detected mood
pub const DISTRESS: &[&str] = &[
    "can't take it",
    "cannot take it",
    "can't go on",
    "cannot go on",
    "give up",
    "giving up",
    "want to die",
    "falling apart",
    "breaking down",
    "hate myself",
    "no way out",
    "can't breathe",
    "worthless",
    "hopeless",
];
