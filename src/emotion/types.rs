//! Emotion classification data types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Closed set of emotion categories the classifier scores.
///
/// Declaration order is the tie-break order when two categories share the
/// top percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Joy,
    Sadness,
    Anger,
    Fear,
    Love,
    Hope,
    Calm,
    Gratitude,
    Confidence,
}

impl EmotionCategory {
    /// Every category, in tie-break order
    pub const ALL: [EmotionCategory; 9] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Fear,
        Self::Love,
        Self::Hope,
        Self::Calm,
        Self::Gratitude,
        Self::Confidence,
    ];

    /// Whether this category carries distress valence
    pub fn is_negative(self) -> bool {
        matches!(self, Self::Sadness | Self::Anger | Self::Fear)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Love => "love",
            Self::Hope => "hope",
            Self::Calm => "calm",
            Self::Gratitude => "gratitude",
            Self::Confidence => "confidence",
        }
    }
}

impl std::fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary mood label attached to a piece of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Neutral,
    Joy,
    Sadness,
    Anger,
    Fear,
    Love,
    Hope,
    Calm,
    Gratitude,
    Confidence,
}

impl Mood {
    /// Category behind this mood, `None` for neutral
    pub fn category(self) -> Option<EmotionCategory> {
        match self {
            Self::Neutral => None,
            Self::Joy => Some(EmotionCategory::Joy),
            Self::Sadness => Some(EmotionCategory::Sadness),
            Self::Anger => Some(EmotionCategory::Anger),
            Self::Fear => Some(EmotionCategory::Fear),
            Self::Love => Some(EmotionCategory::Love),
            Self::Hope => Some(EmotionCategory::Hope),
            Self::Calm => Some(EmotionCategory::Calm),
            Self::Gratitude => Some(EmotionCategory::Gratitude),
            Self::Confidence => Some(EmotionCategory::Confidence),
        }
    }

    pub fn is_negative(self) -> bool {
        self.category().is_some_and(EmotionCategory::is_negative)
    }

    pub fn as_str(self) -> &'static str {
        self.category().map_or("neutral", EmotionCategory::as_str)
    }
}

impl From<EmotionCategory> for Mood {
    fn from(category: EmotionCategory) -> Self {
        match category {
            EmotionCategory::Joy => Self::Joy,
            EmotionCategory::Sadness => Self::Sadness,
            EmotionCategory::Anger => Self::Anger,
            EmotionCategory::Fear => Self::Fear,
            EmotionCategory::Love => Self::Love,
            EmotionCategory::Hope => Self::Hope,
            EmotionCategory::Calm => Self::Calm,
            EmotionCategory::Gratitude => Self::Gratitude,
            EmotionCategory::Confidence => Self::Confidence,
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        if lower == "neutral" {
            return Ok(Self::Neutral);
        }
        EmotionCategory::ALL
            .iter()
            .find(|c| c.as_str() == lower)
            .map(|c| Mood::from(*c))
            .ok_or_else(|| format!("unknown mood: {}", s))
    }
}

/// Structured output of the emotion classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionResult {
    /// Primary mood
    pub mood: Mood,
    /// Confidence in the mood label, 0–100
    pub confidence: u8,
    /// Signed score from the general lexicon scorer
    pub sentiment_score: i32,
    /// Signed emotional strength in [-1, 1]
    pub intensity: f64,
    /// Percent per category; sums to 100, or all zero without signal
    pub breakdown: BTreeMap<EmotionCategory, u8>,
}

impl EmotionResult {
    /// Result for text that carries no emotional signal
    pub fn neutral() -> Self {
        Self {
            mood: Mood::Neutral,
            confidence: 0,
            sentiment_score: 0,
            intensity: 0.0,
            breakdown: EmotionCategory::ALL.iter().map(|c| (*c, 0)).collect(),
        }
    }

    /// Whether any category was detected
    pub fn has_signal(&self) -> bool {
        self.breakdown.values().any(|p| *p > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_set() {
        let negative: Vec<_> = EmotionCategory::ALL
            .iter()
            .filter(|c| c.is_negative())
            .collect();
        assert_eq!(negative.len(), 3);
        assert!(Mood::Fear.is_negative());
        assert!(!Mood::Neutral.is_negative());
        assert!(!Mood::Calm.is_negative());
    }

    #[test]
    fn test_mood_parse() {
        assert_eq!("Gratitude".parse::<Mood>().unwrap(), Mood::Gratitude);
        assert_eq!("neutral".parse::<Mood>().unwrap(), Mood::Neutral);
        assert!("lonely".parse::<Mood>().is_err());
    }

    #[test]
    fn test_result_serialization() {
        let result = EmotionResult::neutral();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["mood"], "neutral");
        assert_eq!(json["sentimentScore"], 0);
        assert_eq!(json["breakdown"]["joy"], 0);
        assert_eq!(json["breakdown"].as_object().unwrap().len(), 9);

        let parsed: EmotionResult = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, result);
        assert!(!parsed.has_signal());
    }
}
