//! Emotion classification
//!
//! Turns free text into a mood label, a confidence score and a signed
//! intensity signal. Includes:
//! - Stemmed, weighted keyword scoring over a closed category set
//! - Pluggable base sentiment scoring (embedded AFINN-style lexicon)
//! - Tiered intensity and distress detection
//! - History insights, growth metrics and writing prompts

pub mod classifier;
pub mod insights;
pub mod intensity;
pub mod lexicon;
pub mod sentiment;
mod stem;
pub mod types;

pub use classifier::EmotionClassifier;
pub use insights::{
    growth_metrics, growth_score, insights, writing_prompt, EmotionSample, GrowthMetrics, Insight,
    InsightKind, MonthlyAverage,
};
pub use sentiment::{LexiconScorer, SentimentAnalysis, SentimentScorer};
pub use types::{EmotionCategory, EmotionResult, Mood};
