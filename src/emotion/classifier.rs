//! Emotion classifier for letters and diary entries

use super::intensity::{blend, IntensityScanner, IntensityTier};
use super::lexicon;
use super::sentiment::{LexiconScorer, SentimentAnalysis, SentimentScorer};
use super::stem::stem;
use super::types::{EmotionCategory, EmotionResult, Mood};
use crate::config::ClassifierConfig;
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Confidence cap applied when the writer hedges
const HEDGED_CONFIDENCE_CAP: u8 = 40;

/// Sentiment magnitude beyond which confidence stops growing
const SENTIMENT_CONFIDENCE_CAP: i32 = 5;

/// Deterministic text → emotion classifier
pub struct EmotionClassifier {
    tokenizer: Regex,
    categories: Vec<CompiledCategory>,
    positive_override: Vec<Vec<String>>,
    hedges: Vec<Vec<String>>,
    intensity: IntensityScanner,
    scorer: Arc<dyn SentimentScorer>,
    neutral_threshold: f64,
}

struct CompiledCategory {
    category: EmotionCategory,
    terms: Vec<CompiledTerm>,
}

struct CompiledTerm {
    root: Vec<String>,
    weight: u32,
}

impl EmotionClassifier {
    /// Create a classifier with the built-in lexicon and sentiment scorer
    pub fn new(config: &ClassifierConfig) -> Result<Self> {
        Self::with_scorer(config, Arc::new(LexiconScorer::new()))
    }

    /// Create a classifier with a custom base sentiment scorer.
    ///
    /// Fails if the keyword tables do not validate.
    pub fn with_scorer(config: &ClassifierConfig, scorer: Arc<dyn SentimentScorer>) -> Result<Self> {
        let tokenizer = Regex::new(r"\w+(?:'\w+)*")
            .map_err(|e| Error::Config(format!("Invalid tokenizer pattern: {}", e)))?;

        let mut classifier = Self {
            tokenizer,
            categories: Vec::new(),
            positive_override: Vec::new(),
            hedges: Vec::new(),
            intensity: IntensityScanner::new(Vec::new()),
            scorer,
            neutral_threshold: config.neutral_threshold,
        };

        classifier.categories = EmotionCategory::ALL
            .iter()
            .map(|category| classifier.compile_category(*category))
            .collect::<Result<Vec<_>>>()?;
        classifier.positive_override = classifier.compile_phrases(lexicon::POSITIVE_OVERRIDE);
        classifier.hedges = classifier.compile_phrases(lexicon::HEDGES);

        let tiers = [
            (lexicon::INTENSITY_HIGH, IntensityTier::High),
            (lexicon::INTENSITY_MEDIUM, IntensityTier::Medium),
            (lexicon::INTENSITY_LOW, IntensityTier::Low),
            (lexicon::DISTRESS, IntensityTier::Distress),
        ];
        let phrases = tiers
            .iter()
            .flat_map(|(words, tier)| {
                classifier
                    .compile_phrases(words)
                    .into_iter()
                    .map(move |p| (p, *tier))
            })
            .collect();
        classifier.intensity = IntensityScanner::new(phrases);

        tracing::debug!(
            scorer = classifier.scorer.name(),
            categories = classifier.categories.len(),
            "Emotion classifier ready"
        );
        Ok(classifier)
    }

    fn compile_category(&self, category: EmotionCategory) -> Result<CompiledCategory> {
        let mut seen = HashSet::new();
        let mut terms = Vec::new();

        for (keyword, weight) in lexicon::keywords(category) {
            if *weight == 0 {
                return Err(Error::Config(format!(
                    "Keyword '{}' in category '{}' has zero weight",
                    keyword, category
                )));
            }
            let root = self.normalize(keyword);
            if root.is_empty() {
                return Err(Error::Config(format!(
                    "Keyword '{}' in category '{}' normalizes to nothing",
                    keyword, category
                )));
            }
            if !seen.insert(root.clone()) {
                return Err(Error::Config(format!(
                    "Keyword '{}' in category '{}' duplicates another root",
                    keyword, category
                )));
            }
            terms.push(CompiledTerm {
                root,
                weight: *weight,
            });
        }

        if terms.is_empty() {
            return Err(Error::Config(format!("Category '{}' has no keywords", category)));
        }
        Ok(CompiledCategory { category, terms })
    }

    fn compile_phrases(&self, phrases: &[&str]) -> Vec<Vec<String>> {
        phrases
            .iter()
            .map(|p| self.normalize(p))
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Lowercase, tokenize and stem
    pub fn normalize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase().replace('\u{2019}', "'");
        self.tokenizer
            .find_iter(&lower)
            .map(|m| stem(m.as_str()))
            .collect()
    }

    /// Classify a piece of text. Never fails; text without signal is neutral.
    pub fn classify(&self, text: &str) -> EmotionResult {
        let tokens = self.normalize(text);
        if tokens.is_empty() {
            return EmotionResult::neutral();
        }

        let raw: BTreeMap<EmotionCategory, u32> = self
            .categories
            .iter()
            .map(|c| {
                let score: u32 = c
                    .terms
                    .iter()
                    .map(|t| t.weight * count_phrase(&tokens, &t.root) as u32)
                    .sum();
                (c.category, score)
            })
            .collect();
        let total: u32 = raw.values().sum();
        let breakdown = apportion(&raw, total);

        let top = top_category(&breakdown);
        let top_pct = top.map_or(0, |(_, pct)| pct);
        let mood = match top {
            Some((category, pct)) if f64::from(pct) >= self.neutral_threshold => Mood::from(category),
            _ if self.contains_any(&tokens, &self.positive_override) => {
                Mood::from(top_positive(&breakdown).unwrap_or(EmotionCategory::Joy))
            }
            _ => Mood::Neutral,
        };

        let sentiment = self.scorer.score(text);
        let reading = self.intensity.scan(&tokens);
        let intensity = blend(&reading, mood.is_negative(), sentiment.score);

        let hedged = self.contains_any(&tokens, &self.hedges);
        let confidence = confidence(sentiment.score, total, top_pct, hedged);

        EmotionResult {
            mood,
            confidence,
            sentiment_score: sentiment.score,
            intensity,
            breakdown,
        }
    }

    /// Base sentiment analysis for the text (scores plus contributing words)
    pub fn sentiment(&self, text: &str) -> SentimentAnalysis {
        self.scorer.score(text)
    }

    fn contains_any(&self, tokens: &[String], phrases: &[Vec<String>]) -> bool {
        phrases.iter().any(|p| count_phrase(tokens, p) > 0)
    }
}

/// Occurrences of a phrase as consecutive tokens
fn count_phrase(tokens: &[String], phrase: &[String]) -> usize {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return 0;
    }
    tokens.windows(phrase.len()).filter(|w| *w == phrase).count()
}

/// Integer percentages that sum to exactly 100 (largest remainder), or all
/// zero when nothing scored. Each entry is within one point of
/// `round(raw / total * 100)`.
fn apportion(raw: &BTreeMap<EmotionCategory, u32>, total: u32) -> BTreeMap<EmotionCategory, u8> {
    if total == 0 {
        return raw.keys().map(|c| (*c, 0)).collect();
    }

    let mut shares: Vec<(EmotionCategory, u32, u32)> = raw
        .iter()
        .map(|(c, score)| {
            let scaled = score * 100;
            (*c, scaled / total, scaled % total)
        })
        .collect();

    let assigned: u32 = shares.iter().map(|(_, floor, _)| floor).sum();
    let mut remaining = 100 - assigned;

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|a, b| shares[*b].2.cmp(&shares[*a].2).then(a.cmp(b)));
    for idx in order {
        if remaining == 0 {
            break;
        }
        if shares[idx].2 > 0 {
            shares[idx].1 += 1;
            remaining -= 1;
        }
    }

    shares
        .into_iter()
        .map(|(c, pct, _)| (c, pct as u8))
        .collect()
}

/// Highest-percentage category; ties go to the earlier category
fn top_category(breakdown: &BTreeMap<EmotionCategory, u8>) -> Option<(EmotionCategory, u8)> {
    breakdown
        .iter()
        .filter(|(_, pct)| **pct > 0)
        .fold(None, |best: Option<(EmotionCategory, u8)>, (c, pct)| match best {
            Some((_, best_pct)) if best_pct >= *pct => best,
            _ => Some((*c, *pct)),
        })
}

fn top_positive(breakdown: &BTreeMap<EmotionCategory, u8>) -> Option<EmotionCategory> {
    let positive: BTreeMap<EmotionCategory, u8> = breakdown
        .iter()
        .filter(|(c, _)| !c.is_negative())
        .map(|(c, p)| (*c, *p))
        .collect();
    top_category(&positive).map(|(c, _)| c)
}

fn confidence(sentiment_score: i32, total_raw: u32, top_pct: u8, hedged: bool) -> u8 {
    let sentiment_part = i64::from(sentiment_score.abs().min(SENTIMENT_CONFIDENCE_CAP)) * 50;
    let keyword_part = i64::from(total_raw) * 10;
    let mut confidence = (sentiment_part + keyword_part).clamp(0, 100);

    if top_pct > 50 {
        confidence = (confidence + 10).min(100);
    }
    if hedged {
        confidence = confidence.min(i64::from(HEDGED_CONFIDENCE_CAP));
    }
    confidence as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_classifier() -> EmotionClassifier {
        EmotionClassifier::new(&ClassifierConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let classifier = create_test_classifier();
        for text in ["", "   \n\t", "...!?"] {
            let result = classifier.classify(text);
            assert_eq!(result.mood, Mood::Neutral);
            assert_eq!(result.confidence, 0);
            assert_eq!(result.intensity, 0.0);
            assert!(result.breakdown.values().all(|p| *p == 0));
            assert_eq!(result.breakdown.len(), EmotionCategory::ALL.len());
        }
    }

    #[test]
    fn test_no_signal_text() {
        let classifier = create_test_classifier();
        let result = classifier.classify("The meeting moved to the third floor.");
        assert_eq!(result.mood, Mood::Neutral);
        assert!(!result.has_signal());
        assert_eq!(result.confidence, 0);
    }

    #[test]
    fn test_repeated_negative_keywords() {
        let classifier = create_test_classifier();
        for text in [
            "miserable miserable miserable",
            "furious furious",
            "terrified terrified terrified terrified",
            "heartbroken, heartbroken and hopeless",
        ] {
            let result = classifier.classify(text);
            assert!(result.mood.is_negative(), "{}: {:?}", text, result.mood);
            assert!(result.intensity < 0.0, "{}: {}", text, result.intensity);
        }
    }

    #[test]
    fn test_inflected_forms_match() {
        let classifier = create_test_classifier();
        let result = classifier.classify("I have been worrying and I worried all week");
        assert_eq!(result.mood, Mood::Fear);
        assert_eq!(result.breakdown[&EmotionCategory::Fear], 100);
    }

    #[test]
    fn test_breakdown_sums_to_100() {
        let classifier = create_test_classifier();
        let result = classifier.classify("happy sad calm");
        let sum: u32 = result.breakdown.values().map(|p| u32::from(*p)).sum();
        assert_eq!(sum, 100);
    }

    #[test]
    fn test_phrase_keyword() {
        let classifier = create_test_classifier();
        let result = classifier.classify("Looking forward to next summer");
        assert_eq!(result.mood, Mood::Hope);
    }

    #[test]
    fn test_below_threshold_falls_back_to_neutral() {
        let classifier = create_test_classifier();
        // joy 2, sadness 2, anger 3 (hate), fear 2 -> anger 34%
        let result = classifier.classify("glad sad hate afraid");
        assert!(result.breakdown.values().all(|p| *p < 35));
        assert_eq!(result.mood, Mood::Neutral);
    }

    #[test]
    fn test_positive_override_below_threshold() {
        let classifier = create_test_classifier();
        // love 3, sadness 2 (sad), anger 3 (hate), fear 2 (afraid) -> love 30%
        let result = classifier.classify("love sad hate afraid");
        assert!(result.breakdown[&EmotionCategory::Love] < 35);
        assert_eq!(result.mood, Mood::Love);
    }

    #[test]
    fn test_confidence_formula() {
        let classifier = create_test_classifier();
        // happy: sentiment 3 -> 150, clamped to 100
        let result = classifier.classify("happy");
        assert_eq!(result.confidence, 100);

        // "content" carries no lexicon polarity: 2 * 10 = 20, +10 for 100% top share
        let result = classifier.classify("content");
        assert_eq!(result.sentiment_score, 0);
        assert_eq!(result.confidence, 30);
    }

    #[test]
    fn test_hedging_caps_confidence() {
        let classifier = create_test_classifier();
        let result = classifier.classify("Maybe I am happy, I'm not sure");
        assert_eq!(result.mood, Mood::Joy);
        assert!(result.confidence <= 40);
    }

    #[test]
    fn test_intensifier_raises_magnitude() {
        let classifier = create_test_classifier();
        let plain = classifier.classify("I am sad");
        let intense = classifier.classify("I am extremely sad");
        assert!(intense.intensity < plain.intensity);
        assert!(intense.intensity >= -1.0);
    }

    #[test]
    fn test_distress_phrase_is_negative() {
        let classifier = create_test_classifier();
        let result = classifier.classify("Some days I just want to give up");
        assert!(result.intensity < 0.0);
    }

    #[test]
    fn test_positive_intensity() {
        let classifier = create_test_classifier();
        let result = classifier.classify("I am so grateful and truly thankful");
        assert_eq!(result.mood, Mood::Gratitude);
        assert!(result.intensity > 0.0);
    }

    #[test]
    fn test_negation_is_not_handled() {
        // "not happy" still scores toward joy; negation is out of scope
        let classifier = create_test_classifier();
        let result = classifier.classify("I am not happy");
        assert_eq!(result.mood, Mood::Joy);
    }

    #[test]
    fn test_deterministic() {
        let classifier = create_test_classifier();
        let text = "Grateful for friends, a bit anxious about tomorrow.";
        assert_eq!(classifier.classify(text), classifier.classify(text));
    }

    #[test]
    fn test_custom_scorer() {
        struct FixedScorer;
        impl SentimentScorer for FixedScorer {
            fn score(&self, _text: &str) -> SentimentAnalysis {
                SentimentAnalysis {
                    score: -4,
                    ..Default::default()
                }
            }
            fn name(&self) -> &str {
                "fixed"
            }
        }

        let classifier =
            EmotionClassifier::with_scorer(&ClassifierConfig::default(), Arc::new(FixedScorer))
                .unwrap();
        let result = classifier.classify("calm");
        assert_eq!(result.sentiment_score, -4);
        assert_eq!(result.mood, Mood::Calm);
    }

    #[test]
    fn test_apportion_exact_thirds() {
        let raw: BTreeMap<_, _> = [
            (EmotionCategory::Joy, 1),
            (EmotionCategory::Sadness, 1),
            (EmotionCategory::Calm, 1),
        ]
        .into_iter()
        .collect();
        let pct = apportion(&raw, 3);
        assert_eq!(pct.values().map(|p| u32::from(*p)).sum::<u32>(), 100);
        assert_eq!(pct[&EmotionCategory::Joy], 34);
        assert_eq!(pct[&EmotionCategory::Sadness], 33);
    }
}
