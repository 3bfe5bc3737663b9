//! Reflection insights over a writer's history
//!
//! Everything here works on [`EmotionSample`]s, which are cheap projections
//! of decrypted entries. Callers decrypt, score and hand over samples; this
//! module never touches storage.

use super::sentiment::SentimentAnalysis;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of most recent samples used for the trend
const TREND_WINDOW: usize = 5;

/// Number of themes reported
const TOP_THEMES: usize = 3;

/// Letter count at which the writing-frequency component saturates
const FREQUENCY_TARGET: usize = 20;

/// Sentiment projection of one entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionSample {
    pub created_at: DateTime<Utc>,
    pub sentiment_score: i32,
    /// Words that moved the score, in text order
    pub themes: Vec<String>,
}

impl EmotionSample {
    pub fn from_analysis(created_at: DateTime<Utc>, analysis: &SentimentAnalysis) -> Self {
        Self {
            created_at,
            sentiment_score: analysis.score,
            themes: analysis
                .positive
                .iter()
                .chain(analysis.negative.iter())
                .cloned()
                .collect(),
        }
    }
}

/// Insight category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Positive,
    Support,
    Habit,
    Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, message: String) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message,
        }
    }
}

/// Average sentiment for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverage {
    /// `YYYY-MM`
    pub month: String,
    pub average: f64,
}

/// Aggregate statistics over a writer's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMetrics {
    pub average_score: f64,
    /// Percent of entries with a positive score
    pub positivity_rate: f64,
    pub total_entries: usize,
    /// Oldest month first
    pub trend: Vec<MonthlyAverage>,
    pub common_themes: BTreeMap<String, usize>,
}

fn chronological(samples: &[EmotionSample]) -> Vec<&EmotionSample> {
    let mut sorted: Vec<&EmotionSample> = samples.iter().collect();
    sorted.sort_by_key(|s| s.created_at);
    sorted
}

fn mean_score<'a>(samples: impl ExactSizeIterator<Item = &'a EmotionSample>) -> f64 {
    let len = samples.len();
    if len == 0 {
        return 0.0;
    }
    let sum: i64 = samples.map(|s| i64::from(s.sentiment_score)).sum();
    sum as f64 / len as f64
}

/// Most frequent theme words; ties keep first-seen order
fn top_themes(samples: &[&EmotionSample], limit: usize) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for word in samples.iter().flat_map(|s| s.themes.iter()) {
        match counts.iter_mut().find(|(w, _)| w == word) {
            Some((_, n)) => *n += 1,
            None => counts.push((word.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(limit).map(|(w, _)| w).collect()
}

/// Generate insights from a writer's history
pub fn insights(samples: &[EmotionSample]) -> Vec<Insight> {
    if samples.is_empty() {
        return Vec::new();
    }
    let sorted = chronological(samples);
    let mut out = Vec::new();

    let recent = &sorted[sorted.len().saturating_sub(TREND_WINDOW)..];
    let trend = mean_score(recent.iter().copied());
    if trend > 1.0 {
        out.push(Insight::new(
            InsightKind::Positive,
            "Positive Trend",
            "Your recent entries show a positive emotional trend. Keep it going!".to_string(),
        ));
    } else if trend < -1.0 {
        out.push(Insight::new(
            InsightKind::Support,
            "Support Note",
            "Your recent entries sound heavy. Consider reaching out to someone you trust, \
             or make time for something that restores you."
                .to_string(),
        ));
    }

    if let (Some(first), Some(last)) = (sorted.first(), sorted.last()) {
        let span = last.created_at - first.created_at;
        if sorted.len() > 1 && span > chrono::Duration::zero() {
            let interval_days = span.num_seconds() as f64 / sorted.len() as f64 / 86_400.0;
            out.push(Insight::new(
                InsightKind::Habit,
                "Writing Habit",
                format!(
                    "You write roughly every {} days. Regular reflection supports well-being.",
                    interval_days.round()
                ),
            ));
        }
    }

    let themes = top_themes(&sorted, TOP_THEMES);
    if !themes.is_empty() {
        out.push(Insight::new(
            InsightKind::Theme,
            "Common Themes",
            format!("You often write about: {}.", themes.join(", ")),
        ));
    }

    out
}

/// Aggregate metrics, `None` for an empty history
pub fn growth_metrics(samples: &[EmotionSample]) -> Option<GrowthMetrics> {
    if samples.is_empty() {
        return None;
    }
    let sorted = chronological(samples);
    let total_entries = sorted.len();
    let positive = sorted.iter().filter(|s| s.sentiment_score > 0).count();

    let mut months: BTreeMap<String, (i64, usize)> = BTreeMap::new();
    for sample in &sorted {
        let entry = months
            .entry(sample.created_at.format("%Y-%m").to_string())
            .or_default();
        entry.0 += i64::from(sample.sentiment_score);
        entry.1 += 1;
    }

    let mut common_themes = BTreeMap::new();
    for word in sorted.iter().flat_map(|s| s.themes.iter()) {
        *common_themes.entry(word.clone()).or_insert(0) += 1;
    }

    Some(GrowthMetrics {
        average_score: mean_score(sorted.iter().copied()),
        positivity_rate: positive as f64 / total_entries as f64 * 100.0,
        total_entries,
        trend: months
            .into_iter()
            .map(|(month, (sum, count))| MonthlyAverage {
                month,
                average: sum as f64 / count as f64,
            })
            .collect(),
        common_themes,
    })
}

/// Composite 0–100 growth score.
///
/// Half mood (average sentiment mapped around 50), 30% task completion
/// (50 when there are no tasks), 20% writing frequency.
pub fn growth_score(
    samples: &[EmotionSample],
    tasks_completed: usize,
    tasks_total: usize,
    letters: usize,
) -> u8 {
    let mood = (50.0 + mean_score(samples.iter()) * 10.0).clamp(0.0, 100.0);
    let tasks = if tasks_total == 0 {
        50.0
    } else {
        tasks_completed.min(tasks_total) as f64 / tasks_total as f64 * 100.0
    };
    let frequency = (letters as f64 / FREQUENCY_TARGET as f64 * 100.0).min(100.0);

    (0.5 * mood + 0.3 * tasks + 0.2 * frequency).round() as u8
}

const GENERAL_PROMPTS: &[&str] = &[
    "What made you smile today?",
    "Which challenge are you proud of getting through?",
    "What are you looking forward to?",
    "Name one small thing you are grateful for.",
    "What would you tell your younger self?",
    "Which dream would you like to chase?",
    "What did you learn recently?",
    "Who has been a good influence on you lately?",
    "Which goal are you working towards?",
    "What brings you peace?",
];

const LOW_PROMPTS: &[&str] = &[
    "What small win did you have today?",
    "Name three things that comforted you recently.",
    "What positive change would you like to make?",
    "Who could you reach out to for support?",
    "Which activities help you feel better?",
];

const HIGH_PROMPTS: &[&str] = &[
    "How could you share this energy with others?",
    "What is feeding your good mood?",
    "How could you build on this momentum?",
    "What helps you hold on to these feelings?",
    "What are you excited about?",
];

/// Pick a writing prompt matched to the most recent entry's sentiment
pub fn writing_prompt<R: Rng + ?Sized>(last_score: Option<i32>, rng: &mut R) -> &'static str {
    let pool = match last_score {
        Some(score) if score < -1 => LOW_PROMPTS,
        Some(score) if score > 1 => HIGH_PROMPTS,
        _ => GENERAL_PROMPTS,
    };
    pool.choose(rng).copied().unwrap_or(GENERAL_PROMPTS[0])
}
