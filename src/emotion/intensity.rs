//! Emotional intensity scanning
//!
//! Intensifier vocabulary is split into tiers. The weighted mean of every
//! tier hit gives an unsigned magnitude in [0, 1], which is then signed by
//! valence and blended with the base sentiment score.

/// Intensity vocabulary tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityTier {
    High,
    Medium,
    Low,
    /// Acute distress phrasing; strongest tier, always negative valence
    Distress,
}

impl IntensityTier {
    pub fn weight(self) -> f64 {
        match self {
            Self::High | Self::Distress => 1.0,
            Self::Medium => 0.6,
            Self::Low => 0.3,
        }
    }
}

/// Result of scanning a token stream for intensity vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntensityReading {
    /// Weighted mean of tier hits, 0 when nothing matched
    pub magnitude: f64,
    /// Whether any distress phrase matched
    pub distress: bool,
    /// Number of tier hits
    pub hits: usize,
}

/// Magnitude above which the tier signal dominates the blend
const DOMINANT_MAGNITUDE: f64 = 0.3;

/// Scanner over pre-normalized intensity phrases
#[derive(Debug)]
pub struct IntensityScanner {
    /// Longest phrases first so "so much" wins over "so"
    phrases: Vec<(Vec<String>, IntensityTier)>,
}

impl IntensityScanner {
    pub fn new(mut phrases: Vec<(Vec<String>, IntensityTier)>) -> Self {
        phrases.retain(|(p, _)| !p.is_empty());
        phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { phrases }
    }

    /// Greedy longest-match scan over the token stream
    pub fn scan(&self, tokens: &[String]) -> IntensityReading {
        let mut total = 0.0;
        let mut hits = 0;
        let mut distress = false;
        let mut i = 0;

        while i < tokens.len() {
            let matched = self
                .phrases
                .iter()
                .find(|(phrase, _)| tokens[i..].starts_with(phrase));

            match matched {
                Some((phrase, tier)) => {
                    total += tier.weight();
                    hits += 1;
                    distress |= *tier == IntensityTier::Distress;
                    i += phrase.len();
                }
                None => i += 1,
            }
        }

        let magnitude = if hits == 0 {
            0.0
        } else {
            (total / hits as f64).clamp(0.0, 1.0)
        };

        IntensityReading {
            magnitude,
            distress,
            hits,
        }
    }
}

/// Combine a tier reading with the base sentiment score.
///
/// `negative` is whether the detected mood carries distress valence. The
/// result is in [-1, 1] and never positive for negative valence.
pub fn blend(reading: &IntensityReading, negative: bool, sentiment_score: i32) -> f64 {
    let negative = negative || reading.distress;
    let signed = if negative {
        -reading.magnitude
    } else {
        reading.magnitude
    };
    let base = (f64::from(sentiment_score) / 5.0).clamp(-1.0, 1.0);

    let blended = if reading.magnitude > DOMINANT_MAGNITUDE {
        0.8 * signed + 0.2 * base
    } else {
        0.5 * signed + 0.5 * base
    };

    let blended = blended.clamp(-1.0, 1.0);
    let blended = if negative { blended.min(0.0) } else { blended };
    (blended * 1000.0).round() / 1000.0
}
