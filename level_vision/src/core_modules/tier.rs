// THEORY:
// The `tier` module is the decision layer. It maps the continuous level onto six
// ordered risk tiers with a fixed threshold table, attaches a display message and an
// optional audio cue, and remembers the last tier so that cues fire on transitions
// only.
//
// Key architectural principles:
// 1.  **Table Driven**: Thresholds, labels and cues live in one ordered table. The
//     lookup is "first row whose upper bound is strictly greater than the level",
//     which makes every threshold belong to the tier above it.
// 2.  **Edge Triggered**: `TierCursor` reports a cue only when the tier changes, never
//     while a tier is sustained across frames.

use std::fmt;

/// The six ordered risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskTier {
    NoRisk,
    Medium,
    High,
    VeryHigh,
    Severe,
    Extreme,
}

impl RiskTier {
    pub const ALL: [RiskTier; 6] = [
        RiskTier::NoRisk,
        RiskTier::Medium,
        RiskTier::High,
        RiskTier::VeryHigh,
        RiskTier::Severe,
        RiskTier::Extreme,
    ];

    /// Position on the ordered tier axis, `0..=5`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskTier::NoRisk => "No risk",
            RiskTier::Medium => "Medium risk",
            RiskTier::High => "High risk",
            RiskTier::VeryHigh => "Very high risk",
            RiskTier::Severe => "Severe risk",
            RiskTier::Extreme => "Extreme risk",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The short sounds tied to tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Sipping,
    Fallout,
    Siren,
}

impl Cue {
    /// File name of the asset, resolved against the cue directory.
    pub fn asset_name(self) -> &'static str {
        match self {
            Cue::Sipping => "tomando.wav",
            Cue::Fallout => "fallout.wav",
            Cue::Siren => "sirena.wav",
        }
    }
}

/// One row of the tier table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierBand {
    /// Exclusive upper bound. `None` for the last, unbounded tier.
    pub upper_bound: Option<f64>,
    pub tier: RiskTier,
    /// Text shown after the formatted level.
    pub suffix: &'static str,
    pub cue: Option<Cue>,
}

/// Strictly increasing thresholds; contiguous and exhaustive over `[0, inf)`.
pub static TIER_TABLE: [TierBand; 6] = [
    TierBand { upper_bound: Some(0.01), tier: RiskTier::NoRisk, suffix: "No risk. Drive responsibly.", cue: None },
    TierBand { upper_bound: Some(0.3), tier: RiskTier::Medium, suffix: "Medium risk.", cue: Some(Cue::Sipping) },
    TierBand { upper_bound: Some(0.5), tier: RiskTier::High, suffix: "High risk.", cue: Some(Cue::Sipping) },
    TierBand { upper_bound: Some(1.5), tier: RiskTier::VeryHigh, suffix: "Very high risk.", cue: Some(Cue::Fallout) },
    TierBand { upper_bound: Some(2.5), tier: RiskTier::Severe, suffix: "Severe risk.", cue: Some(Cue::Fallout) },
    TierBand { upper_bound: None, tier: RiskTier::Extreme, suffix: "Extreme risk. Danger of death.", cue: Some(Cue::Siren) },
];

fn band_for(level: f64) -> &'static TierBand {
    TIER_TABLE
        .iter()
        .find(|band| band.upper_bound.is_none_or(|bound| level < bound))
        .unwrap_or(&TIER_TABLE[TIER_TABLE.len() - 1])
}

/// Lowest tier whose upper bound is strictly above `level`.
pub fn classify(level: f64) -> RiskTier {
    band_for(level).tier
}

/// The classified result for one level value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub level: f64,
    pub tier: RiskTier,
    pub message: String,
    pub cue: Option<Cue>,
}

impl Reading {
    pub fn from_level(level: f64) -> Self {
        let band = band_for(level);
        let message = match band.tier {
            RiskTier::NoRisk => format!("0.0 g/L - {}", band.suffix),
            _ => format!("{level:.2} g/L - {}", band.suffix),
        };
        Self {
            level,
            tier: band.tier,
            message,
            cue: band.cue,
        }
    }
}

/// Remembers the last emitted tier so cues fire once per transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCursor {
    current: Option<RiskTier>,
}

impl TierCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<RiskTier> {
        self.current
    }

    /// Records `reading.tier` and returns the cue to play, if the tier changed and
    /// the new tier has one.
    pub fn advance(&mut self, reading: &Reading) -> Option<Cue> {
        if self.current == Some(reading.tier) {
            return None;
        }
        self.current = Some(reading.tier);
        reading.cue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_strictly_increasing() {
        let bounds: Vec<f64> = TIER_TABLE.iter().filter_map(|band| band.upper_bound).collect();
        assert_eq!(bounds.len(), TIER_TABLE.len() - 1);
        assert!(bounds.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(TIER_TABLE.last().unwrap().upper_bound.is_none());
        let tiers: Vec<RiskTier> = TIER_TABLE.iter().map(|band| band.tier).collect();
        assert_eq!(tiers, RiskTier::ALL.to_vec());
    }

    #[test]
    fn boundaries_belong_to_the_higher_tier() {
        assert_eq!(classify(0.0), RiskTier::NoRisk);
        assert_eq!(classify(0.009), RiskTier::NoRisk);
        assert_eq!(classify(0.01), RiskTier::Medium);
        assert_eq!(classify(0.29), RiskTier::Medium);
        assert_eq!(classify(0.3), RiskTier::High);
        assert_eq!(classify(0.5), RiskTier::VeryHigh);
        assert_eq!(classify(1.5), RiskTier::Severe);
        assert_eq!(classify(2.4999), RiskTier::Severe);
        assert_eq!(classify(2.5), RiskTier::Extreme);
        assert_eq!(classify(3.0), RiskTier::Extreme);
        assert_eq!(classify(1e9), RiskTier::Extreme);
    }

    #[test]
    fn every_level_maps_to_one_ordered_tier() {
        let mut previous = RiskTier::NoRisk;
        for step in 0..=400 {
            let level = f64::from(step) * 0.01;
            let tier = classify(level);
            assert!(tier >= previous, "tier went down at level {level}");
            previous = tier;
        }
        assert_eq!(previous, RiskTier::Extreme);
    }

    #[test]
    fn messages_format_level_to_two_decimals() {
        assert_eq!(Reading::from_level(0.004).message, "0.0 g/L - No risk. Drive responsibly.");
        assert_eq!(Reading::from_level(0.123).message, "0.12 g/L - Medium risk.");
        assert_eq!(Reading::from_level(1.0).message, "1.00 g/L - Very high risk.");
        assert_eq!(Reading::from_level(3.0).message, "3.00 g/L - Extreme risk. Danger of death.");
    }

    #[test]
    fn cues_follow_the_table() {
        assert_eq!(Reading::from_level(0.0).cue, None);
        assert_eq!(Reading::from_level(0.2).cue, Some(Cue::Sipping));
        assert_eq!(Reading::from_level(0.4).cue, Some(Cue::Sipping));
        assert_eq!(Reading::from_level(1.0).cue, Some(Cue::Fallout));
        assert_eq!(Reading::from_level(2.0).cue, Some(Cue::Fallout));
        assert_eq!(Reading::from_level(2.8).cue, Some(Cue::Siren));
        assert_eq!(Cue::Siren.asset_name(), "sirena.wav");
    }

    #[test]
    fn cursor_fires_once_per_transition() {
        let mut cursor = TierCursor::new();
        let levels = [0.2, 0.25, 0.2, 1.0, 1.1, 0.0, 0.0, 0.2, 2.7];
        let fired: Vec<Option<Cue>> = levels
            .iter()
            .map(|&level| cursor.advance(&Reading::from_level(level)))
            .collect();

        assert_eq!(
            fired,
            vec![
                Some(Cue::Sipping),
                None,
                None,
                Some(Cue::Fallout),
                None,
                None,
                None,
                Some(Cue::Sipping),
                Some(Cue::Siren),
            ]
        );
        assert_eq!(cursor.current(), Some(RiskTier::Extreme));
    }

    #[test]
    fn moving_into_tier_zero_updates_cursor_silently() {
        let mut cursor = TierCursor::new();
        assert_eq!(cursor.advance(&Reading::from_level(0.0)), None);
        assert_eq!(cursor.current(), Some(RiskTier::NoRisk));
    }

    #[test]
    fn same_cue_across_different_tiers_still_fires() {
        let mut cursor = TierCursor::new();
        assert_eq!(cursor.advance(&Reading::from_level(0.1)), Some(Cue::Sipping));
        assert_eq!(cursor.advance(&Reading::from_level(0.4)), Some(Cue::Sipping));
    }
}
