//! Reports over a [`ResultSet`](crate::batch::ResultSet).
//!
//! - [`summary`] - readable per-stem listing of the top completions
//! - [`bands`] - CSV of completions grouped by frequency band
//! - [`table`] - ILT comparison table of human responses vs. corpus scores

pub mod bands;
pub mod summary;
pub mod table;

use serde::Serialize;

/// Coarse frequency band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrequencyBand {
    /// Score above 0.9.
    VeryCommon,
    /// Score above 0.7, up to 0.9.
    Common,
    /// Score above 0.4, up to 0.7.
    Moderate,
    /// Score above 0, up to 0.4.
    LessCommon,
    /// Score of 0 (no frequency data).
    Rare,
}

impl FrequencyBand {
    /// All bands, most common first.
    pub const ALL: [Self; 5] = [
        Self::VeryCommon,
        Self::Common,
        Self::Moderate,
        Self::LessCommon,
        Self::Rare,
    ];

    /// Band for `score`.
    pub fn of(score: f64) -> Self {
        if score > 0.9 {
            Self::VeryCommon
        } else if score > 0.7 {
            Self::Common
        } else if score > 0.4 {
            Self::Moderate
        } else if score > 0.0 {
            Self::LessCommon
        } else {
            Self::Rare
        }
    }

    /// Short description used in the summary listing.
    pub const fn note(self) -> &'static str {
        match self {
            Self::VeryCommon => "very common",
            Self::Common => "common",
            Self::Moderate => "moderately common",
            Self::LessCommon => "less common",
            Self::Rare => "rare",
        }
    }

    /// Column heading used in the band CSV.
    pub const fn heading(self) -> &'static str {
        match self {
            Self::VeryCommon => "Very Common (>0.9)",
            Self::Common => "Common (0.7-0.9)",
            Self::Moderate => "Moderate (0.4-0.7)",
            Self::LessCommon => "Less Common (0-0.4)",
            Self::Rare => "Rare (0)",
        }
    }
}

impl std::fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.note())
    }
}
