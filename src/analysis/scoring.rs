use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade bucket for a hero's win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[serde(rename = "S+")]
    SPlus,
    S,
    A,
    B,
    C,
    D,
}

impl Tier {
    /// Classify a win rate given either as a fraction (`0.56`) or a percentage (`56.0`).
    ///
    /// Values below 1 are treated as fractions and scaled by 100; everything else is taken as
    /// a percentage already. A raw `1.0` is therefore read as 1%, not 100%.
    pub fn from_win_rate(win_rate: f64) -> Tier {
        let percent = if win_rate < 1.0 { win_rate * 100.0 } else { win_rate };

        if percent >= 55.0 {
            Tier::SPlus
        } else if percent >= 53.0 {
            Tier::S
        } else if percent >= 51.0 {
            Tier::A
        } else if percent >= 49.0 {
            Tier::B
        } else if percent >= 47.0 {
            Tier::C
        } else {
            Tier::D
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::SPlus => "S+",
            Tier::S => "S",
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
            Tier::D => "D",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How strongly a counter or synergy relationship shifts the win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effectiveness {
    Strong,
    Moderate,
    Neutral,
    Weak,
    VeryWeak,
}

impl Effectiveness {
    pub fn from_win_rate_change(win_rate_change: f64) -> Effectiveness {
        if win_rate_change >= 5.0 {
            Effectiveness::Strong
        } else if win_rate_change >= 2.0 {
            Effectiveness::Moderate
        } else if win_rate_change >= -2.0 {
            Effectiveness::Neutral
        } else if win_rate_change >= -5.0 {
            Effectiveness::Weak
        } else {
            Effectiveness::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Effectiveness::Strong => "Strong",
            Effectiveness::Moderate => "Moderate",
            Effectiveness::Neutral => "Neutral",
            Effectiveness::Weak => "Weak",
            Effectiveness::VeryWeak => "Very Weak",
        }
    }
}

impl fmt::Display for Effectiveness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
