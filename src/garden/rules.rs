use std::{fmt, str::FromStr};

use anyhow::{Error, bail};

/// Which side of the threshold switches the output on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// On while the value is strictly below the threshold.
    Below,

    /// On while the value is strictly above the threshold.
    Above,

    /// On while the value is below or equal to the threshold.
    AtOrBelow,

    /// On while the value is above or equal to the threshold.
    AtOrAbove,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Below => "below",
            Polarity::Above => "above",
            Polarity::AtOrBelow => "at-or-below",
            Polarity::AtOrAbove => "at-or-above",
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Polarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "below" => Ok(Polarity::Below),
            "above" => Ok(Polarity::Above),
            "at-or-below" => Ok(Polarity::AtOrBelow),
            "at-or-above" => Ok(Polarity::AtOrAbove),
            _ => bail!(
                "unknown polarity: {} (expected below, above, at-or-below or at-or-above)",
                s
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub threshold: f64,

    pub polarity: Polarity,
}

impl ThresholdRule {
    pub fn below(threshold: f64) -> Self {
        Self {
            threshold,
            polarity: Polarity::Below,
        }
    }

    pub fn above(threshold: f64) -> Self {
        Self {
            threshold,
            polarity: Polarity::Above,
        }
    }

    pub fn at_or_below(threshold: f64) -> Self {
        Self {
            threshold,
            polarity: Polarity::AtOrBelow,
        }
    }

    pub fn is_on(&self, value: f64) -> bool {
        match self.polarity {
            Polarity::Below => value < self.threshold,
            Polarity::Above => value > self.threshold,
            Polarity::AtOrBelow => value <= self.threshold,
            Polarity::AtOrAbove => value >= self.threshold,
        }
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on {} {}", self.polarity, self.threshold)
    }
}

/// Output decisions for one reading. `pump` is `None` when no pump is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActuatorState {
    pub light: bool,

    pub pump: Option<bool>,
}
