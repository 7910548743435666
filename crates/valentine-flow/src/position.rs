//! Where the decline control sits, as viewport percentages.

use std::fmt;

use rand::Rng;

/// Screen position of the evasive decline control.
///
/// Coordinates are whole percentages of the viewport, measured from the
/// left (`x_percent`) and top (`y_percent`) edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EvadePosition {
    pub x_percent: u8,
    pub y_percent: u8,
}

impl EvadePosition {
    /// Where the control starts: dead center.
    pub const CENTER: Self = Self {
        x_percent: 50,
        y_percent: 50,
    };

    /// Lowest coordinate a relocation can produce.
    pub const MIN_PERCENT: u8 = 10;

    /// Exclusive upper bound for a relocation, keeping the control a
    /// tenth of the viewport away from every edge.
    pub const MAX_PERCENT: u8 = 90;

    /// Draws a new position with `x` and `y` independently uniform over
    /// `MIN_PERCENT..MAX_PERCENT`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x_percent: rng.random_range(Self::MIN_PERCENT..Self::MAX_PERCENT),
            y_percent: rng.random_range(Self::MIN_PERCENT..Self::MAX_PERCENT),
        }
    }
}

impl Default for EvadePosition {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Renders as CSS-style offsets, e.g. `left: 37%, top: 62%`.
impl fmt::Display for EvadePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "left: {}%, top: {}%", self.x_percent, self.y_percent)
    }
}
