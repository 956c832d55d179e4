// dimensions.rs - The fixed set of grid sizes the simulation can run at

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::SimulationError;

/// Grid size preset, written as `rows x cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Dimensions {
    Small,      // 10x20
    #[default]
    Square,     // 30x30
    Wide,       // 30x50
}

impl Dimensions {
    pub const ALL: [Dimensions; 3] = [Dimensions::Small, Dimensions::Square, Dimensions::Wide];

    pub fn rows(self) -> usize {
        match self {
            Dimensions::Small => 10,
            Dimensions::Square | Dimensions::Wide => 30,
        }
    }

    pub fn cols(self) -> usize {
        match self {
            Dimensions::Small => 20,
            Dimensions::Square => 30,
            Dimensions::Wide => 50,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows(), self.cols())
    }
}

impl FromStr for Dimensions {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Dimensions::ALL
            .into_iter()
            .find(|preset| preset.to_string() == wanted)
            .ok_or_else(|| SimulationError::UnknownPreset(s.to_string()))
    }
}

impl TryFrom<String> for Dimensions {
    type Error = SimulationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_thirty_by_thirty() {
        let d = Dimensions::default();
        assert_eq!((d.rows(), d.cols()), (30, 30));
    }

    #[test]
    fn presets_round_trip_through_their_names() {
        for preset in Dimensions::ALL {
            assert_eq!(preset.to_string().parse::<Dimensions>().unwrap(), preset);
        }
        assert_eq!("10x20".parse::<Dimensions>().unwrap(), Dimensions::Small);
        assert_eq!(" 30X50 ".parse::<Dimensions>().unwrap(), Dimensions::Wide);
    }

    #[test]
    fn sizes_outside_the_presets_are_rejected() {
        for bad in ["20x10", "100x100", "", "30"] {
            assert!(matches!(
                bad.parse::<Dimensions>(),
                Err(SimulationError::UnknownPreset(_))
            ));
        }
    }
}
