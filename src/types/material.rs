use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::job::JobError;

/// Plastics available for printing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Plastic {
    Pla,
    Abs,
    Nylon,
    /// Only offered for processed jobs.
    Acrylic,
}

impl Plastic {
    /// Raw material price per cubic millimetre of one item.
    pub fn rate(self) -> f64 {
        match self {
            Self::Pla => 0.05,
            Self::Abs => 0.06,
            Self::Nylon => 0.07,
            Self::Acrylic => 0.09,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pla => "PLA",
            Self::Abs => "ABS",
            Self::Nylon => "Nylon",
            Self::Acrylic => "Acrylic",
        }
    }

    /// Whether this plastic may be used for a job without post-processing.
    pub fn offered_raw(self) -> bool {
        !matches!(self, Self::Acrylic)
    }
}

impl FromStr for Plastic {
    type Err = JobError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Pla, Self::Abs, Self::Nylon, Self::Acrylic]
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| JobError::UnknownMaterial(s.to_owned()))
    }
}

impl fmt::Display for Plastic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Plastic {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

/// Post-processing steps applied to each printed item.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Treatment {
    UvCuring,
    UvProtectiveCoating,
    Polishing,
}

impl Treatment {
    /// Cost of applying this treatment to one item of the given volume.
    pub fn cost_per_item(self, volume: f64) -> f64 {
        match self {
            Self::UvCuring => 0.01 * volume,
            Self::UvProtectiveCoating => 0.005 * volume,
            Self::Polishing => 0.50,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::UvCuring => "UV Curing",
            Self::UvProtectiveCoating => "UV Protective Coating",
            Self::Polishing => "Polishing",
        }
    }

    /// Short form accepted on the console, where names can't contain spaces.
    pub fn slug(self) -> &'static str {
        match self {
            Self::UvCuring => "uv-curing",
            Self::UvProtectiveCoating => "uv-coating",
            Self::Polishing => "polishing",
        }
    }
}

impl FromStr for Treatment {
    type Err = JobError;

    /// Accepts either the full name (`UV Curing`) or the slug (`uv-curing`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::UvCuring, Self::UvProtectiveCoating, Self::Polishing]
            .into_iter()
            .find(|t| t.name() == s || t.slug() == s)
            .ok_or_else(|| JobError::UnknownTreatment(s.to_owned()))
    }
}

impl fmt::Display for Treatment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Treatment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}
