use serde::{Deserialize, Serialize};

/// One of the six fixed observing frequency bands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    /// 27 GHz
    F027,
    /// 39 GHz
    F039,
    /// 93 GHz
    F093,
    /// 145 GHz
    F145,
    /// 225 GHz
    F225,
    /// 280 GHz
    F280,
}

impl Band {
    /// All bands, in ascending frequency order.
    pub const ALL: [Self; 6] = [
        Self::F027,
        Self::F039,
        Self::F093,
        Self::F145,
        Self::F225,
        Self::F280,
    ];

    /// Band used as the anchor for spectral scaling.
    pub const REFERENCE: Self = Self::F093;

    /// Observing frequency in GHz.
    pub fn frequency_ghz(self) -> f64 {
        match self {
            Self::F027 => 27.0,
            Self::F039 => 39.0,
            Self::F093 => 93.0,
            Self::F145 => 145.0,
            Self::F225 => 225.0,
            Self::F280 => 280.0,
        }
    }

    /// Zero-padded column suffix used by every persisted form.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::F027 => "027",
            Self::F039 => "039",
            Self::F093 => "093",
            Self::F145 => "145",
            Self::F225 => "225",
            Self::F280 => "280",
        }
    }

    /// Flux column name, e.g. `flux_093`.
    pub fn flux_column(self) -> &'static str {
        match self {
            Self::F027 => "flux_027",
            Self::F039 => "flux_039",
            Self::F093 => "flux_093",
            Self::F145 => "flux_145",
            Self::F225 => "flux_225",
            Self::F280 => "flux_280",
        }
    }

    /// Uncertainty column name, e.g. `uncertainty_093`.
    pub fn uncertainty_column(self) -> &'static str {
        match self {
            Self::F027 => "uncertainty_027",
            Self::F039 => "uncertainty_039",
            Self::F093 => "uncertainty_093",
            Self::F145 => "uncertainty_145",
            Self::F225 => "uncertainty_225",
            Self::F280 => "uncertainty_280",
        }
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f{}", self.suffix())
    }
}

impl std::str::FromStr for Band {
    type Err = crate::CatalogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('f').trim_start_matches('0') {
            "27" => Ok(Self::F027),
            "39" => Ok(Self::F039),
            "93" => Ok(Self::F093),
            "145" => Ok(Self::F145),
            "225" => Ok(Self::F225),
            "280" => Ok(Self::F280),
            other => Err(crate::CatalogueError::InvalidInput(format!(
                "unknown band: {other}"
            ))),
        }
    }
}
