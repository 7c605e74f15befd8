use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Flow units
// ---------------------------------------------------------------------------

/// Litres per minute in one US gallon per minute (catalog convention).
const LPM_PER_US_GPM: f64 = 3.785;

/// Flow units offered on the search form. LPM is the canonical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FlowUnit {
    #[default]
    LitersPerMinute,
    LitersPerSecond,
    CubicMetersPerHour,
    CubicMetersPerMinute,
    UsGpm,
}

impl FlowUnit {
    pub const ALL: [FlowUnit; 5] = [
        FlowUnit::LitersPerMinute,
        FlowUnit::LitersPerSecond,
        FlowUnit::CubicMetersPerHour,
        FlowUnit::CubicMetersPerMinute,
        FlowUnit::UsGpm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FlowUnit::LitersPerMinute => "L/min",
            FlowUnit::LitersPerSecond => "L/sec",
            FlowUnit::CubicMetersPerHour => "m³/hr",
            FlowUnit::CubicMetersPerMinute => "m³/min",
            FlowUnit::UsGpm => "US gpm",
        }
    }

    /// Parse a unit label. Accepts the form labels plus plain-ASCII spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        let norm = label.trim().to_ascii_lowercase().replace('³', "3");
        match norm.as_str() {
            "l/min" | "lpm" => Some(FlowUnit::LitersPerMinute),
            "l/sec" | "l/s" => Some(FlowUnit::LitersPerSecond),
            "m3/hr" | "m3/h" => Some(FlowUnit::CubicMetersPerHour),
            "m3/min" => Some(FlowUnit::CubicMetersPerMinute),
            "us gpm" | "gpm" => Some(FlowUnit::UsGpm),
            _ => None,
        }
    }

    /// Multiplier taking a value in this unit to LPM.
    fn lpm_factor(self) -> f64 {
        match self {
            FlowUnit::LitersPerMinute => 1.0,
            FlowUnit::LitersPerSecond => 60.0,
            FlowUnit::CubicMetersPerHour => 1000.0 / 60.0,
            FlowUnit::CubicMetersPerMinute => 1000.0,
            FlowUnit::UsGpm => LPM_PER_US_GPM,
        }
    }

    pub fn to_lpm(self, value: f64) -> f64 {
        value * self.lpm_factor()
    }

    /// Express a canonical LPM value in this unit (used to seed form fields).
    pub fn from_lpm(self, lpm: f64) -> f64 {
        lpm / self.lpm_factor()
    }
}

// ---------------------------------------------------------------------------
// Head units
// ---------------------------------------------------------------------------

const METERS_PER_FOOT: f64 = 0.3048;

/// Head (TDH) units. Metres are canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HeadUnit {
    #[default]
    Meters,
    Feet,
}

impl HeadUnit {
    pub const ALL: [HeadUnit; 2] = [HeadUnit::Meters, HeadUnit::Feet];

    pub fn label(self) -> &'static str {
        match self {
            HeadUnit::Meters => "m",
            HeadUnit::Feet => "ft",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "m" | "meter" | "meters" | "metre" | "metres" => Some(HeadUnit::Meters),
            "ft" | "foot" | "feet" => Some(HeadUnit::Feet),
            _ => None,
        }
    }

    pub fn to_meters(self, value: f64) -> f64 {
        match self {
            HeadUnit::Meters => value,
            HeadUnit::Feet => value * METERS_PER_FOOT,
        }
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            HeadUnit::Meters => meters,
            HeadUnit::Feet => meters / METERS_PER_FOOT,
        }
    }
}

// ---------------------------------------------------------------------------
// Free-function surface
// ---------------------------------------------------------------------------

pub fn to_lpm(value: f64, unit: FlowUnit) -> f64 {
    unit.to_lpm(value)
}

pub fn to_meters(value: f64, unit: HeadUnit) -> f64 {
    unit.to_meters(value)
}

/// Normalise a flow given by unit label. Unknown labels are treated as LPM.
pub fn normalize_flow(value: f64, unit_label: &str) -> f64 {
    FlowUnit::from_label(unit_label).map_or(value, |unit| unit.to_lpm(value))
}

/// Normalise a head given by unit label. Unknown labels are treated as metres.
pub fn normalize_head(value: f64, unit_label: &str) -> f64 {
    HeadUnit::from_label(unit_label)
        .unwrap_or_default()
        .to_meters(value)
}
