use serde::Serialize;

/// Marine fuels with a known lower calorific value (ISO 8217 / FuelEU Maritime defaults).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Hfo,
    Diesel,
}

impl FuelType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hfo => "HFO",
            Self::Diesel => "Diesel",
        }
    }

    /// MJ per kg.
    pub const fn lower_calorific_value(self) -> f64 {
        match self {
            Self::Hfo => 40.2,
            Self::Diesel => 42.7,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hfo" | "heavy fuel oil" => Some(Self::Hfo),
            "diesel" | "mgo" | "mdo" | "marine diesel" => Some(Self::Diesel),
            _ => None,
        }
    }

    /// Unknown or missing fuel labels fall back to HFO.
    pub fn from_label(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or(Self::Hfo)
    }

    pub fn energy_mj(self, fuel_kg: f64) -> f64 {
        fuel_kg * self.lower_calorific_value()
    }
}
