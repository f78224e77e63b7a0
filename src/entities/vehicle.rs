use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub const STANDARD_BASE_FARE: i64 = 80;
pub const PREMIUM_BASE_FARE: i64 = 150;

/// Flat fares for short banded trips, as (upper bound in km, fare).
pub const SHORT_TRIP_BANDS: [(f64, i64); 2] = [(5.0, 200), (7.0, 250)];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    Mini,
    Sedan,
    Suv,
    SuvPlus,
    Innova,
    Luxury,
    TempoTraveller,
    TouristBus,
    Custom,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 9] = [
        VehicleCategory::Mini,
        VehicleCategory::Sedan,
        VehicleCategory::Suv,
        VehicleCategory::SuvPlus,
        VehicleCategory::Innova,
        VehicleCategory::Luxury,
        VehicleCategory::TempoTraveller,
        VehicleCategory::TouristBus,
        VehicleCategory::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mini => "Mini",
            Self::Sedan => "Sedan",
            Self::Suv => "SUV",
            Self::SuvPlus => "SUV+",
            Self::Innova => "Innova",
            Self::Luxury => "Luxury",
            Self::TempoTraveller => "Tempo Traveller",
            Self::TouristBus => "Tourist Bus",
            Self::Custom => "Custom",
        }
    }

    /// Whether the default pricing table quotes this category off-line.
    pub fn is_manual_quote(&self) -> bool {
        matches!(
            self,
            Self::Luxury | Self::TempoTraveller | Self::TouristBus | Self::Custom
        )
    }
}

impl Default for VehicleCategory {
    fn default() -> Self {
        Self::Sedan
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a category is priced.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tariff {
    /// Flat fares inside [`SHORT_TRIP_BANDS`], metered with the standard base fare beyond.
    ShortTripBanded { per_km: f64 },
    /// Always metered, on top of [`PREMIUM_BASE_FARE`].
    Premium { per_km: f64 },
    /// Always metered, on top of [`STANDARD_BASE_FARE`].
    Metered { per_km: f64 },
    /// Quoted off-line by staff.
    ManualQuote,
}

impl Tariff {
    pub fn needs_distance(&self) -> bool {
        !matches!(self, Tariff::ManualQuote)
    }
}

#[derive(Clone, Debug)]
pub struct PricingTable {
    tariffs: HashMap<VehicleCategory, Tariff>,
}

impl Default for PricingTable {
    fn default() -> Self {
        let tariffs = HashMap::from([
            (VehicleCategory::Mini, Tariff::ShortTripBanded { per_km: 25.0 }),
            (VehicleCategory::Sedan, Tariff::ShortTripBanded { per_km: 27.0 }),
            (VehicleCategory::Suv, Tariff::Premium { per_km: 40.0 }),
            (VehicleCategory::SuvPlus, Tariff::Premium { per_km: 45.0 }),
            (VehicleCategory::Innova, Tariff::Premium { per_km: 50.0 }),
            (VehicleCategory::Luxury, Tariff::ManualQuote),
            (VehicleCategory::TempoTraveller, Tariff::ManualQuote),
            (VehicleCategory::TouristBus, Tariff::ManualQuote),
            (VehicleCategory::Custom, Tariff::ManualQuote),
        ]);

        Self { tariffs }
    }
}

impl PricingTable {
    pub fn with_tariff(mut self, vehicle: VehicleCategory, tariff: Tariff) -> Self {
        self.tariffs.insert(vehicle, tariff);
        self
    }

    /// Categories missing from the table fall back to a zero-rate metered tariff.
    pub fn tariff(&self, vehicle: VehicleCategory) -> Tariff {
        self.tariffs
            .get(&vehicle)
            .copied()
            .unwrap_or(Tariff::Metered { per_km: 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_quote_categories() {
        let manual: Vec<_> = VehicleCategory::ALL
            .iter()
            .filter(|v| v.is_manual_quote())
            .collect();

        assert_eq!(
            manual,
            vec![
                &VehicleCategory::Luxury,
                &VehicleCategory::TempoTraveller,
                &VehicleCategory::TouristBus,
                &VehicleCategory::Custom,
            ]
        );

        let table = PricingTable::default();
        for vehicle in VehicleCategory::ALL {
            assert_eq!(table.tariff(vehicle).needs_distance(), !vehicle.is_manual_quote());
        }
    }

    #[test]
    fn default_category_is_sedan() {
        assert_eq!(VehicleCategory::default(), VehicleCategory::Sedan);
    }

    #[test]
    fn categories_use_snake_case_on_the_wire() {
        let json = serde_json::to_string(&VehicleCategory::TempoTraveller).unwrap();
        assert_eq!(json, "\"tempo_traveller\"");
        assert_eq!(VehicleCategory::SuvPlus.to_string(), "SUV+");
    }
}
