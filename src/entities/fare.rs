use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::vehicle::{
    PricingTable, Tariff, VehicleCategory, PREMIUM_BASE_FARE, SHORT_TRIP_BANDS,
    STANDARD_BASE_FARE,
};

pub const MANUAL_QUOTE: &str = "Manual Quote";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareResult {
    Amount(i64),
    ManualQuote,
}

impl FareResult {
    pub fn is_manual_quote(&self) -> bool {
        matches!(self, FareResult::ManualQuote)
    }
}

impl fmt::Display for FareResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FareResult::Amount(amount) => write!(f, "₹{}", amount),
            FareResult::ManualQuote => f.write_str(MANUAL_QUOTE),
        }
    }
}

/// Estimates a fare with the default pricing table.
pub fn estimate(distance_km: f64, vehicle: VehicleCategory) -> FareResult {
    PricingTable::default().estimate(distance_km, vehicle)
}

impl PricingTable {
    /// Pure fare policy. `f64::round` rounds half away from zero.
    pub fn estimate(&self, distance_km: f64, vehicle: VehicleCategory) -> FareResult {
        let metered = |per_km: f64, base: i64| (distance_km * per_km).round() as i64 + base;

        match self.tariff(vehicle) {
            Tariff::ManualQuote => FareResult::ManualQuote,
            Tariff::Premium { per_km } => FareResult::Amount(metered(per_km, PREMIUM_BASE_FARE)),
            Tariff::ShortTripBanded { per_km } => {
                let flat = SHORT_TRIP_BANDS
                    .iter()
                    .find(|(upper_km, _)| distance_km <= *upper_km)
                    .map(|(_, fare)| *fare);

                FareResult::Amount(flat.unwrap_or_else(|| metered(per_km, STANDARD_BASE_FARE)))
            }
            Tariff::Metered { per_km } => FareResult::Amount(metered(per_km, STANDARD_BASE_FARE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_quote_ignores_distance() {
        for vehicle in VehicleCategory::ALL.iter().filter(|v| v.is_manual_quote()) {
            for km in [0.0, -3.0, 4.2, 250.0] {
                assert_eq!(estimate(km, *vehicle), FareResult::ManualQuote);
            }
        }
    }

    #[test]
    fn short_trip_band_edges() {
        let sedan = VehicleCategory::Sedan;

        assert_eq!(estimate(5.0, sedan), FareResult::Amount(200));
        assert_eq!(estimate(7.0, sedan), FareResult::Amount(250));
        assert_eq!(estimate(6.2, sedan), FareResult::Amount(250));
        // 7.01 * 27 = 189.27
        assert_eq!(estimate(7.01, sedan), FareResult::Amount(189 + 80));
        assert_eq!(estimate(0.0, VehicleCategory::Mini), FareResult::Amount(200));
    }

    #[test]
    fn just_above_five_km_uses_the_seven_km_band() {
        assert_eq!(estimate(5.01, VehicleCategory::Mini), FareResult::Amount(250));
    }

    #[test]
    fn premium_formula() {
        assert_eq!(estimate(10.0, VehicleCategory::Suv), FareResult::Amount(400 + 150));
        assert_eq!(estimate(10.0, VehicleCategory::SuvPlus), FareResult::Amount(450 + 150));
        assert_eq!(estimate(10.0, VehicleCategory::Innova), FareResult::Amount(500 + 150));
        // premium categories never use the short-trip bands
        assert_eq!(estimate(2.0, VehicleCategory::Suv), FareResult::Amount(80 + 150));
    }

    #[test]
    fn standard_formula_rounds_half_away_from_zero() {
        // 12.5 * 25 = 312.5
        assert_eq!(estimate(12.5, VehicleCategory::Mini), FareResult::Amount(313 + 80));
        // 12.3 * 27 = 332.1
        assert_eq!(estimate(12.3, VehicleCategory::Sedan), FareResult::Amount(332 + 80));
    }

    #[test]
    fn metered_fallback_for_other_categories() {
        let table = PricingTable::default()
            .with_tariff(VehicleCategory::Custom, Tariff::Metered { per_km: 30.0 });

        assert_eq!(
            table.estimate(3.0, VehicleCategory::Custom),
            FareResult::Amount(90 + 80)
        );
    }

    #[test]
    fn display() {
        assert_eq!(FareResult::Amount(250).to_string(), "₹250");
        assert_eq!(FareResult::ManualQuote.to_string(), "Manual Quote");
    }
}
