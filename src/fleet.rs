//! Fleet and service catalogue shared by the chat assistant.
//!
//! Vehicle lines are rendered from the pricing table, so the assistant quotes
//! exactly what the booking form charges.

use crate::entities::{
    PricingTable, Tariff, VehicleCategory, PREMIUM_BASE_FARE, SHORT_TRIP_BANDS,
    STANDARD_BASE_FARE,
};

pub struct Service {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SERVICES: [Service; 6] = [
    Service {
        title: "City Rides",
        description: "Quick and comfortable travel across Coimbatore.",
    },
    Service {
        title: "Airport Transfers",
        description: "On-time pickup & drop to Coimbatore International Airport.",
    },
    Service {
        title: "Outstation Trips",
        description: "Safe long-distance journeys from Kovai.",
    },
    Service {
        title: "Hourly Rentals",
        description: "Flexible bookings for meetings and shopping.",
    },
    Service {
        title: "Corporate Travel",
        description: "Professional transport for business needs.",
    },
    Service {
        title: "Tour Packages",
        description: "Explore nearby places with trusted drivers.",
    },
];

impl Service {
    pub fn summary(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}

/// One line per vehicle category, e.g. "SUV: ₹150 + ₹40/km".
pub fn fleet_summaries(pricing: &PricingTable) -> Vec<String> {
    VehicleCategory::ALL
        .iter()
        .map(|vehicle| format!("{}: {}", vehicle, tariff_summary(pricing.tariff(*vehicle))))
        .collect()
}

fn tariff_summary(tariff: Tariff) -> String {
    match tariff {
        Tariff::ShortTripBanded { per_km } => {
            let bands: Vec<String> = SHORT_TRIP_BANDS
                .iter()
                .map(|(upper_km, fare)| format!("₹{} up to {} km", fare, upper_km))
                .collect();

            format!(
                "{}, then ₹{} + ₹{}/km",
                bands.join(", "),
                STANDARD_BASE_FARE,
                per_km
            )
        }
        Tariff::Premium { per_km } => format!("₹{} + ₹{}/km", PREMIUM_BASE_FARE, per_km),
        Tariff::Metered { per_km } => format!("₹{} + ₹{}/km", STANDARD_BASE_FARE, per_km),
        Tariff::ManualQuote => "price on request".into(),
    }
}
