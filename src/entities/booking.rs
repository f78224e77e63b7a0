use serde::{Deserialize, Serialize};

use crate::entities::{Distance, FareResult, VehicleCategory};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub name: String,
    pub phone: String,
    pub pickup: String,
    pub drop: String,
    pub date: Option<String>,
    pub time: Option<String>,
    pub vehicle_type: VehicleCategory,
    pub distance: Option<Distance>,
    pub estimated_fare: Option<FareResult>,
}

impl BookingDetails {
    pub fn distance_text(&self) -> Option<&str> {
        self.distance.as_ref().map(|d| d.text.as_str())
    }

    pub fn fare_text(&self) -> Option<String> {
        self.estimated_fare.map(|fare| fare.to_string())
    }

    /// Phone number reduced to digits, as used by messaging deep links.
    pub fn phone_digits(&self) -> String {
        self.phone.chars().filter(|c| c.is_ascii_digit()).collect()
    }
}

/// Partial update from the form. Absent fields are left as they are.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub pickup: Option<String>,
    pub drop: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub vehicle_type: Option<VehicleCategory>,
}
