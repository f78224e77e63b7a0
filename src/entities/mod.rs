mod booking;
mod chat;
mod fare;
mod location;
mod place;
mod route;
mod vehicle;

pub use booking::{BookingDetails, BookingUpdate};
pub use chat::{ChatMessage, ChatRole};
pub use fare::{estimate, FareResult, MANUAL_QUOTE};
pub use location::Coordinates;
pub use place::{PlaceSuggestion, PlaceSuggestions};
pub use route::{Distance, RoutePreview, RouteRequest, StrokeStyle, DEFAULT_MAP_CENTER};
pub use vehicle::{
    PricingTable, Tariff, VehicleCategory, PREMIUM_BASE_FARE, SHORT_TRIP_BANDS,
    STANDARD_BASE_FARE,
};
