pub mod bookings;
pub mod chat;
pub mod contact;
pub mod places;
