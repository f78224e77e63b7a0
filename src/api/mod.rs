use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::BookingView;
use crate::entities::{BookingUpdate, PlaceSuggestions, VehicleCategory};
use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeepLink {
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// `None` when no chat session could be opened.
    pub chat_id: Option<Uuid>,
    pub reply: String,
}

#[async_trait]
pub trait BookingAPI {
    async fn create_booking(&self) -> Result<BookingView, Error>;
    async fn find_booking(&self, id: Uuid) -> Result<BookingView, Error>;
    async fn update_booking(&self, id: Uuid, update: BookingUpdate) -> Result<BookingView, Error>;
    async fn advance_booking(&self, id: Uuid) -> Result<BookingView, Error>;
    async fn return_to_route(&self, id: Uuid) -> Result<BookingView, Error>;
    async fn select_vehicle(&self, id: Uuid, vehicle: VehicleCategory)
        -> Result<BookingView, Error>;
    async fn submit_booking(&self, id: Uuid) -> Result<BookingView, Error>;
    async fn restart_booking(&self, id: Uuid) -> Result<BookingView, Error>;
    async fn booking_whatsapp_link(&self, id: Uuid) -> Result<DeepLink, Error>;
}

#[async_trait]
pub trait PlacesAPI {
    async fn suggest_places(
        &self,
        input: String,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error>;
}

#[async_trait]
pub trait ChatAPI {
    async fn send_chat_message(
        &self,
        chat_id: Option<Uuid>,
        message: String,
    ) -> Result<ChatReply, Error>;
}

pub trait ContactAPI {
    fn whatsapp_inquiry_link(&self) -> DeepLink;
}

pub trait API: BookingAPI + PlacesAPI + ChatAPI + ContactAPI {}
