//! Narrow capability interfaces over third-party services.
//!
//! The booking controller, dispatcher and chat widget only see these traits;
//! `google_maps`, `brevo` and `gemini` are thin adapters over the hosted APIs.

pub mod brevo;
pub mod gemini;
pub mod google_maps;

use async_trait::async_trait;

use crate::entities::{ChatMessage, Distance, PlaceSuggestions, RoutePreview, RouteRequest};
use crate::error::Error;

#[async_trait]
pub trait AddressSuggester: Send + Sync {
    async fn suggest(&self, input: &str, session_token: &str) -> Result<PlaceSuggestions, Error>;
}

#[async_trait]
pub trait DistanceLookup: Send + Sync {
    /// Driving distance between two free-text addresses.
    async fn distance(&self, route: &RouteRequest) -> Result<Distance, Error>;
}

#[async_trait]
pub trait RouteRenderer: Send + Sync {
    async fn render(&self, route: &RouteRequest) -> Result<RoutePreview, Error>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmailMessage {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), Error>;
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produces the next model turn for a conversation ending in a user message.
    async fn reply(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String, Error>;
}
