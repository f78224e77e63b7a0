use std::sync::Arc;

use crate::config::Business;
use crate::entities::{ChatMessage, PricingTable};
use crate::external::ChatModel;
use crate::fleet::{fleet_summaries, SERVICES};

pub const NOT_CONNECTED_REPLY: &str =
    "I'm sorry, I cannot connect to the server right now. Please try again later.";
pub const EMPTY_REPLY: &str = "I didn't quite catch that.";
pub const FAILED_REPLY: &str = "Sorry, I'm having trouble processing your request.";

/// One visitor's conversation with the assistant. Owned by whoever opened it.
pub struct ChatSession {
    model: Arc<dyn ChatModel>,
    system_prompt: String,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    /// `None` when no chat model is configured.
    pub fn initialize(
        model: Option<Arc<dyn ChatModel>>,
        business: &Business,
        pricing: &PricingTable,
    ) -> Option<Self> {
        let model = model?;

        Some(Self {
            model,
            system_prompt: system_prompt(business, pricing),
            history: Vec::new(),
        })
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Never fails: provider errors become an apology and the turn is forgotten.
    #[tracing::instrument(skip_all, fields(turns = self.history.len()))]
    pub async fn send(&mut self, message: &str) -> String {
        self.history.push(ChatMessage::user(message));

        match self.model.reply(&self.system_prompt, &self.history).await {
            Ok(reply) if reply.trim().is_empty() => {
                self.history.push(ChatMessage::model(EMPTY_REPLY));
                EMPTY_REPLY.into()
            }
            Ok(reply) => {
                self.history.push(ChatMessage::model(reply.clone()));
                reply
            }
            Err(err) => {
                tracing::error!("chat model error: {}", err);
                self.history.pop();
                FAILED_REPLY.into()
            }
        }
    }
}

pub fn system_prompt(business: &Business, pricing: &PricingTable) -> String {
    let fleet = fleet_summaries(pricing);
    let services: Vec<String> = SERVICES.iter().map(|s| s.summary()).collect();

    format!(
        "You are '{name} Assistant', the helpful AI assistant for {name}, a taxi service in {city}.

Here is our Fleet information:
{fleet}

Here are our Services:
{services}

Your goal is to help users find the right vehicle, explain our services, or guide them to the booking form.
Keep responses concise (under 50 words unless detailed info is requested).
Be polite, professional, and friendly.
If asked for a booking, guide them to use the booking form on the home page.
We do not process payments in the chat.",
        name = business.name,
        city = business.city,
        fleet = serde_json::Value::from(fleet),
        services = serde_json::Value::from(services),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{upstream_error, Error};
    use async_trait::async_trait;

    struct Scripted(Result<String, Error>);

    #[async_trait]
    impl ChatModel for Scripted {
        async fn reply(&self, _: &str, history: &[ChatMessage]) -> Result<String, Error> {
            assert!(!history.is_empty());
            self.0.clone()
        }
    }

    fn session(reply: Result<String, Error>) -> ChatSession {
        ChatSession::initialize(
            Some(Arc::new(Scripted(reply))),
            &Business::default(),
            &PricingTable::default(),
        )
        .unwrap()
    }

    #[test]
    fn no_model_no_session() {
        assert!(
            ChatSession::initialize(None, &Business::default(), &PricingTable::default())
                .is_none()
        );
    }

    #[tokio::test]
    async fn replies_are_kept_in_history() {
        let mut chat = session(Ok("The Innova seats seven.".into()));

        let reply = chat.send("Which car fits 7?").await;

        assert_eq!(reply, "The Innova seats seven.");
        assert_eq!(
            chat.history(),
            &[
                ChatMessage::user("Which car fits 7?"),
                ChatMessage::model("The Innova seats seven."),
            ]
        );
    }

    #[tokio::test]
    async fn empty_reply_gets_a_fallback() {
        let mut chat = session(Ok("  ".into()));

        assert_eq!(chat.send("hello").await, EMPTY_REPLY);
    }

    #[tokio::test]
    async fn failures_apologise_and_drop_the_turn() {
        let mut chat = session(Err(upstream_error()));

        assert_eq!(chat.send("hello").await, FAILED_REPLY);
        assert!(chat.history().is_empty());
    }

    #[test]
    fn prompt_lists_fleet_and_services() {
        let prompt = system_prompt(&Business::default(), &PricingTable::default());

        assert!(prompt.starts_with("You are 'Trustyyellowcabs Assistant'"));
        assert!(prompt.contains("SUV+: ₹150 + ₹45/km"));
        assert!(prompt.contains("Luxury: price on request"));
        assert!(prompt.contains("Airport Transfers: "));
        assert!(prompt.contains("We do not process payments in the chat."));
    }
}
