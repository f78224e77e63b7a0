use super::Engine;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::{ChatAPI, ChatReply},
    chat::{ChatSession, NOT_CONNECTED_REPLY},
    error::{validation_error, Error},
};

#[async_trait]
impl ChatAPI for Engine {
    /// Opens a session on first use (or after expiry). Turns on the same
    /// session are serialized by its own lock.
    #[tracing::instrument(skip(self, message))]
    async fn send_chat_message(
        &self,
        chat_id: Option<Uuid>,
        message: String,
    ) -> Result<ChatReply, Error> {
        if message.trim().is_empty() {
            return Err(validation_error("Please type a message."));
        }

        let opened = {
            let mut chats = self.chats.lock().await;

            let existing = chat_id.and_then(|id| {
                chats
                    .get_mut(&id)
                    .ok()
                    .map(|session| (id, session.clone()))
            });

            existing.or_else(|| {
                ChatSession::initialize(self.chat_model.clone(), &self.business, &self.pricing)
                    .map(|session| {
                        let session = Arc::new(Mutex::new(session));
                        (chats.insert(session.clone()), session)
                    })
            })
        };

        let (id, session) = match opened {
            Some(opened) => opened,
            None => {
                return Ok(ChatReply {
                    chat_id: None,
                    reply: NOT_CONNECTED_REPLY.into(),
                })
            }
        };

        let reply = session.lock().await.send(&message).await;

        Ok(ChatReply {
            chat_id: Some(id),
            reply,
        })
    }
}
