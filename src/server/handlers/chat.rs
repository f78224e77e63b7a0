use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::ChatReply;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SendMessageParams {
    chat_id: Option<Uuid>,
    message: String,
}

pub async fn send_message(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<SendMessageParams>,
) -> Result<Json<ChatReply>, Error> {
    let reply = api.send_chat_message(params.chat_id, params.message).await?;

    Ok(reply.into())
}
