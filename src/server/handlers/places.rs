use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::PlaceSuggestions;
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SuggestionParams {
    input: String,
    #[serde(default)]
    session_token: String,
}

pub async fn find_suggestions(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<SuggestionParams>,
) -> Result<Json<PlaceSuggestions>, Error> {
    let suggestions = api
        .suggest_places(params.input, params.session_token)
        .await?;

    Ok(suggestions.into())
}
