use axum::extract::{Extension, Json};

use crate::api::DeepLink;
use crate::server::DynAPI;

pub async fn whatsapp_link(Extension(api): Extension<DynAPI>) -> Json<DeepLink> {
    api.whatsapp_inquiry_link().into()
}
