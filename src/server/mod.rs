mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::error::{unexpected_error, Error};
use crate::server::handlers::{bookings, chat, contact, places};

type DynAPI = Arc<dyn API + Send + Sync>;

fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/bookings", post(bookings::create))
        .route(
            "/bookings/:id",
            get(bookings::find).patch(bookings::update),
        )
        .route("/bookings/:id/advance", post(bookings::advance))
        .route("/bookings/:id/back", post(bookings::back))
        .route("/bookings/:id/vehicle", patch(bookings::select_vehicle))
        .route("/bookings/:id/submit", post(bookings::submit))
        .route("/bookings/:id/restart", post(bookings::restart))
        .route("/bookings/:id/whatsapp", get(bookings::whatsapp_link))
        .route("/places/suggestions", get(places::find_suggestions))
        .route("/chat/messages", post(chat::send_message))
        .route("/contact/whatsapp", get(contact::whatsapp_link))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(Arc::new(api) as DynAPI);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!("server stopped: {}", err);
            unexpected_error()
        })
}
