use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DeepLink;
use crate::booking::BookingView;
use crate::entities::{BookingUpdate, VehicleCategory};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct SelectVehicleParams {
    vehicle: VehicleCategory,
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<BookingView>, Error> {
    let booking = api.create_booking().await?;

    Ok(booking.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.find_booking(id).await?;

    Ok(booking.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(update): Json<BookingUpdate>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.update_booking(id, update).await?;

    Ok(booking.into())
}

pub async fn advance(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.advance_booking(id).await?;

    Ok(booking.into())
}

pub async fn back(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.return_to_route(id).await?;

    Ok(booking.into())
}

pub async fn select_vehicle(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<SelectVehicleParams>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.select_vehicle(id, params.vehicle).await?;

    Ok(booking.into())
}

pub async fn submit(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.submit_booking(id).await?;

    Ok(booking.into())
}

pub async fn restart(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, Error> {
    let booking = api.restart_booking(id).await?;

    Ok(booking.into())
}

pub async fn whatsapp_link(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeepLink>, Error> {
    let link = api.booking_whatsapp_link(id).await?;

    Ok(link.into())
}
