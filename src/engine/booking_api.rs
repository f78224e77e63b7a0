use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::{BookingAPI, DeepLink},
    booking::{BookingForm, BookingView, FareTicket},
    entities::{BookingUpdate, VehicleCategory},
    error::Error,
};

impl Engine {
    /// Performs a lookup outside the session lock, then hands the result back
    /// to the form, which drops it if the ticket has been superseded.
    async fn resolve_fare(&self, id: Uuid, ticket: Option<FareTicket>) -> Result<BookingView, Error> {
        if let Some(ticket) = ticket {
            let result = self.distances.distance(&ticket.route).await;

            let mut bookings = self.bookings.lock().await;
            let form = bookings.get_mut(&id)?;
            form.complete_fare(&ticket, result);

            return Ok(form.view(id));
        }

        self.find_booking(id).await
    }
}

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_booking(&self) -> Result<BookingView, Error> {
        let form = BookingForm::new(self.pricing.clone());
        let view = form.view(Uuid::nil());

        let id = self.bookings.lock().await.insert(form);

        tracing::info!("created booking {}", id);

        Ok(BookingView { id, ..view })
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, id: Uuid) -> Result<BookingView, Error> {
        let mut bookings = self.bookings.lock().await;

        Ok(bookings.get_mut(&id)?.view(id))
    }

    #[tracing::instrument(skip(self))]
    async fn update_booking(&self, id: Uuid, update: BookingUpdate) -> Result<BookingView, Error> {
        let ticket = self.bookings.lock().await.get_mut(&id)?.update(update)?;

        self.resolve_fare(id, ticket).await
    }

    #[tracing::instrument(skip(self))]
    async fn advance_booking(&self, id: Uuid) -> Result<BookingView, Error> {
        let advance = self.bookings.lock().await.get_mut(&id)?.advance()?;

        let (view, preview) = futures::join!(
            self.resolve_fare(id, advance.fare_lookup),
            self.routes.render(&advance.route)
        );

        match preview {
            Ok(preview) => {
                let mut bookings = self.bookings.lock().await;
                let form = bookings.get_mut(&id)?;
                form.attach_route_preview(preview);

                Ok(form.view(id))
            }
            Err(err) => {
                tracing::warn!("route preview failed: {}", err);
                view
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn return_to_route(&self, id: Uuid) -> Result<BookingView, Error> {
        let mut bookings = self.bookings.lock().await;
        let form = bookings.get_mut(&id)?;
        form.back()?;

        Ok(form.view(id))
    }

    #[tracing::instrument(skip(self))]
    async fn select_vehicle(
        &self,
        id: Uuid,
        vehicle: VehicleCategory,
    ) -> Result<BookingView, Error> {
        let ticket = self.bookings.lock().await.get_mut(&id)?.select_vehicle(vehicle)?;

        self.resolve_fare(id, ticket).await
    }

    #[tracing::instrument(skip(self))]
    async fn submit_booking(&self, id: Uuid) -> Result<BookingView, Error> {
        let details = self.bookings.lock().await.get_mut(&id)?.prepare_submission()?;

        if !self.dispatcher.send(&details).await {
            // the customer still sees a confirmed booking
            tracing::warn!("booking {} dispatch failed; reporting success anyway", id);
        }

        let mut bookings = self.bookings.lock().await;
        let form = bookings.get_mut(&id)?;
        form.mark_submitted()?;

        Ok(form.view(id))
    }

    #[tracing::instrument(skip(self))]
    async fn restart_booking(&self, id: Uuid) -> Result<BookingView, Error> {
        let mut bookings = self.bookings.lock().await;
        let form = bookings.get_mut(&id)?;
        form.restart()?;

        Ok(form.view(id))
    }

    #[tracing::instrument(skip(self))]
    async fn booking_whatsapp_link(&self, id: Uuid) -> Result<DeepLink, Error> {
        let mut bookings = self.bookings.lock().await;
        let form = bookings.get_mut(&id)?;

        Ok(DeepLink {
            url: self.dispatcher.whatsapp_booking_link(form.details()),
        })
    }
}
