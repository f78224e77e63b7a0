//! The two-step booking wizard.
//!
//! `BookingForm` owns one booking attempt. It never performs I/O itself:
//! whenever a distance is needed it hands out a [`FareTicket`], the caller
//! resolves it against a `DistanceLookup` and reports back through
//! [`BookingForm::complete_fare`]. Only the most recently issued ticket is
//! accepted, so a slow response for a superseded category or route cannot
//! overwrite a newer fare.

use chrono::{FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    BookingDetails, BookingUpdate, Distance, FareResult, PricingTable, RoutePreview, RouteRequest,
    VehicleCategory,
};
use crate::error::{invalid_state_error, validation_error, Error};

pub const MISSING_ROUTE: &str = "Please enter pickup and destination.";
pub const MISSING_CONTACT: &str = "Please enter your name and phone number.";
pub const INVALID_DATE: &str = "Please choose a valid pickup date.";
pub const PAST_DATE: &str = "Pickup date cannot be in the past.";
pub const FARE_PENDING: &str = "Please wait for the fare estimate.";

const IST_OFFSET_SECS: i32 = (5 * 60 + 30) * 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    EnteringRoute,
    ReviewingAndConfirming,
    /// The booking is being dispatched; the form is frozen.
    Submitting,
    Submitted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FareStatus {
    Idle,
    Loading,
    Ready,
    /// The distance lookup failed; no fare is shown.
    Unavailable,
}

/// A pending distance lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct FareTicket {
    pub token: u64,
    pub route: RouteRequest,
    pub vehicle: VehicleCategory,
}

/// What the caller must fetch after moving to the review step.
#[derive(Clone, Debug, PartialEq)]
pub struct Advance {
    pub route: RouteRequest,
    pub fare_lookup: Option<FareTicket>,
}

#[derive(Clone, Debug, Serialize)]
pub struct BookingView {
    pub id: Uuid,
    pub step: Step,
    pub details: BookingDetails,
    pub fare_status: FareStatus,
    pub fare_display: Option<String>,
    pub is_manual_pricing: bool,
    pub route_preview: Option<RoutePreview>,
}

#[derive(Clone, Debug)]
pub struct BookingForm {
    details: BookingDetails,
    step: Step,
    fare_status: FareStatus,
    route_preview: Option<RoutePreview>,
    cached_distance: Option<(RouteRequest, Distance)>,
    latest_ticket: u64,
    pricing: PricingTable,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self::new(PricingTable::default())
    }
}

impl BookingForm {
    pub fn new(pricing: PricingTable) -> Self {
        Self {
            details: BookingDetails::default(),
            step: Step::EnteringRoute,
            fare_status: FareStatus::Idle,
            route_preview: None,
            cached_distance: None,
            latest_ticket: 0,
            pricing,
        }
    }

    pub fn details(&self) -> &BookingDetails {
        &self.details
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn fare_status(&self) -> FareStatus {
        self.fare_status
    }

    pub fn route_preview(&self) -> Option<&RoutePreview> {
        self.route_preview.as_ref()
    }

    pub fn is_manual_pricing(&self) -> bool {
        !self.pricing.tariff(self.details.vehicle_type).needs_distance()
    }

    pub fn view(&self, id: Uuid) -> BookingView {
        BookingView {
            id,
            step: self.step,
            details: self.details.clone(),
            fare_status: self.fare_status,
            fare_display: self.details.fare_text(),
            is_manual_pricing: self.is_manual_pricing(),
            route_preview: self.route_preview.clone(),
        }
    }

    fn route(&self) -> RouteRequest {
        RouteRequest::new(self.details.pickup.trim(), self.details.drop.trim())
    }

    /// Applies user input field by field. A vehicle change on the review
    /// step recalculates the fare and may return a lookup to perform.
    #[tracing::instrument(skip(self))]
    pub fn update(&mut self, update: BookingUpdate) -> Result<Option<FareTicket>, Error> {
        if matches!(self.step, Step::Submitting | Step::Submitted) {
            return Err(invalid_state_error());
        }

        // the route is fixed once the customer is reviewing it
        if self.step == Step::ReviewingAndConfirming
            && (update.pickup.is_some() || update.drop.is_some())
        {
            return Err(invalid_state_error());
        }

        let route_before = self.route();

        if let Some(name) = update.name {
            self.details.name = name;
        }
        if let Some(phone) = update.phone {
            self.details.phone = phone;
        }
        if let Some(pickup) = update.pickup {
            self.details.pickup = pickup;
        }
        if let Some(drop) = update.drop {
            self.details.drop = drop;
        }
        if let Some(date) = update.date {
            self.details.date = Some(date).filter(|d| !d.trim().is_empty());
        }
        if let Some(time) = update.time {
            self.details.time = Some(time).filter(|t| !t.trim().is_empty());
        }

        if self.route() != route_before {
            self.settle_fare_offline();
        }

        match update.vehicle_type {
            Some(vehicle) => self.select_vehicle(vehicle),
            None => Ok(None),
        }
    }

    pub fn advance(&mut self) -> Result<Advance, Error> {
        self.advance_on(india_today())
    }

    /// Moves to the review step. Validation failures leave the step unchanged.
    #[tracing::instrument(skip(self))]
    pub fn advance_on(&mut self, today: NaiveDate) -> Result<Advance, Error> {
        if self.step != Step::EnteringRoute {
            return Err(invalid_state_error());
        }

        let route = self.route();
        if route.origin.is_empty() || route.destination.is_empty() {
            return Err(validation_error(MISSING_ROUTE));
        }

        if let Some(date) = &self.details.date {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| validation_error(INVALID_DATE))?;
            if date < today {
                return Err(validation_error(PAST_DATE));
            }
        }

        self.details.pickup = route.origin.clone();
        self.details.drop = route.destination.clone();

        if self.route_preview.as_ref().map(|p| &p.route) != Some(&route) {
            self.route_preview = None;
        }

        self.step = Step::ReviewingAndConfirming;

        let fare_lookup = self.refresh_fare();

        Ok(Advance { route, fare_lookup })
    }

    #[tracing::instrument(skip(self))]
    pub fn select_vehicle(&mut self, vehicle: VehicleCategory) -> Result<Option<FareTicket>, Error> {
        match self.step {
            Step::Submitting | Step::Submitted => Err(invalid_state_error()),
            Step::EnteringRoute => {
                self.details.vehicle_type = vehicle;
                self.settle_fare_offline();
                Ok(None)
            }
            Step::ReviewingAndConfirming => {
                self.details.vehicle_type = vehicle;
                Ok(self.refresh_fare())
            }
        }
    }

    /// Settles the fare for the review step, handing out a ticket when only
    /// a fresh distance lookup can price it.
    fn refresh_fare(&mut self) -> Option<FareTicket> {
        self.settle_fare_offline();

        if self.fare_status != FareStatus::Idle {
            return None;
        }

        self.fare_status = FareStatus::Loading;

        Some(FareTicket {
            token: self.latest_ticket,
            route: self.route(),
            vehicle: self.details.vehicle_type,
        })
    }

    /// Brings the fare in line with the current vehicle and route without a
    /// lookup: manual quote, a cached distance, or nothing until the next advance.
    fn settle_fare_offline(&mut self) {
        // a lookup in flight was for the old vehicle or route
        self.latest_ticket += 1;

        if !self.pricing.tariff(self.details.vehicle_type).needs_distance() {
            self.details.distance = None;
            self.details.estimated_fare = Some(FareResult::ManualQuote);
            self.fare_status = FareStatus::Ready;
            return;
        }

        let route = self.route();
        let cached = self
            .cached_distance
            .as_ref()
            .filter(|(cached_route, _)| *cached_route == route)
            .map(|(_, distance)| distance.clone());

        match cached {
            Some(distance) => self.apply_distance(distance),
            None => {
                self.details.distance = None;
                self.details.estimated_fare = None;
                self.fare_status = FareStatus::Idle;
            }
        }
    }

    fn apply_distance(&mut self, distance: Distance) {
        let fare = self
            .pricing
            .estimate(distance.km(), self.details.vehicle_type);

        self.details.distance = Some(distance);
        self.details.estimated_fare = Some(fare);
        self.fare_status = FareStatus::Ready;
    }

    /// Reports the outcome of a lookup. Returns whether it was applied;
    /// results for superseded tickets are dropped.
    #[tracing::instrument(skip(self, result))]
    pub fn complete_fare(&mut self, ticket: &FareTicket, result: Result<Distance, Error>) -> bool {
        if ticket.token != self.latest_ticket
            || ticket.vehicle != self.details.vehicle_type
            || ticket.route != self.route()
        {
            tracing::debug!("discarding superseded fare lookup");
            return false;
        }

        match result {
            Ok(distance) => {
                self.cached_distance = Some((ticket.route.clone(), distance.clone()));
                self.apply_distance(distance);
            }
            Err(err) => {
                tracing::warn!("distance lookup failed: {}", err);
                self.fare_status = FareStatus::Unavailable;
            }
        }

        true
    }

    /// Stores a rendered route if it still matches what the customer entered.
    pub fn attach_route_preview(&mut self, preview: RoutePreview) -> bool {
        if preview.route != self.route() {
            return false;
        }

        self.route_preview = Some(preview);
        true
    }

    pub fn back(&mut self) -> Result<(), Error> {
        if self.step != Step::ReviewingAndConfirming {
            return Err(invalid_state_error());
        }

        self.step = Step::EnteringRoute;
        Ok(())
    }

    /// Validates contact details and returns the record as it will be sent,
    /// with schedule defaults filled in. On success the form moves to
    /// `Submitting` and stays frozen until [`BookingForm::mark_submitted`].
    #[tracing::instrument(skip(self))]
    pub fn prepare_submission(&mut self) -> Result<BookingDetails, Error> {
        if self.step != Step::ReviewingAndConfirming {
            return Err(invalid_state_error());
        }

        if self.details.name.trim().is_empty() || self.details.phone.trim().is_empty() {
            return Err(validation_error(MISSING_CONTACT));
        }

        if self.fare_status == FareStatus::Loading {
            return Err(validation_error(FARE_PENDING));
        }

        let mut details = self.details.clone();
        details.date = Some(details.date.unwrap_or_else(|| "Today".into()));
        details.time = Some(match details.time {
            Some(time) => format!("{} (IST)", time),
            None => "ASAP".into(),
        });

        self.step = Step::Submitting;

        Ok(details)
    }

    /// Terminal: the booking counts as submitted whatever dispatch reported.
    pub fn mark_submitted(&mut self) -> Result<(), Error> {
        if self.step != Step::Submitting {
            return Err(invalid_state_error());
        }

        self.step = Step::Submitted;
        Ok(())
    }

    /// Starts over with an empty record. Not allowed mid-dispatch.
    pub fn restart(&mut self) -> Result<(), Error> {
        if self.step == Step::Submitting {
            return Err(invalid_state_error());
        }

        let latest_ticket = self.latest_ticket + 1;

        *self = Self::new(self.pricing.clone());
        self.latest_ticket = latest_ticket;

        Ok(())
    }
}

/// Today's date in India Standard Time.
pub fn india_today() -> NaiveDate {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(ist) => Utc::now().with_timezone(&ist).date_naive(),
        None => Utc::now().date_naive(),
    }
}
