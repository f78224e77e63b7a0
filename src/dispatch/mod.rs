//! Hands finished bookings to the business: transactional email, plus
//! WhatsApp deep links the customer opens themselves.

mod templates;

use std::sync::Arc;

use crate::config::Business;
use crate::entities::BookingDetails;
use crate::external::{EmailMessage, EmailSender};

pub use templates::{email_html, email_subject, whatsapp_summary};

pub struct Dispatcher {
    mailer: Arc<dyn EmailSender>,
    business: Business,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn EmailSender>, business: Business) -> Self {
        Self { mailer, business }
    }

    /// Emails the booking to the business inbox. Failures are logged and
    /// reported as `false`, never raised.
    #[tracing::instrument(skip_all, fields(pickup = %details.pickup, vehicle = %details.vehicle_type))]
    pub async fn send(&self, details: &BookingDetails) -> bool {
        let message = EmailMessage {
            to_email: self.business.email.clone(),
            to_name: format!("{} Admin", self.business.name),
            subject: email_subject(details),
            html: email_html(details, &self.business.name),
        };

        match self.mailer.send(message).await {
            Ok(()) => {
                tracing::info!("booking email sent");
                true
            }
            Err(err) => {
                tracing::error!("booking email failed: {}", err);
                false
            }
        }
    }

    pub fn whatsapp_booking_link(&self, details: &BookingDetails) -> String {
        whatsapp_link(&self.business.whatsapp_number, &whatsapp_summary(details))
    }

    pub fn whatsapp_inquiry_link(&self) -> String {
        let text = format!(
            "Hi {}, I have an inquiry about your taxi services in {}.",
            self.business.name, self.business.city
        );

        whatsapp_link(&self.business.whatsapp_number, &text)
    }
}

pub fn whatsapp_link(number: &str, text: &str) -> String {
    format!("https://wa.me/{}?text={}", number, urlencoding::encode(text))
}
