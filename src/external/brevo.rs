use async_trait::async_trait;
use serde::Serialize;

use crate::{
    config::Config,
    error::{missing_configuration_error, upstream_error, Error},
    external::{EmailMessage, EmailSender},
};

const SEND_EMAIL_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Brevo transactional email. Without an API key every send fails fast.
pub struct BrevoEmailSender {
    client: reqwest::Client,
    api_key: Option<String>,
    sender_name: String,
    sender_email: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct Contact<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: Contact<'a>,
    to: Vec<Contact<'a>>,
    subject: &'a str,
    html_content: &'a str,
}

impl BrevoEmailSender {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config.brevo_api_key.clone(),
            sender_name: format!("{} Booking", config.business.name),
            sender_email: config.business.email.clone(),
        })
    }

    fn request<'a>(&'a self, message: &'a EmailMessage) -> SendEmailRequest<'a> {
        SendEmailRequest {
            sender: Contact {
                name: &self.sender_name,
                email: &self.sender_email,
            },
            to: vec![Contact {
                name: &message.to_name,
                email: &message.to_email,
            }],
            subject: &message.subject,
            html_content: &message.html,
        }
    }
}

#[async_trait]
impl EmailSender for BrevoEmailSender {
    #[tracing::instrument(skip_all, fields(subject = %message.subject))]
    async fn send(&self, message: EmailMessage) -> Result<(), Error> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| missing_configuration_error("BREVO_API_KEY"))?;

        let res = self
            .client
            .post(SEND_EMAIL_URL)
            .header("accept", "application/json")
            .header("api-key", api_key)
            .json(&self.request(&message))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!("brevo rejected email with status {}", res.status());
            return Err(upstream_error());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> Config {
        Config {
            brevo_api_key: api_key.map(String::from),
            ..Config::for_tests()
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            to_email: "ops@example.com".into(),
            to_name: "Ops".into(),
            subject: "Booking Request: Gandhipuram [ Fare: ₹250 ]".into(),
            html: "<p>hi</p>".into(),
        }
    }

    #[test]
    fn request_body_uses_brevo_field_names() {
        let sender = BrevoEmailSender::new(&config(Some("key"))).unwrap();
        let message = message();

        let body = serde_json::to_value(sender.request(&message)).unwrap();

        assert_eq!(body["sender"]["name"], "Trustyyellowcabs Booking");
        assert_eq!(body["sender"]["email"], "trustyyellowcabs@gmail.com");
        assert_eq!(body["to"][0]["email"], "ops@example.com");
        assert_eq!(body["htmlContent"], "<p>hi</p>");
    }

    #[tokio::test]
    async fn missing_api_key_short_circuits() {
        let sender = BrevoEmailSender::new(&config(None)).unwrap();

        let err = sender.send(message()).await.unwrap_err();

        assert_eq!(err, missing_configuration_error("BREVO_API_KEY"));
    }
}
