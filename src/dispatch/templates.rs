use crate::entities::BookingDetails;

pub fn email_subject(details: &BookingDetails) -> String {
    format!(
        "Booking Request: {} [ Fare: {} ]",
        details.pickup,
        details.fare_text().unwrap_or_else(|| "N/A".into())
    )
}

pub fn email_html(details: &BookingDetails, business_name: &str) -> String {
    let fare = details
        .fare_text()
        .unwrap_or_else(|| "Calculated on call".into());
    let distance = details.distance_text().unwrap_or("Unknown");
    let schedule = format!(
        "{} at {}",
        details.date.as_deref().unwrap_or_default(),
        details.time.as_deref().unwrap_or_default()
    );

    let rows = [
        ("Customer", escape(&details.name)),
        (
            "Phone",
            format!(
                r#"<a href="tel:{phone}">{phone}</a>"#,
                phone = escape(&details.phone)
            ),
        ),
        ("Pickup", escape(&details.pickup)),
        ("Destination", escape(&details.drop)),
        ("Vehicle Type", escape(details.vehicle_type.name())),
        ("Schedule", escape(&schedule)),
    ]
    .iter()
    .map(|(label, value)| {
        format!(
            r#"<tr><td style="padding: 12px 0; border-bottom: 1px solid #f1f5f9; color: #64748b;">{}</td><td style="padding: 12px 0; border-bottom: 1px solid #f1f5f9; font-weight: bold;">{}</td></tr>"#,
            label, value
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r#"<div style="font-family: sans-serif; color: #1e293b; max-width: 600px; margin: 0 auto; border: 1px solid #f1f5f9; border-radius: 12px; overflow: hidden;">
  <div style="background-color: #FDB813; padding: 30px; text-align: center;">
    <h1 style="margin: 0; font-size: 24px; color: #0f172a;">New Web Booking</h1>
  </div>
  <div style="padding: 30px;">
    <div style="background-color: #f8fafc; padding: 20px; border-radius: 8px; margin-bottom: 25px;">
      <p style="margin: 0 0 10px 0; font-size: 14px; color: #64748b; text-transform: uppercase; letter-spacing: 1px;">Estimated Quote</p>
      <h2 style="margin: 0; font-size: 32px; color: #0f172a;">{fare}</h2>
      <p style="margin: 5px 0 0 0; font-size: 14px; color: #0f172a;">Total distance: <strong>{distance}</strong></p>
    </div>
    <table style="width: 100%; border-collapse: collapse;">
{rows}
    </table>
    <div style="margin-top: 30px; text-align: center;">
      <a href="https://wa.me/{reply_to}" style="background-color: #25D366; color: white; padding: 14px 28px; text-decoration: none; border-radius: 8px; font-weight: bold; display: inline-block;">Reply on WhatsApp</a>
    </div>
  </div>
  <div style="background-color: #f1f5f9; padding: 15px; text-align: center; font-size: 12px; color: #94a3b8;">
    Sent from {business} Booking System
  </div>
</div>"#,
        fare = escape(&fare),
        distance = escape(distance),
        rows = rows,
        reply_to = details.phone_digits(),
        business = escape(business_name),
    )
}

/// Plain-text summary prefilled into the business WhatsApp chat.
pub fn whatsapp_summary(details: &BookingDetails) -> String {
    let fare = match details.estimated_fare {
        Some(fare) if fare.is_manual_quote() => "Price on Request".to_string(),
        Some(fare) => fare.to_string(),
        None => String::new(),
    };

    [
        "*NEW RIDE BOOKING CONFIRMATION*".to_string(),
        format!("*Name:* {}", details.name),
        format!("*Phone:* {}", details.phone),
        format!("*Vehicle:* {}", details.vehicle_type),
        format!("*Pickup:* {}", details.pickup),
        format!("*Drop:* {}", details.drop),
        format!("*Fare:* {}", fare),
        "Confirmed via website. Please dispatch a driver.".to_string(),
    ]
    .join("\n")
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Distance, FareResult, VehicleCategory};

    fn details() -> BookingDetails {
        BookingDetails {
            name: "Asha <Admin>".into(),
            phone: "+91 98765 43210".into(),
            pickup: "Gandhipuram".into(),
            drop: "Coimbatore Airport".into(),
            date: Some("Today".into()),
            time: Some("ASAP".into()),
            vehicle_type: VehicleCategory::Sedan,
            distance: Some(Distance {
                text: "12.3 km".into(),
                meters: 12300,
            }),
            estimated_fare: Some(FareResult::Amount(412)),
        }
    }

    #[test]
    fn subject_falls_back_to_na() {
        let mut details = details();
        assert_eq!(email_subject(&details), "Booking Request: Gandhipuram [ Fare: ₹412 ]");

        details.estimated_fare = None;
        assert_eq!(email_subject(&details), "Booking Request: Gandhipuram [ Fare: N/A ]");
    }

    #[test]
    fn html_contains_every_field_escaped() {
        let html = email_html(&details(), "Trustyyellowcabs");

        assert!(html.contains("Asha &lt;Admin&gt;"));
        assert!(!html.contains("<Admin>"));
        assert!(html.contains("₹412"));
        assert!(html.contains("12.3 km"));
        assert!(html.contains("Coimbatore Airport"));
        assert!(html.contains("Sedan"));
        assert!(html.contains("Today at ASAP"));
        assert!(html.contains("https://wa.me/919876543210"));
        assert!(html.contains("Sent from Trustyyellowcabs Booking System"));
    }

    #[test]
    fn html_placeholders_without_fare() {
        let html = email_html(
            &BookingDetails {
                estimated_fare: None,
                distance: None,
                ..details()
            },
            "Trustyyellowcabs",
        );

        assert!(html.contains("Calculated on call"));
        assert!(html.contains("Unknown"));
    }

    #[test]
    fn whatsapp_summary_hides_manual_quote_sentinel() {
        let summary = whatsapp_summary(&BookingDetails {
            vehicle_type: VehicleCategory::TempoTraveller,
            estimated_fare: Some(FareResult::ManualQuote),
            ..details()
        });

        assert!(summary.starts_with("*NEW RIDE BOOKING CONFIRMATION*\n"));
        assert!(summary.contains("*Vehicle:* Tempo Traveller\n"));
        assert!(summary.contains("*Fare:* Price on Request\n"));
        assert!(summary.ends_with("Please dispatch a driver."));
    }
}
