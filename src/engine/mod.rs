mod booking_api;
mod chat_api;
mod places_api;
mod sessions;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    api::{ContactAPI, DeepLink, API},
    booking::BookingForm,
    chat::ChatSession,
    config::{Business, Config},
    dispatch::Dispatcher,
    entities::PricingTable,
    error::Error,
    external::{
        brevo::BrevoEmailSender, gemini::Gemini, google_maps::GoogleMaps, AddressSuggester,
        ChatModel, DistanceLookup, EmailSender, RouteRenderer,
    },
};

use sessions::Sessions;

/// The third-party capabilities the engine is wired to.
pub struct Providers {
    pub suggester: Arc<dyn AddressSuggester>,
    pub distances: Arc<dyn DistanceLookup>,
    pub routes: Arc<dyn RouteRenderer>,
    pub mailer: Arc<dyn EmailSender>,
    pub chat_model: Option<Arc<dyn ChatModel>>,
}

impl Providers {
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let maps = Arc::new(GoogleMaps::new(config)?);
        let chat_model = Gemini::from_config(config)?.map(|g| Arc::new(g) as Arc<dyn ChatModel>);

        if config.brevo_api_key.is_none() {
            tracing::warn!("BREVO_API_KEY is not set; booking emails will not be delivered");
        }
        if chat_model.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; the chat assistant is disabled");
        }

        Ok(Self {
            suggester: maps.clone(),
            distances: maps.clone(),
            routes: maps,
            mailer: Arc::new(BrevoEmailSender::new(config)?),
            chat_model,
        })
    }
}

pub struct Engine {
    bookings: Mutex<Sessions<BookingForm>>,
    chats: Mutex<Sessions<Arc<Mutex<ChatSession>>>>,
    pricing: PricingTable,
    business: Business,
    suggester: Arc<dyn AddressSuggester>,
    distances: Arc<dyn DistanceLookup>,
    routes: Arc<dyn RouteRenderer>,
    dispatcher: Dispatcher,
    chat_model: Option<Arc<dyn ChatModel>>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let providers = Providers::from_config(config)?;

        Ok(Self::with_providers(config, providers))
    }

    pub fn with_providers(config: &Config, providers: Providers) -> Self {
        Self {
            bookings: Mutex::new(Sessions::new(config.session_ttl)),
            chats: Mutex::new(Sessions::new(config.session_ttl)),
            pricing: PricingTable::default(),
            business: config.business.clone(),
            suggester: providers.suggester,
            distances: providers.distances,
            routes: providers.routes,
            dispatcher: Dispatcher::new(providers.mailer, config.business.clone()),
            chat_model: providers.chat_model,
        }
    }
}

impl ContactAPI for Engine {
    fn whatsapp_inquiry_link(&self) -> DeepLink {
        DeepLink {
            url: self.dispatcher.whatsapp_inquiry_link(),
        }
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use geo_types::LineString;

    use super::*;
    use crate::dispatch::testing::FakeEmailSender;
    use crate::entities::{
        ChatMessage, Distance, PlaceSuggestion, PlaceSuggestions, RoutePreview, RouteRequest,
    };
    use crate::error::upstream_error;

    /// Distances keyed by "origin|destination"; unknown pairs fail.
    #[derive(Default)]
    pub struct FakeMaps {
        pub distances: Mutex<HashMap<String, u64>>,
        pub lookups: AtomicUsize,
    }

    impl FakeMaps {
        pub fn with_distance(self, origin: &str, destination: &str, meters: u64) -> Self {
            self.distances
                .lock()
                .unwrap()
                .insert(format!("{}|{}", origin, destination), meters);
            self
        }

        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DistanceLookup for FakeMaps {
        async fn distance(&self, route: &RouteRequest) -> Result<Distance, Error> {
            self.lookups.fetch_add(1, Ordering::SeqCst);

            let key = format!("{}|{}", route.origin, route.destination);
            let meters = *self
                .distances
                .lock()
                .unwrap()
                .get(&key)
                .ok_or_else(upstream_error)?;

            Ok(Distance {
                text: format!("{:.1} km", meters as f64 / 1000.0),
                meters,
            })
        }
    }

    #[async_trait]
    impl RouteRenderer for FakeMaps {
        async fn render(&self, route: &RouteRequest) -> Result<RoutePreview, Error> {
            Ok(RoutePreview::new(
                route.clone(),
                LineString::from(vec![(76.95, 11.01), (76.99, 11.03)]),
            ))
        }
    }

    #[async_trait]
    impl AddressSuggester for FakeMaps {
        async fn suggest(&self, input: &str, _: &str) -> Result<PlaceSuggestions, Error> {
            Ok(vec![PlaceSuggestion {
                place_id: "place-1".into(),
                description: format!("{}, Coimbatore, Tamil Nadu, India", input),
            }])
        }
    }

    pub struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn reply(&self, _: &str, history: &[ChatMessage]) -> Result<String, Error> {
            Ok(format!("{} turns so far", history.len()))
        }
    }

    pub fn engine(
        maps: Arc<FakeMaps>,
        mailer: Arc<FakeEmailSender>,
        chat_model: Option<Arc<dyn ChatModel>>,
    ) -> Engine {
        let providers = Providers {
            suggester: maps.clone(),
            distances: maps.clone(),
            routes: maps,
            mailer,
            chat_model,
        };

        Engine::with_providers(&Config::for_tests(), providers)
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::api::BookingAPI;
    use crate::booking::Step;
    use crate::dispatch::testing::FakeEmailSender;

    #[test]
    fn new_engine() {
        use tokio_test::block_on;

        let engine = Engine::new(&Config::for_tests()).unwrap();
        let view = block_on(engine.create_booking()).unwrap();

        assert_eq!(view.step, Step::EnteringRoute);
        assert_eq!(block_on(engine.find_booking(view.id)).unwrap().id, view.id);
    }

    #[test]
    fn inquiry_link_uses_business_number() {
        let engine = engine(
            Arc::new(FakeMaps::default()),
            Arc::new(FakeEmailSender::default()),
            None,
        );

        assert!(engine
            .whatsapp_inquiry_link()
            .url
            .starts_with("https://wa.me/918870088020?text=Hi%20Trustyyellowcabs"));
    }
}
