use super::Engine;

use async_trait::async_trait;

use crate::{api::PlacesAPI, entities::PlaceSuggestions, error::Error};

#[async_trait]
impl PlacesAPI for Engine {
    #[tracing::instrument(skip(self, session_token))]
    async fn suggest_places(
        &self,
        input: String,
        session_token: String,
    ) -> Result<PlaceSuggestions, Error> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(vec![]);
        }

        self.suggester.suggest(input, &session_token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testing::{engine, FakeMaps};
    use super::*;
    use crate::dispatch::testing::FakeEmailSender;

    #[tokio::test]
    async fn suggestions_come_from_the_provider() {
        let engine = engine(
            Arc::new(FakeMaps::default()),
            Arc::new(FakeEmailSender::default()),
            None,
        );

        let suggestions = engine
            .suggest_places(" Gandhipuram ".into(), "token-1".into())
            .await
            .unwrap();

        assert_eq!(suggestions.len(), 1);
        assert_eq!(
            suggestions[0].description,
            "Gandhipuram, Coimbatore, Tamil Nadu, India"
        );
    }

    #[tokio::test]
    async fn blank_input_has_no_suggestions() {
        let engine = engine(
            Arc::new(FakeMaps::default()),
            Arc::new(FakeEmailSender::default()),
            None,
        );

        assert!(engine
            .suggest_places("   ".into(), "token-1".into())
            .await
            .unwrap()
            .is_empty());
    }
}
