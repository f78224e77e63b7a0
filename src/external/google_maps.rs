use async_trait::async_trait;
use geo_types::{Coord, LineString};
use serde::{de::DeserializeOwned, Deserialize};

use crate::{
    config::Config,
    entities::{Distance, PlaceSuggestions, RoutePreview, RouteRequest},
    error::{invalid_input_error, upstream_error, Error},
    external::{AddressSuggester, DistanceLookup, RouteRenderer},
};

/// Places, Distance Matrix and Directions web services.
#[derive(Clone)]
pub struct GoogleMaps {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    country: String,
}

impl std::fmt::Debug for GoogleMaps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMaps")
            .field("api_base", &self.api_base)
            .field("country", &self.country)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: PlaceSuggestions,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    status: String,
    distance: Option<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    overview_polyline: EncodedPolyline,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

impl GoogleMaps {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        Ok(Self {
            client,
            api_base: config.google_maps_api_base.clone(),
            api_key: config.google_maps_api_key.clone(),
            country: config.places_country.clone(),
        })
    }

    fn url(&self, service: &str) -> String {
        format!("https://{}/maps/api/{}/json", self.api_base, service)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        service: &str,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        let res = self
            .client
            .get(self.url(service))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(res.json().await?)
    }
}

#[async_trait]
impl AddressSuggester for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn suggest(&self, input: &str, session_token: &str) -> Result<PlaceSuggestions, Error> {
        let components = format!("country:{}", self.country);

        let data: AutocompleteResponse = self
            .get(
                "place/autocomplete",
                &[
                    ("input", input),
                    ("components", components.as_str()),
                    ("sessiontoken", session_token),
                ],
            )
            .await?;

        suggestions_from(data)
    }
}

#[async_trait]
impl DistanceLookup for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn distance(&self, route: &RouteRequest) -> Result<Distance, Error> {
        let data: DistanceMatrixResponse = self
            .get(
                "distancematrix",
                &[
                    ("origins", route.origin.as_str()),
                    ("destinations", route.destination.as_str()),
                    ("mode", "driving"),
                    ("units", "metric"),
                ],
            )
            .await?;

        distance_from(data)
    }
}

#[async_trait]
impl RouteRenderer for GoogleMaps {
    #[tracing::instrument(skip(self))]
    async fn render(&self, route: &RouteRequest) -> Result<RoutePreview, Error> {
        let data: DirectionsResponse = self
            .get(
                "directions",
                &[
                    ("origin", route.origin.as_str()),
                    ("destination", route.destination.as_str()),
                    ("mode", "driving"),
                ],
            )
            .await?;

        let path = path_from(data)?;

        Ok(RoutePreview::new(route.clone(), path))
    }
}

fn suggestions_from(data: AutocompleteResponse) -> Result<PlaceSuggestions, Error> {
    if !(data.status == "OK" || data.status == "ZERO_RESULTS") {
        tracing::warn!("autocomplete returned status {}", data.status);
        return Err(upstream_error());
    }

    Ok(data.predictions)
}

fn distance_from(data: DistanceMatrixResponse) -> Result<Distance, Error> {
    if data.status != "OK" {
        tracing::warn!("distance matrix returned status {}", data.status);
        return Err(upstream_error());
    }

    let element = data
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(upstream_error)?;

    // NOT_FOUND / ZERO_RESULTS: the addresses themselves are unusable
    if element.status != "OK" {
        return Err(invalid_input_error());
    }

    let distance = element.distance.ok_or_else(upstream_error)?;

    Ok(Distance {
        text: distance.text,
        meters: distance.value,
    })
}

fn path_from(data: DirectionsResponse) -> Result<LineString<f64>, Error> {
    match data.status.as_str() {
        "OK" => {}
        "NOT_FOUND" | "ZERO_RESULTS" => return Err(invalid_input_error()),
        _ => return Err(upstream_error()),
    }

    let route = data.routes.into_iter().next().ok_or_else(upstream_error)?;

    decode_polyline(&route.overview_polyline.points)
}

/// Decodes the Encoded Polyline Algorithm Format at 1e-5 precision.
pub fn decode_polyline(encoded: &str) -> Result<LineString<f64>, Error> {
    let bytes = encoded.as_bytes();
    let mut index = 0;
    let (mut lat, mut lng) = (0i64, 0i64);
    let mut coords = Vec::new();

    while index < bytes.len() {
        lat += next_polyline_value(bytes, &mut index)?;
        lng += next_polyline_value(bytes, &mut index)?;

        coords.push(Coord {
            x: lng as f64 / 1e5,
            y: lat as f64 / 1e5,
        });
    }

    Ok(LineString::from(coords))
}

fn next_polyline_value(bytes: &[u8], index: &mut usize) -> Result<i64, Error> {
    let mut result = 0i64;
    let mut shift = 0;

    loop {
        let chunk = *bytes.get(*index).ok_or_else(upstream_error)? as i64 - 63;
        if !(0..64).contains(&chunk) || shift > 60 {
            return Err(upstream_error());
        }
        *index += 1;

        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    if result & 1 != 0 {
        Ok(!(result >> 1))
    } else {
        Ok(result >> 1)
    }
}
