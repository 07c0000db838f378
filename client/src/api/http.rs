//! HTTP implementation of [`ApiClient`] over reqwest.

use super::{
    ApiClient, ApiFuture, PaymentsEnvelope, ReservationsEnvelope, RoomEnvelope, RoomsEnvelope,
};
use crate::config::Config;
use crate::error::ApiError;
use crate::session::TokenStore;
use crate::types::{
    AuthResponse, NewReservation, NewRoom, Registration, RoomStatus,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use std::sync::Arc;

/// Error body shape used by the server for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Production API client.
///
/// Reads the bearer token from the shared [`TokenStore`] at call time, so a
/// login or logout in one feature is visible to every subsequent request
/// without re-wiring anything.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpApiClient {
    /// Create a client for the configured base URL.
    #[must_use]
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Build a request with the bearer header when a token is stored.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "api request");

        let builder = self.client.request(method, url);
        match self.tokens.load() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-success response into [`ApiError::Status`].
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| {
                if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    body
                }
            },
            |parsed| parsed.detail,
        );

        tracing::warn!(status = status.as_u16(), %message, "api request failed");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Send, check the status, and decode the 2xx body.
    async fn decode<T: serde::de::DeserializeOwned>(
        builder: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let response = Self::check(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Send and check the status, discarding the body.
    async fn execute(builder: RequestBuilder) -> Result<(), ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }
}

impl ApiClient for HttpApiClient {
    fn login(&self, email: String, password: String) -> ApiFuture<AuthResponse> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&serde_json::json!({ "email": email, "password": password }));
        Box::pin(Self::decode(builder))
    }

    fn register(&self, registration: Registration) -> ApiFuture<()> {
        // The server expects an explicit role; self-registration is always a guest.
        let mut body = match serde_json::to_value(&registration) {
            Ok(value) => value,
            Err(e) => return Box::pin(async move { Err(ApiError::Decode(e.to_string())) }),
        };
        if let Some(map) = body.as_object_mut() {
            map.insert("role".to_string(), serde_json::Value::from("user"));
        }
        let builder = self.request(Method::POST, "/auth/register").json(&body);
        Box::pin(Self::execute(builder))
    }

    fn me(&self) -> ApiFuture<crate::types::User> {
        let builder = self.request(Method::GET, "/auth/me");
        Box::pin(Self::decode(builder))
    }

    fn rooms(&self) -> ApiFuture<Vec<crate::types::Room>> {
        let builder = self.request(Method::GET, "/rooms");
        Box::pin(async move {
            let envelope: RoomsEnvelope = Self::decode(builder).await?;
            Ok(envelope.into_rooms())
        })
    }

    fn room(&self, id: u64) -> ApiFuture<crate::types::Room> {
        let builder = self.request(Method::GET, &format!("/rooms/{id}"));
        Box::pin(async move {
            let envelope: RoomEnvelope = Self::decode(builder).await?;
            Ok(envelope.into_room())
        })
    }

    fn create_room(&self, room: NewRoom) -> ApiFuture<()> {
        let builder = self.request(Method::POST, "/rooms").json(&room);
        Box::pin(Self::execute(builder))
    }

    fn set_room_status(&self, id: u64, status: RoomStatus) -> ApiFuture<()> {
        let builder = self
            .request(Method::PUT, &format!("/rooms/{id}/status"))
            .json(&serde_json::json!({ "status": status }));
        Box::pin(Self::execute(builder))
    }

    fn reservations(&self) -> ApiFuture<Vec<crate::types::Reservation>> {
        let builder = self.request(Method::GET, "/reservations");
        Box::pin(async move {
            let envelope: ReservationsEnvelope = Self::decode(builder).await?;
            Ok(envelope.into_reservations())
        })
    }

    fn create_reservation(&self, reservation: NewReservation) -> ApiFuture<()> {
        let builder = self.request(Method::POST, "/reservations").json(&reservation);
        Box::pin(Self::execute(builder))
    }

    fn pay_reservation(&self, id: u64) -> ApiFuture<()> {
        let builder = self.request(Method::POST, &format!("/reservations/{id}/pay"));
        Box::pin(Self::execute(builder))
    }

    fn cancel_reservation(&self, id: u64) -> ApiFuture<()> {
        let builder = self.request(Method::DELETE, &format!("/reservations/{id}"));
        Box::pin(Self::execute(builder))
    }

    fn payments(&self, reservation_id: u64) -> ApiFuture<Vec<crate::types::Payment>> {
        let builder = self.request(
            Method::GET,
            &format!("/payments?reservation_id={reservation_id}"),
        );
        Box::pin(async move {
            let envelope: PaymentsEnvelope = Self::decode(builder).await?;
            Ok(envelope.into_payments())
        })
    }
}
