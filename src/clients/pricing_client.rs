//! Cliente HTTP del servicio de pricing
//!
//! `POST {base}/prices` devuelve `{price}`

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{http_client, read_json, transport_error, trim_base_url};
use crate::models::Vehicle;
use crate::services::providers::{PricingProvider, PRICING_PROVIDER};
use crate::utils::errors::ProviderError;

#[derive(Debug, Serialize)]
struct PriceRequest<'a> {
    vin: &'a str,
    odometer: i32,
    grade: i32,
    msrp: Decimal,
    exterior_color: Option<&'a str>,
    interior_color: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Decimal,
}

pub struct PricingClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl PricingClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: trim_base_url(base_url),
            timeout,
        })
    }
}

#[async_trait]
impl PricingProvider for PricingClient {
    async fn get_recommended_price(&self, vehicle: &Vehicle) -> Result<Decimal, ProviderError> {
        let url = format!("{}/prices", self.base_url);
        debug!("🌐 POST {} (VIN {})", url, vehicle.vin);

        let request = PriceRequest {
            vin: &vehicle.vin,
            odometer: vehicle.odometer,
            grade: vehicle.grade,
            msrp: vehicle.msrp,
            exterior_color: vehicle.exterior_color.as_deref(),
            interior_color: vehicle.interior_color.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PRICING_PROVIDER, self.timeout, e))?;

        let body: PriceResponse = read_json(PRICING_PROVIDER, self.timeout, response).await?;
        if body.price.is_sign_negative() {
            return Err(ProviderError::InvalidResponse {
                provider: PRICING_PROVIDER,
                message: format!("negative price {}", body.price),
            });
        }
        Ok(body.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn vehicle() -> Vehicle {
        Vehicle {
            vin: "1HGBH41JXMN109186".to_string(),
            grade: 47,
            odometer: 30_000,
            msrp: Decimal::from(99_000),
            exterior_color: Some("Black".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn returns_recommended_price() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/prices"))
            .and(body_partial_json(serde_json::json!({
                "grade": 47,
                "exterior_color": "Black"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "price": 97951 })))
            .mount(&server)
            .await;

        let client = PricingClient::new(&server.uri(), Duration::from_secs(2)).unwrap();
        let price = client.get_recommended_price(&vehicle()).await.unwrap();
        assert_eq!(price, Decimal::from(97_951));
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        // Puerto cerrado: el connect falla de inmediato
        let client = PricingClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.get_recommended_price(&vehicle()).await.unwrap_err();
        assert_eq!(err.provider(), PRICING_PROVIDER);
        assert!(matches!(err, ProviderError::Unavailable { .. } | ProviderError::Timeout { .. }));
    }
}
