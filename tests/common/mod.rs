#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use vehicle_auction::build_router;
use vehicle_auction::middleware::cors_middleware;
use vehicle_auction::models::BuildData;
use vehicle_auction::repositories::InMemoryVehicleRepository;
use vehicle_auction::services::local_providers::{
    CatalogBuildDataProvider, LocalInspectionProvider, LocalPricingProvider,
};
use vehicle_auction::services::providers::{BuildDataProvider, InspectionProvider, PricingProvider};
use vehicle_auction::services::VehicleEnricher;
use vehicle_auction::state::AppState;

pub const CURRENT_YEAR: i32 = 2025;

pub fn catalog() -> CatalogBuildDataProvider {
    CatalogBuildDataProvider::new().with_fallback(BuildData {
        vin: String::new(),
        brand: "Toyota".to_string(),
        engine: "2.5L I4".to_string(),
        transmission: "Automatic".to_string(),
        msrp: Decimal::from(99_000),
    })
}

pub struct TestApp {
    pub router: Router,
    pub repository: Arc<InMemoryVehicleRepository>,
}

impl TestApp {
    pub fn local() -> Self {
        Self::with_providers(
            Arc::new(catalog()),
            Arc::new(LocalInspectionProvider::at_year(CURRENT_YEAR)),
            Arc::new(LocalPricingProvider),
        )
    }

    pub fn with_providers(
        build_data: Arc<dyn BuildDataProvider>,
        inspection: Arc<dyn InspectionProvider>,
        pricing: Arc<dyn PricingProvider>,
    ) -> Self {
        let repository = Arc::new(InMemoryVehicleRepository::new());
        let enricher = VehicleEnricher::new(build_data, inspection, pricing);
        let state = AppState::new(repository.clone(), enricher, 5);
        Self {
            router: build_router(state, cors_middleware()),
            repository,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }
}

pub fn vin(i: usize) -> String {
    format!("5YJ3E1EA7KF{:06}", i)
}

pub fn vehicle_json(vin: &str) -> Value {
    serde_json::json!({
        "vin": vin,
        "year": 2022,
        "odometer": 12000,
        "exterior_color": "Black",
        "interior_color": "Beige"
    })
}
