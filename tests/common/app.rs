//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use pixel_dither::PixelBuffer;
use std::sync::Arc;
use tower::ServiceExt;

use pixelator::models::AppConfig;
use pixelator::rendering::decode_png;
use pixelator::server::{build_router, create_app_state, AppState};
use pixelator::services::PixelateService;

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub pixelate: Arc<PixelateService>,
}

impl TestApp {
    /// Create a new test application with default configuration
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let state = create_app_state(config).expect("Failed to create app state");

        // Keep references for test assertions
        let pixelate = state.pixelate.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self { router, pixelate }
    }

    /// Create application state for custom router configuration
    pub fn create_state() -> AppState {
        create_app_state(AppConfig::default()).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a PNG body
    pub async fn post_png(&self, path: &str, body: Vec<u8>) -> TestResponse {
        self.post_png_with_headers(path, &[], body).await
    }

    /// POST a PNG body with custom headers
    pub async fn post_png_with_headers(
        &self,
        path: &str,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> TestResponse {
        let mut builder = Request::post(path)
            .header("Content-Type", "image/png")
            .header("Content-Length", body.len().to_string());
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::from(body)).unwrap()).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body into opaque pixels
    pub fn decode_png(&self) -> PixelBuffer {
        decode_png(&self.body, usize::MAX)
            .expect("Failed to decode PNG response")
            .to_pixel_buffer()
    }
}
