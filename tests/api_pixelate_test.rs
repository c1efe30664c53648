//! Integration tests for POST /api/pixelate

mod common;

use axum::http::StatusCode;
use common::fixtures::{gradient_png, solid_png, transparent_png, two_tone_png};
use common::{assert_json_error, assert_palette_only, assert_png, assert_status, TestApp};
use pixel_dither::{Color, Palette};
use pixelator::models::AppConfig;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_pixelate_default_parameters() {
    let app = TestApp::new();

    let response = app.post_png("/api/pixelate", gradient_png(40, 30)).await;

    assert_png(&response);
    let pixels = response.decode_png();
    assert_eq!(pixels.dimensions(), (40, 30));
    assert_palette_only(&pixels, &Palette::fallback());

    assert_eq!(response.header("x-cache"), Some("miss"));
    assert_eq!(
        response.header("x-palette"),
        Some("#000000,#555555,#aaaaaa,#ffffff")
    );
    let etag = response.header("etag").expect("ETag header");
    assert!(etag.starts_with('"') && etag.ends_with('"'));
}

#[tokio::test]
async fn test_pixelate_repeat_is_cached() {
    let app = TestApp::new();

    let first = app.post_png("/api/pixelate", gradient_png(24, 24)).await;
    let second = app.post_png("/api/pixelate", gradient_png(24, 24)).await;

    assert_png(&second);
    assert_eq!(second.header("x-cache"), Some("hit"));
    assert_eq!(first.header("etag"), second.header("etag"));
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_pixelate_if_none_match() {
    let app = TestApp::new();

    let first = app.post_png("/api/pixelate", gradient_png(16, 16)).await;
    let etag = first.header("etag").unwrap().to_string();

    let response = app
        .post_png_with_headers(
            "/api/pixelate",
            &[("If-None-Match", etag.as_str())],
            gradient_png(16, 16),
        )
        .await;

    assert_status(&response, StatusCode::NOT_MODIFIED);
    assert!(response.body.is_empty());
    assert_eq!(response.header("etag"), Some(etag.as_str()));
}

#[tokio::test]
async fn test_pixelate_custom_palette_and_ordered() {
    let app = TestApp::new();

    let response = app
        .post_png(
            "/api/pixelate?pixel_size=10&algorithm=ordered&palette=%231a1c2c,%23ef7d57,%23f4f4f4",
            gradient_png(40, 30),
        )
        .await;

    assert_png(&response);
    let palette = Palette::from_hex(&["#1a1c2c", "#ef7d57", "#f4f4f4"]).unwrap();
    let pixels = response.decode_png();
    assert_palette_only(&pixels, &palette);

    // 10% of 40x30 is a 4x3 grid, so each cell covers 10x10 output pixels
    for (x, y) in [(0, 0), (9, 9), (5, 3)] {
        assert_eq!(pixels.get(x, y), pixels.get(0, 0));
    }
    for (x, y) in [(10, 0), (19, 9)] {
        assert_eq!(pixels.get(x, y), pixels.get(10, 0));
    }
}

#[tokio::test]
async fn test_pixelate_pixel_size_is_clamped() {
    let app = TestApp::new();

    let low = app
        .post_png("/api/pixelate?pixel_size=1", gradient_png(20, 20))
        .await;
    let ten = app
        .post_png("/api/pixelate?pixel_size=10", gradient_png(20, 20))
        .await;

    assert_png(&low);
    // Both resolve to 10%, so they share a cache entry
    assert_eq!(low.header("etag"), ten.header("etag"));
    assert_eq!(ten.header("x-cache"), Some("hit"));
}

#[tokio::test]
async fn test_pixelate_luminance_mode_on_solid_extremes() {
    let app = TestApp::new();
    let path = "/api/pixelate?palette_mode=luminance&palette=%23000000,%23808080,%23ffffff";

    let black = app.post_png(path, solid_png(4, 4, [0, 0, 0])).await;
    let white = app.post_png(path, solid_png(4, 4, [255, 255, 255])).await;

    assert_png(&black);
    assert!(black.decode_png().pixels().iter().all(|&c| c == Color::BLACK));
    assert!(white.decode_png().pixels().iter().all(|&c| c == Color::WHITE));
}

#[tokio::test]
async fn test_pixelate_auto_palette() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/pixelate?palette=auto&colors=2", two_tone_png(20, 10))
        .await;

    assert_png(&response);
    // Sorted dark to light: the blue half has the lower luma
    assert_eq!(response.header("x-palette"), Some("#1e1edc,#dc1e1e"));

    let palette = Palette::from_hex(&["#1e1edc", "#dc1e1e"]).unwrap();
    let pixels = response.decode_png();
    assert_palette_only(&pixels, &palette);
    assert_eq!(pixels.get(0, 0), Color::new(220, 30, 30));
    assert_eq!(pixels.get(19, 9), Color::new(30, 30, 220));
}

#[tokio::test]
async fn test_pixelate_without_dithering_full_size_is_identity() {
    let app = TestApp::new();
    let input = gradient_png(12, 9);

    let response = app
        .post_png("/api/pixelate?pixel_size=100&dither=false", input.clone())
        .await;

    assert_png(&response);
    let expected = pixelator::rendering::decode_png(&input, 4096)
        .unwrap()
        .to_pixel_buffer();
    assert_eq!(response.decode_png(), expected);
}

#[tokio::test]
async fn test_pixelate_transparent_becomes_white() {
    let app = TestApp::new();

    let response = app
        .post_png(
            "/api/pixelate?palette=%23000000,%23ffffff",
            transparent_png(6, 6),
        )
        .await;

    assert_png(&response);
    assert!(response
        .decode_png()
        .pixels()
        .iter()
        .all(|&c| c == Color::WHITE));
}

#[tokio::test]
async fn test_pixelate_unknown_algorithm() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/pixelate?algorithm=atkinson", gradient_png(8, 8))
        .await;

    assert_json_error(&response, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("atkinson"));
}

#[tokio::test]
async fn test_pixelate_malformed_query() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/pixelate?pixel_size=big", gradient_png(8, 8))
        .await;

    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pixelate_empty_palette() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/pixelate?palette=,", gradient_png(8, 8))
        .await;

    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pixelate_empty_body() {
    let app = TestApp::new();

    let response = app.post_png("/api/pixelate", Vec::new()).await;

    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pixelate_not_a_png() {
    let app = TestApp::new();

    let response = app
        .post_png("/api/pixelate", b"GIF89a definitely not a png".to_vec())
        .await;

    assert_json_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pixelate_image_too_large() {
    let mut config = AppConfig::default();
    config.limits.max_dimension = 16;
    let app = TestApp::with_config(config);

    let response = app.post_png("/api/pixelate", gradient_png(17, 4)).await;

    assert_json_error(&response, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_pixelate_upload_limit() {
    let mut config = AppConfig::default();
    config.limits.max_upload_bytes = 64;
    let app = TestApp::with_config(config);

    let body = gradient_png(32, 32);
    assert!(body.len() > 64);
    let response = app.post_png("/api/pixelate", body).await;

    assert_status(&response, StatusCode::PAYLOAD_TOO_LARGE);
}
