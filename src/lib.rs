//! Shop Orders API Library
//!
//! This crate provides the core functionality for the shop orders API
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod clients;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod repositories;
pub mod services;

use axum::{response::Json, routing::get, Router};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
        }
    }
}

/// OpenAPI document aggregating every annotated handler.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::requests::create_order,
        handlers::requests::confirm_order,
        handlers::requests::search_profile_requests,
        handlers::requests::update_request,
        handlers::requests::search_store_requests,
        handlers::payments::create_payment,
        handlers::payments::update_payment,
        handlers::payments::store_payments,
        handlers::payments::search_payments,
    ),
    tags(
        (name = "Requests", description = "Order creation, confirmation and request lifecycle"),
        (name = "Payments", description = "Administrative payment management"),
        (name = "Health", description = "Service health probes")
    )
)]
pub struct ApiDoc;

/// Assembles the full route tree. State is attached by the caller.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/health", handlers::health::health_routes())
        .nest("/request", handlers::requests::request_routes())
        .nest(
            "/private/request",
            handlers::requests::private_request_routes(),
        )
        .nest(
            "/private/payment",
            handlers::payments::private_payment_routes(),
        )
}
