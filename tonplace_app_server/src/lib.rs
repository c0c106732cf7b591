//! # Ton.Place mini app server
//! This crate hosts the backend for the Ton.Place mini app. It is responsible for:
//! Verifying signed launch requests coming in from Ton.Place.
//! Serving the mini app page to authorized users.
//! Proxying purchase creation and purchase history calls to the Ton.Place Public API.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/`: The mini app page. Launch parameters are verified before any user data is shown.
//! * `/api/create-purchase`: Creates a purchase on Ton.Place on behalf of the page.
//! * `/api/transactions`: Returns the user's purchase history, used by the page for polling.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod pages;
pub mod routes;
pub mod server;
