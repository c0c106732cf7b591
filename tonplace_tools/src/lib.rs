pub mod auth;

mod api;
mod config;
mod error;
mod traits;

mod data_objects;

pub use api::TonPlaceApi;
pub use config::{TonPlaceConfig, DEFAULT_API_BASE_URL};
pub use data_objects::{NewPurchase, Purchase, PurchaseCreated, PurchaseStatus, PurchasesResponse};
pub use error::TonPlaceApiError;
pub use traits::PurchasesApi;
