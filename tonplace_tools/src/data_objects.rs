use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tpa_common::Currency;

/// A purchase as returned by the Ton.Place purchases endpoint. Amounts are in the smallest unit of the currency
/// (euro cents or nanoTON) and `created_at` is carried as unix seconds on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub amount: i64,
    pub currency: Currency,
    pub user_id: i64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
    pub status: PurchaseStatus,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Paid,
}

/// The response envelope of `GET /apps/purchases`. The same shape is served back to the page from the transactions
/// endpoint, so the refresh script sees exactly what the platform sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasesResponse {
    pub transactions: Vec<Purchase>,
}

/// The request body of `POST /apps/purchase/create`. Ton.Place only settles app purchases in euros, so there is a
/// single constructor and it fixes the currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub amount: i64,
    pub currency: Currency,
    pub title: String,
    pub user_id: i64,
}

impl NewPurchase {
    pub fn eur(user_id: i64, amount: i64, title: impl Into<String>) -> Self {
        Self { amount, currency: Currency::Eur, title: title.into(), user_id }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCreated {
    pub purchase_id: i64,
}
