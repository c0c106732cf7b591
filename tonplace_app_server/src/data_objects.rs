use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The well-known launch parameters, as far as the page needs them for display. Signature verification never uses
/// this struct; it always runs over the full dynamic parameter set, because Ton.Place is free to add parameters at
/// any time and every one of them is part of the signed payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchUser {
    pub app_id: String,
    pub user_id: String,
    pub ts: String,
    pub first_name: String,
    pub last_name: String,
}

impl LaunchUser {
    pub fn from_params(params: &BTreeMap<String, String>) -> Self {
        let get = |name: &str| params.get(name).cloned().unwrap_or_default();
        Self {
            app_id: get("app_id"),
            user_id: get("user_id"),
            ts: get("ts"),
            first_name: get("first_name"),
            last_name: get("last_name"),
        }
    }
}

/// The request body the page script sends to `/api/create-purchase`. Amounts are euro cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePurchaseParams {
    pub user_id: i64,
    pub amount: i64,
    pub title: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TransactionsQuery {
    pub user_id: i64,
}
