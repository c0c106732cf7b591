use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::TonPlaceConfig,
    data_objects::{NewPurchase, Purchase, PurchaseCreated, PurchasesResponse},
    traits::PurchasesApi,
    TonPlaceApiError,
};

/// How many purchases to request in a single listing call. The page is small enough for the app page; there is no
/// paging through older purchases.
const PURCHASE_PAGE_SIZE: u64 = 50;
/// Hard ceiling on any single call to the platform. There are no retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A client for the Ton.Place Public API. Every request carries the app credentials in the `App-Id` and `Secret`
/// headers, which is why this client must only ever run server-side.
#[derive(Clone)]
pub struct TonPlaceApi {
    config: TonPlaceConfig,
    client: Arc<Client>,
}

impl TonPlaceApi {
    pub fn new(config: TonPlaceConfig) -> Result<Self, TonPlaceApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let app_id =
            HeaderValue::from_str(config.app_id.as_str()).map_err(|e| TonPlaceApiError::Initialization(e.to_string()))?;
        headers.insert("App-Id", app_id);
        let secret = HeaderValue::from_str(config.app_secret.reveal().as_str())
            .map_err(|e| TonPlaceApiError::Initialization(e.to_string()))?;
        headers.insert("Secret", secret);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TonPlaceApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, TonPlaceApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| TonPlaceApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| TonPlaceApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| TonPlaceApiError::RestResponseError(e.to_string()))?;
            Err(TonPlaceApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}

impl PurchasesApi for TonPlaceApi {
    async fn fetch_purchases(&self, user_id: i64) -> Result<Vec<Purchase>, TonPlaceApiError> {
        let count = PURCHASE_PAGE_SIZE.to_string();
        let user = user_id.to_string();
        let params = [("count", count.as_str()), ("userId", user.as_str())];
        debug!("Fetching purchases for user {user_id}");
        let result = self.rest_query::<PurchasesResponse, ()>(Method::GET, "/apps/purchases", &params, None).await?;
        info!("Fetched {} purchases for user {user_id}", result.transactions.len());
        Ok(result.transactions)
    }

    async fn create_purchase(&self, purchase: NewPurchase) -> Result<i64, TonPlaceApiError> {
        debug!("Creating a {} purchase for user {}", purchase.currency, purchase.user_id);
        let result = self
            .rest_query::<PurchaseCreated, NewPurchase>(Method::POST, "/apps/purchase/create", &[], Some(purchase))
            .await?;
        info!("Created purchase #{}", result.purchase_id);
        Ok(result.purchase_id)
    }
}
