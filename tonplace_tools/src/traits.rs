use crate::{
    data_objects::{NewPurchase, Purchase},
    TonPlaceApiError,
};

/// The `PurchasesApi` trait covers the Ton.Place purchase calls the app server depends on. [`crate::TonPlaceApi`]
/// is the live implementation; endpoint tests substitute a mock.
#[allow(async_fn_in_trait)]
pub trait PurchasesApi {
    /// Fetches the most recent purchases the given user has made through this app, newest first.
    async fn fetch_purchases(&self, user_id: i64) -> Result<Vec<Purchase>, TonPlaceApiError>;

    /// Registers a new purchase for the given user and returns its platform-assigned id. The purchase stays
    /// `pending` until the user confirms the payment through the SDK.
    async fn create_purchase(&self, purchase: NewPurchase) -> Result<i64, TonPlaceApiError>;
}
