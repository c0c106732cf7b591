//! Request handler definitions
//!
//! Each route is declared with the `route!` macro so that handlers stay generic over the platform API. The server
//! plugs in the live [`tonplace_tools::TonPlaceApi`] client; the endpoint tests plug in a mock.
//!
//! Since each worker thread processes its requests sequentially, handlers must never block the current thread. The
//! Ton.Place API calls are awaited, so the worker keeps serving other requests in the meantime.

use std::collections::BTreeMap;

use actix_web::{get, http::header::ContentType, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::*;
use serde_json::json;
use tonplace_tools::{
    auth::{params_from_query, signature_from_query, timestamp_is_fresh, SignatureVerifier},
    NewPurchase,
    PurchaseCreated,
    PurchasesApi,
    PurchasesResponse,
};

use crate::{
    config::VerifyOptions,
    data_objects::{CreatePurchaseParams, LaunchUser, TransactionsQuery},
    errors::ServerError,
    pages::{render_index, PageData},
};

/// Shown when the page is opened without any launch parameters, i.e. outside of Ton.Place.
pub const MISSING_PARAMS_ERROR: &str = "Missing required parameters. This app must be opened from Ton.Place.";
/// The one message shown for every rejected launch. Stale timestamps and bad signatures deliberately read the same,
/// so that responses cannot be used to probe which of the checks failed. The specifics only go to the debug log.
pub const LAUNCH_REJECTED_ERROR: &str = "Authorization failed. Please reopen the app from Ton.Place.";

/// The longest purchase title the platform accepts.
const MAX_TITLE_LENGTH: usize = 150;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Index  ----------------------------------------------------
route!(index => Get "/" impl PurchasesApi);
/// The mini app page.
///
/// Ton.Place opens the app URL with signed launch parameters attached. The flow is:
/// * No `hash` or `user_id` at all: the app was opened outside of Ton.Place, so render the landing explainer.
/// * Timestamp or signature check fails: render the page with the one generic authorization error.
/// * Verified: fetch the user's purchase history and render the full page.
pub async fn index<A>(
    req: HttpRequest,
    api: web::Data<A>,
    verifier: web::Data<SignatureVerifier>,
    options: web::Data<VerifyOptions>,
) -> Result<HttpResponse, ServerError>
where
    A: PurchasesApi,
{
    trace!("💻️ Received index page request");
    let query = req.query_string();
    let params = params_from_query(query);
    let user = LaunchUser::from_params(&params);
    let signature = signature_from_query(query).unwrap_or_default();
    if signature.is_empty() || user.user_id.is_empty() {
        debug!("💻️ Index page was opened without launch parameters");
        return html_page(PageData::unauthorized(user, MISSING_PARAMS_ERROR));
    }
    if !launch_is_authorized(&verifier, &options, &params, &signature) {
        return html_page(PageData::unauthorized(user, LAUNCH_REJECTED_ERROR));
    }
    // The signature covers user_id, so it can be trusted from here on
    let user_id = user.user_id.parse::<i64>().unwrap_or_default();
    let transactions = match api.fetch_purchases(user_id).await {
        Ok(transactions) => transactions,
        Err(e) => {
            // Degrade to an empty history rather than failing the whole page
            warn!("💳️ Could not fetch purchases for user {user_id}. {e}");
            Vec::new()
        },
    };
    html_page(PageData::authorized(user, transactions))
}

/// Runs the freshness and signature checks on a launch request. Callers surface one generic error regardless of
/// which check failed; the specific reason is only logged.
fn launch_is_authorized(
    verifier: &SignatureVerifier,
    options: &VerifyOptions,
    params: &BTreeMap<String, String>,
    signature: &str,
) -> bool {
    if !options.signature_checks {
        warn!("🔐️ Signature checks are disabled. Accepting the launch request as-is.");
        return true;
    }
    let ts = params.get("ts").map(String::as_str).unwrap_or_default();
    if !timestamp_is_fresh(ts, Utc::now().timestamp(), options.max_signature_age) {
        debug!("🔐️ Launch timestamp is stale, too far ahead, or malformed. ts={ts}");
        return false;
    }
    if !verifier.verify(params, signature) {
        debug!("🔐️ Launch signature does not match the parameters");
        return false;
    }
    true
}

fn html_page(data: PageData) -> Result<HttpResponse, ServerError> {
    let page = render_index(&data)?;
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(page))
}

// ----------------------------------------------   Purchases  ----------------------------------------------------
route!(create_purchase => Post "/create-purchase" impl PurchasesApi);
/// Creates a purchase on Ton.Place on behalf of the page.
///
/// The page script calls this, takes the `purchase_id` from the response, and hands it to `TonPlace.purchase()` to
/// open the payment dialog.
pub async fn create_purchase<A>(body: web::Json<CreatePurchaseParams>, api: web::Data<A>) -> HttpResponse
where
    A: PurchasesApi,
{
    let params = body.into_inner();
    trace!("💳️ Received create purchase request: {params:?}");
    if params.amount <= 0 {
        return error_json("Amount must be greater than 0");
    }
    if params.title.is_empty() {
        return error_json("Title is required");
    }
    if params.title.chars().count() > MAX_TITLE_LENGTH {
        return error_json("Title must be 150 characters or less");
    }
    let purchase = NewPurchase::eur(params.user_id, params.amount, params.title);
    match api.create_purchase(purchase).await {
        Ok(purchase_id) => HttpResponse::Ok().json(PurchaseCreated { purchase_id }),
        Err(e) => {
            warn!("💳️ Could not create purchase. {e}");
            error_json(&format!("Failed to create purchase: {e}"))
        },
    }
}

route!(transactions => Get "/transactions" impl PurchasesApi);
/// Returns the user's purchase history. The page polls this after payments to pick up status changes.
pub async fn transactions<A>(query: web::Query<TransactionsQuery>, api: web::Data<A>) -> HttpResponse
where
    A: PurchasesApi,
{
    let user_id = query.user_id;
    trace!("💳️ Received transactions poll for user {user_id}");
    match api.fetch_purchases(user_id).await {
        Ok(transactions) => HttpResponse::Ok().json(PurchasesResponse { transactions }),
        Err(e) => {
            warn!("💳️ Could not fetch purchases for user {user_id}. {e}");
            error_json(&e.to_string())
        },
    }
}

// Failures the page script handles are reported with an `error` field in a 200 response, since the script keys off
// that field rather than the status code
fn error_json(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "error": message }))
}
