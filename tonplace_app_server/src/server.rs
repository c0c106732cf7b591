//! Server assembly.
//!
//! [`run_server`] builds the Ton.Place API client and hands it to [`create_server_instance`], which wires up the
//! routes, shared state and access logging. The handlers are generic over the purchases API trait, so the endpoint
//! tests assemble the same app around a mock client instead.

use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use tonplace_tools::{auth::SignatureVerifier, TonPlaceApi};

use crate::{
    config::{ServerConfig, VerifyOptions},
    errors::ServerError,
    routes::{health, CreatePurchaseRoute, IndexRoute, TransactionsRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = TonPlaceApi::new(config.tonplace_config.api_config())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, api: TonPlaceApi) -> Result<Server, ServerError> {
    let options = VerifyOptions::from_config(&config);
    let srv = HttpServer::new(move || {
        // One verifier per worker; the secret is hashed into the signing key once, at worker startup
        let verifier = SignatureVerifier::new(&config.tonplace_config.app_secret);
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("tpa::access_log"))
            .app_data(web::Data::new(api.clone()))
            .app_data(web::Data::new(verifier))
            .app_data(web::Data::new(options))
            .service(health)
            .service(IndexRoute::<TonPlaceApi>::new())
            .service(
                web::scope("/api")
                    .service(CreatePurchaseRoute::<TonPlaceApi>::new())
                    .service(TransactionsRoute::<TonPlaceApi>::new()),
            )
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}
