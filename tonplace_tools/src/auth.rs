//! # Ton.Place signed launch parameters
//!
//! When Ton.Place opens a mini app, it appends the launch context (user id, profile fields, a unix timestamp in
//! `ts`, and so on) to the iframe URL as query parameters, together with a `hash` parameter that signs them. Anyone
//! can type a user id into a URL; the signature is what proves that the parameters were produced by Ton.Place for
//! this particular app, and the timestamp keeps captured URLs from being replayed forever.
//!
//! ## Canonical payload
//!
//! The signed payload is built from every launch parameter except `hash` itself. Parameter names are sorted in
//! ascending byte order, each parameter is written as `name=value`, and the entries are joined with single `\n`
//! characters:
//!
//! ```text
//!     app_id=7
//!     ts=1000000000
//!     user_id=42
//! ```
//!
//! If a name appears more than once in the query string, the first value wins. Values are *not* escaped, even when
//! they contain `=` or a newline; the platform signs exactly this form, so escaping here would break every such
//! signature.
//!
//! ## Signature
//!
//! The signing key is the SHA-256 digest of the app's shared secret, and the signature is the lowercase hex encoding
//! of HMAC-SHA256 over the canonical payload under that key. A launch is only accepted when the signature matches
//! *and* the `ts` parameter is fresh; the two checks are independent, and each on its own is insufficient.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tpa_common::Secret;

type HmacSha256 = Hmac<Sha256>;

/// The query parameter carrying the launch signature. It is never part of the signed payload.
pub const SIGNATURE_PARAM: &str = "hash";
/// How far into the future a launch timestamp may lie and still be accepted, in seconds.
pub const MAX_CLOCK_SKEW: i64 = 60;
/// The default replay window for launch signatures, in seconds.
pub const DEFAULT_MAX_SIGNATURE_AGE: i64 = 300;

/// Collects the launch parameters from a raw query string, percent-decoded, with [`SIGNATURE_PARAM`] excluded.
/// When a parameter name repeats, the first occurrence wins.
pub fn params_from_query(query: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    for (name, value) in form_urlencoded::parse(query.as_bytes()) {
        if name == SIGNATURE_PARAM {
            continue;
        }
        params.entry(name.into_owned()).or_insert_with(|| value.into_owned());
    }
    params
}

/// Extracts the supplied launch signature from a raw query string, if any.
pub fn signature_from_query(query: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes()).find(|(name, _)| *name == SIGNATURE_PARAM).map(|(_, v)| v.into_owned())
}

/// Builds the canonical signing payload for a set of launch parameters. `BTreeMap` iteration already yields names in
/// ascending byte order; the signature parameter is skipped even if a caller left it in the map.
pub fn canonical_param_string(params: &BTreeMap<String, String>) -> String {
    params
        .iter()
        .filter(|(name, _)| name.as_str() != SIGNATURE_PARAM)
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Checks that a `ts` launch parameter is fresh. `now` and the parameter are both unix timestamps in seconds;
/// `max_age` is the replay window. Anything unparseable, older than `max_age`, or more than [`MAX_CLOCK_SKEW`]
/// seconds in the future is rejected.
pub fn timestamp_is_fresh(ts: &str, now: i64, max_age: i64) -> bool {
    let ts = match ts.parse::<i64>() {
        Ok(v) => v,
        Err(_) => return false,
    };
    let age = match now.checked_sub(ts) {
        Some(age) => age,
        None => return false,
    };
    age >= -MAX_CLOCK_SKEW && age <= max_age
}

/// Signs and verifies launch parameter sets for one app. The signing key is derived from the shared secret once, at
/// construction, and kept for the life of the verifier; the secret itself is not retained.
#[derive(Clone)]
pub struct SignatureVerifier {
    signing_key: [u8; 32],
}

impl SignatureVerifier {
    pub fn new(secret: &Secret<String>) -> Self {
        let signing_key = Sha256::digest(secret.reveal().as_bytes()).into();
        Self { signing_key }
    }

    /// Returns the lowercase hex signature for the given parameter set.
    pub fn sign(&self, params: &BTreeMap<String, String>) -> String {
        let payload = canonical_param_string(params);
        let mut mac = HmacSha256::new_from_slice(&self.signing_key).expect("HMAC accepts keys of any length");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Checks a supplied signature against the given parameter set. The comparison is constant-time; an empty
    /// signature never matches. This does *not* check timestamp freshness, see [`timestamp_is_fresh`].
    pub fn verify(&self, params: &BTreeMap<String, String>, signature: &str) -> bool {
        if signature.is_empty() {
            return false;
        }
        let expected = self.sign(params);
        expected.as_bytes().ct_eq(signature.as_bytes()).into()
    }
}
