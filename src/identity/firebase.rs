// ABOUTME: Firebase ID-token validation for admin callers
// ABOUTME: Verifies RS256 signatures against Google's rotating X.509 certificates with key caching
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Firebase identity resolution
//!
//! - Signing certificates are fetched from Google and reduced to their RSA
//!   public keys.
//! - Keys are cached for the `Cache-Control: max-age` of the response, never
//!   less than five minutes.
//! - Tokens are checked for signature, expiry, issuer and audience; the `sub`
//!   claim becomes the caller's identity subject.

use std::collections::HashMap;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use x509_parser::prelude::*;

use super::{CallerIdentity, IdentityResolver};
use crate::config::identity::FirebaseConfig;
use crate::constants::identity::{
    CERT_FETCH_TIMEOUT_SECS, FIREBASE_CERTS_URL, FIREBASE_ISSUER_PREFIX, MIN_KEY_CACHE_SECS,
};
use crate::errors::{AppError, AppResult};

/// Keys are refetched at least daily
const MAX_KEY_CACHE_SECS: u64 = 86_400;

/// Claims this service reads from a Firebase ID token
#[derive(Debug, Clone, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// PEM public keys by key id, valid until `expires_at`
struct SigningKeys {
    by_kid: HashMap<String, String>,
    expires_at: DateTime<Utc>,
}

impl SigningKeys {
    fn lookup(&self, kid: &str, now: DateTime<Utc>) -> Option<String> {
        (self.expires_at > now)
            .then(|| self.by_kid.get(kid).cloned())
            .flatten()
    }
}

/// Resolves callers from Firebase ID tokens
pub struct FirebaseIdentityResolver {
    config: FirebaseConfig,
    http_client: Client,
    keys: RwLock<Option<SigningKeys>>,
}

impl FirebaseIdentityResolver {
    /// Create a resolver for the configured Firebase project
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: FirebaseConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(StdDuration::from_secs(CERT_FETCH_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
            keys: RwLock::new(None),
        })
    }

    /// Whether tokens can be validated at all
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.is_configured()
    }

    async fn decoding_key_pem(&self, kid: &str) -> AppResult<String> {
        let cached = {
            let keys = self.keys.read().await;
            keys.as_ref().and_then(|k| k.lookup(kid, Utc::now()))
        };
        if let Some(pem) = cached {
            return Ok(pem);
        }

        let fresh = self.fetch_signing_keys().await?;
        let pem = fresh.by_kid.get(kid).cloned();
        *self.keys.write().await = Some(fresh);

        pem.ok_or_else(|| {
            debug!(kid = %kid, "No Firebase signing key for kid");
            AppError::auth_invalid("Unknown token signing key")
        })
    }

    async fn fetch_signing_keys(&self) -> AppResult<SigningKeys> {
        info!("Fetching Firebase signing certificates");

        let response = self
            .http_client
            .get(FIREBASE_CERTS_URL)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch Firebase signing certificates");
                AppError::external_service("firebase", format!("Certificate fetch failed: {e}"))
            })?;

        let ttl_secs = response
            .headers()
            .get(reqwest::header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_max_age)
            .unwrap_or(self.config.key_cache_ttl_secs)
            .clamp(MIN_KEY_CACHE_SECS, MAX_KEY_CACHE_SECS);

        let certificates: HashMap<String, String> = response.json().await.map_err(|e| {
            AppError::external_service("firebase", format!("Malformed certificate response: {e}"))
        })?;

        let by_kid: HashMap<String, String> = certificates
            .into_iter()
            .filter_map(|(kid, cert)| match public_key_pem(&cert) {
                Ok(pem) => Some((kid, pem)),
                Err(e) => {
                    warn!(kid = %kid, error = %e, "Skipping unreadable signing certificate");
                    None
                }
            })
            .collect();

        if by_kid.is_empty() {
            return Err(AppError::external_service(
                "firebase",
                "No usable signing certificates",
            ));
        }

        let expires_at = Utc::now() + Duration::seconds(i64::try_from(ttl_secs).unwrap_or_default());
        info!(keys = by_kid.len(), ttl_secs, %expires_at, "Firebase signing keys cached");

        Ok(SigningKeys { by_kid, expires_at })
    }
}

#[async_trait]
impl IdentityResolver for FirebaseIdentityResolver {
    async fn resolve(&self, token: &str) -> AppResult<CallerIdentity> {
        let Some(project_id) = self
            .config
            .project_id
            .as_deref()
            .filter(|_| self.config.enabled)
        else {
            return Err(AppError::auth_invalid("Identity provider is not configured"));
        };

        let header = decode_header(token).map_err(|e| {
            debug!(error = %e, "Undecodable token header");
            AppError::auth_invalid("Invalid token format")
        })?;
        let kid = header
            .kid
            .ok_or_else(|| AppError::auth_invalid("Token missing key ID"))?;

        let pem = self.decoding_key_pem(&kid).await?;
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| AppError::internal(format!("Invalid signing key for {kid}: {e}")))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[project_id]);
        validation.set_issuer(&[format!("{FIREBASE_ISSUER_PREFIX}{project_id}")]);

        let claims = decode::<IdTokenClaims>(token, &key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::auth_expired(),
                ErrorKind::InvalidAudience => AppError::auth_invalid("Invalid token audience"),
                ErrorKind::InvalidIssuer => AppError::auth_invalid("Invalid token issuer"),
                _ => AppError::auth_invalid("Invalid token"),
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(AppError::auth_invalid("Token has an empty subject"));
        }

        debug!(
            subject = %claims.sub,
            email = claims.email.as_deref().unwrap_or("(none)"),
            "Firebase token validated"
        );
        Ok(CallerIdentity::from_subject(claims.sub))
    }
}

/// `max-age` seconds from a Cache-Control header value
fn parse_max_age(cache_control: &str) -> Option<u64> {
    cache_control
        .split(',')
        .filter_map(|directive| directive.trim().strip_prefix("max-age="))
        .find_map(|secs| secs.parse().ok())
}

/// RSA public key of an X.509 certificate, PEM armored
fn public_key_pem(certificate: &str) -> AppResult<String> {
    let (_, pem) = parse_x509_pem(certificate.as_bytes())
        .map_err(|e| AppError::internal(format!("Failed to parse certificate PEM: {e}")))?;
    let (_, cert) = X509Certificate::from_der(&pem.contents)
        .map_err(|e| AppError::internal(format!("Failed to parse certificate: {e}")))?;

    let encoded = STANDARD.encode(cert.public_key().raw);
    let mut armored = String::from("-----BEGIN PUBLIC KEY-----\n");
    for line in encoded.as_bytes().chunks(64) {
        armored.push_str(&String::from_utf8_lossy(line));
        armored.push('\n');
    }
    armored.push_str("-----END PUBLIC KEY-----");
    Ok(armored)
}
