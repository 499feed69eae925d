//! Typed operations against the webtask hosting service.
//!
//! Two distinct endpoints are involved: the user's own deployment
//! (authenticated with the profile's bearer token) and a fixed verification
//! function (authenticated with a static verifier credential, since no
//! profile exists during login). Every transport failure is collapsed into
//! a single [`RemoteError`] kind per operation; the raw reason is kept for
//! the diagnostic channel only.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;

use crate::error::RemoteError;
use crate::identity::Identity;
use crate::profile::Profile;

/// Default verification function URL (the hosting service's login broker).
pub const DEFAULT_VERIFIER_URL: &str = "https://webtask.it.auth0.com/api/run/auth0-webtask-cli";

/// A remote webtask's identity and metadata, without its code body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebtaskSummary {
    /// Unique remote id, also the inspect/credential token.
    pub token: String,
    pub name: String,
    pub container: String,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    /// Invocation URL. Present in list responses; absent summaries fall
    /// back to a detail fetch when the URL is needed.
    #[serde(default)]
    pub webtask_url: Option<String>,
}

/// A webtask with its decrypted code body and invocation URL.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WebtaskDetail {
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub container: String,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub code: String,
    pub webtask_url: String,
}

impl WebtaskDetail {
    /// The summary view of this webtask.
    pub fn summary(&self) -> WebtaskSummary {
        WebtaskSummary {
            token: self.token.clone(),
            name: self.name.clone(),
            container: self.container.clone(),
            meta: self.meta.clone(),
            webtask_url: Some(self.webtask_url.clone()),
        }
    }
}

/// The issued credentials embedded in a successful verification response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VerifiedSession {
    /// Deployment base URL for the new profile.
    pub url: String,
    /// Bearer token for the new profile.
    pub token: String,
    /// Account container for the new profile.
    pub tenant: String,
}

/// Typed request/response port against the hosting service.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch all webtasks in the profile's container.
    ///
    /// When `priority` names a token present in the result, that entry is
    /// moved to the front; the relative order of the rest is preserved and
    /// the count always equals the remote response count.
    async fn list(
        &self,
        profile: &Profile,
        priority: Option<&str>,
    ) -> Result<Vec<WebtaskSummary>, RemoteError>;

    /// Fetch one webtask with its code body decrypted and included.
    async fn fetch_detail(
        &self,
        profile: &Profile,
        token: &str,
    ) -> Result<WebtaskDetail, RemoteError>;

    /// Create a named webtask. The service defines create as a PUT, so a
    /// second call with the same name overwrites — upsert, not create-only.
    async fn create(
        &self,
        profile: &Profile,
        name: &str,
        code: &str,
    ) -> Result<WebtaskDetail, RemoteError>;

    /// Overwrite the code body of an existing named webtask.
    async fn update(
        &self,
        profile: &Profile,
        container: &str,
        name: &str,
        code: &str,
    ) -> Result<(), RemoteError>;

    /// Trigger out-of-band delivery of a verification code.
    async fn request_verification_code(&self, identity: &Identity) -> Result<(), RemoteError>;

    /// Redeem a delivered code for a new session's credentials.
    async fn verify_code(
        &self,
        identity: &Identity,
        code: &str,
    ) -> Result<VerifiedSession, RemoteError>;
}

/// Move the entry with `priority` token (if present) to the front, keeping
/// the relative order of everything else. Count is always preserved.
pub fn prioritize(webtasks: Vec<WebtaskSummary>, priority: Option<&str>) -> Vec<WebtaskSummary> {
    let Some(token) = priority else {
        return webtasks;
    };
    let Some(index) = webtasks.iter().position(|wt| wt.token == token) else {
        return webtasks;
    };

    let mut reordered = webtasks;
    let first = reordered.remove(index);
    reordered.insert(0, first);
    reordered
}

/// Configuration for the verification endpoint.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Verification function URL.
    pub url: String,
    /// Static bearer credential for the verification function. This is the
    /// broker's credential, never the user's profile token.
    pub token: String,
}

impl VerifierConfig {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: token.into(),
        }
    }
}

/// reqwest-backed [`Remote`] implementation.
pub struct HttpRemote {
    client: reqwest::Client,
    verifier: VerifierConfig,
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct VerifyClaims {
    webtask: VerifiedSession,
}

impl HttpRemote {
    pub fn new(verifier: VerifierConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            verifier,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        op: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = request.send().await.map_err(|err| {
            tracing::debug!(op, error = %err, "remote request failed");
            RemoteError::Network {
                op,
                reason: err.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(op, status = status.as_u16(), "remote request rejected");
            return Err(RemoteError::Rejected {
                op,
                status: status.as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|err| RemoteError::InvalidResponse {
                op,
                reason: err.to_string(),
            })
    }

    fn webtask_url(profile: &Profile, container: &str, name: Option<&str>) -> String {
        match name {
            Some(name) => format!("{}/api/webtask/{}/{}", profile.url, container, name),
            None => format!("{}/api/webtask/{}", profile.url, container),
        }
    }
}

/// Decode the payload segment of a signed token without verifying the
/// signature. The TLS channel to the verification function is the trust
/// boundary here, the same stance the service's own CLI takes.
fn decode_token_payload(id_token: &str) -> Result<VerifyClaims, String> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| "token has no payload segment".to_string())?;

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| format!("payload is not base64: {err}"))?;

    serde_json::from_slice(&bytes).map_err(|err| format!("payload is not valid JSON: {err}"))
}

#[async_trait]
impl Remote for HttpRemote {
    async fn list(
        &self,
        profile: &Profile,
        priority: Option<&str>,
    ) -> Result<Vec<WebtaskSummary>, RemoteError> {
        let request = self
            .client
            .get(Self::webtask_url(profile, &profile.container, None))
            .bearer_auth(&profile.token);

        let webtasks: Vec<WebtaskSummary> =
            self.get_json("fetch webtask list", request).await?;
        Ok(prioritize(webtasks, priority))
    }

    async fn fetch_detail(
        &self,
        profile: &Profile,
        token: &str,
    ) -> Result<WebtaskDetail, RemoteError> {
        let request = self
            .client
            .get(format!("{}/api/tokens/inspect", profile.url))
            .query(&[
                ("token", token),
                ("decrypt", "1"),
                ("fetch_code", "1"),
                ("meta", "1"),
            ])
            .bearer_auth(&profile.token);

        self.get_json("fetch webtask", request).await
    }

    async fn create(
        &self,
        profile: &Profile,
        name: &str,
        code: &str,
    ) -> Result<WebtaskDetail, RemoteError> {
        let request = self
            .client
            .put(Self::webtask_url(profile, &profile.container, Some(name)))
            .bearer_auth(&profile.token)
            .json(&serde_json::json!({ "code": code }));

        self.get_json("create new webtask", request).await
    }

    async fn update(
        &self,
        profile: &Profile,
        container: &str,
        name: &str,
        code: &str,
    ) -> Result<(), RemoteError> {
        let op = "update webtask";
        let request = self
            .client
            .put(Self::webtask_url(profile, container, Some(name)))
            .bearer_auth(&profile.token)
            .json(&serde_json::json!({ "code": code }));

        // The response body (the updated webtask record) is discarded.
        let response = request.send().await.map_err(|err| RemoteError::Network {
            op,
            reason: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Rejected {
                op,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn request_verification_code(&self, identity: &Identity) -> Result<(), RemoteError> {
        let op = "request verification code";
        let (key, value) = identity.as_query_pair();
        let request = self
            .client
            .get(self.verifier.url.as_str())
            .query(&[(key, value)])
            .bearer_auth(&self.verifier.token);

        let response = request.send().await.map_err(|err| RemoteError::Network {
            op,
            reason: err.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Rejected {
                op,
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    async fn verify_code(
        &self,
        identity: &Identity,
        code: &str,
    ) -> Result<VerifiedSession, RemoteError> {
        let (key, value) = identity.as_query_pair();
        let request = self
            .client
            .get(self.verifier.url.as_str())
            .query(&[(key, value), ("verification_code", code)])
            .bearer_auth(&self.verifier.token);

        // Any rejection — wrong code, expired code, transport — collapses
        // to the one user-facing verification failure.
        let response: VerifyResponse = self
            .get_json("verify code", request)
            .await
            .map_err(|err| {
                tracing::debug!(error = %err, "verification exchange failed");
                RemoteError::VerificationFailed
            })?;

        let claims = decode_token_payload(&response.id_token).map_err(|reason| {
            tracing::debug!(reason, "could not decode verification token");
            RemoteError::VerificationFailed
        })?;

        Ok(claims.webtask)
    }
}
