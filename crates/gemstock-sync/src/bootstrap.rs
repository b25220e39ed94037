//! Launch-URL credential hand-off.
//!
//! A first-run link may carry the sync credential as a query parameter
//! (`?token=…` by default). It is read once, then removed from the address
//! shown back to the user.

use tracing::info;
use url::Url;

use crate::error::SyncResult;

/// Credential taken from a launch URL.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapCredential {
    pub credential: String,
    /// The launch URL without the credential parameter.
    pub stripped_url: String,
}

impl std::fmt::Debug for BootstrapCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapCredential")
            .field("credential", &"<redacted>")
            .field("stripped_url", &self.stripped_url)
            .finish()
    }
}

/// Pulls the `param` query value out of `launch_url`.
///
/// `Ok(None)` when the parameter is absent or blank. Other query pairs and
/// the fragment are kept in order.
pub fn bootstrap_credential(launch_url: &str, param: &str) -> SyncResult<Option<BootstrapCredential>> {
    let mut url = Url::parse(launch_url)?;

    let mut credential = None;
    let mut kept = Vec::new();
    for (key, value) in url.query_pairs() {
        if key == param {
            if credential.is_none() && !value.trim().is_empty() {
                credential = Some(value.trim().to_string());
            }
        } else {
            kept.push((key.into_owned(), value.into_owned()));
        }
    }

    let Some(credential) = credential else {
        return Ok(None);
    };

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }

    info!(url = %url, "Sync credential supplied by launch URL");
    Ok(Some(BootstrapCredential {
        credential,
        stripped_url: url.into(),
    }))
}
