//! `clientDataJSON` handling.

use crate::error::WebAuthnError;
use base64::Engine;
use serde::Deserialize;

/// `type` value of an assertion (as opposed to a registration).
const ASSERTION_TYPE: &str = "webauthn.get";

/// The fields of `clientDataJSON` this crate reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    /// Ceremony type, `webauthn.get` for assertions.
    #[serde(rename = "type")]
    pub ty: String,
    /// Base64url challenge the relying party asked to sign.
    pub challenge: String,
    /// Origin of the page that ran the ceremony.
    pub origin: String,
    /// Whether the ceremony ran in a cross-origin iframe.
    #[serde(default)]
    pub cross_origin: bool,
}

impl ClientData {
    /// Parse `clientDataJSON` and check that it describes an assertion.
    ///
    /// # Errors
    ///
    /// Returns [`WebAuthnError::InvalidClientData`] for malformed JSON or a
    /// ceremony type other than `webauthn.get`.
    pub fn parse(client_data_json: &[u8]) -> Result<Self, WebAuthnError> {
        let client_data: ClientData = serde_json::from_slice(client_data_json)
            .map_err(|e| WebAuthnError::InvalidClientData(e.to_string()))?;

        if client_data.ty != ASSERTION_TYPE {
            return Err(WebAuthnError::InvalidClientData(format!(
                "expected type {ASSERTION_TYPE:?}, found {:?}",
                client_data.ty
            )));
        }

        Ok(client_data)
    }
}

/// The form a challenge takes inside `clientDataJSON`: unpadded base64url.
pub fn encode_challenge(challenge: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(challenge)
}

/// Split `clientDataJSON` around the first occurrence of `challenge`.
///
/// Returns the bytes before and after the match, so that
/// `prefix || challenge || suffix == client_data_json`. The predicate only
/// receives the prefix and suffix and splices in the challenge it derives
/// from the transaction itself.
///
/// # Errors
///
/// Returns [`WebAuthnError::ChallengeNotFound`] if `challenge` is empty or
/// does not occur.
pub fn split_client_data<'a>(
    client_data_json: &'a [u8],
    challenge: &[u8],
) -> Result<(&'a [u8], &'a [u8]), WebAuthnError> {
    if challenge.is_empty() || challenge.len() > client_data_json.len() {
        return Err(WebAuthnError::ChallengeNotFound);
    }

    let start = client_data_json
        .windows(challenge.len())
        .position(|window| window == challenge)
        .ok_or(WebAuthnError::ChallengeNotFound)?;

    Ok((
        &client_data_json[..start],
        &client_data_json[start + challenge.len()..],
    ))
}
