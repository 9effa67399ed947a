//! Errors returned by the external roster source.

use thiserror::Error;

/// Error returned by a [`RosterSource`](crate::source::RosterSource) call.
///
/// `Unauthorized` and `Forbidden` are terminal for a stats unit; `InvalidId` is local to a
/// single record; every other variant is transient and left to the caller to retry.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The credential's access token has expired or been revoked.
    #[error("ESI rejected the credential as expired or revoked")]
    Unauthorized,
    /// The request was authenticated but refused, typically a missing corporation role.
    #[error("ESI refused the request ({status}): {message}")]
    Forbidden { status: u16, message: String },
    /// The requested id does not exist upstream.
    #[error("ESI does not recognise ID {0}")]
    InvalidId(i64),
    /// ESI answered with a status the source does not know how to handle.
    #[error("Unexpected ESI response status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },
    /// Error from the `eve_esi` client.
    #[error(transparent)]
    Esi(eve_esi::Error),
    /// Transport error from the HTTP client (timeouts, connection failures, bad payloads).
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl SourceError {
    /// Maps an `eve_esi` error to the roster source taxonomy.
    ///
    /// Authorization failures surface as [`SourceError::Unauthorized`] and
    /// [`SourceError::Forbidden`]; everything else stays wrapped as a transient error.
    pub fn from_esi(err: eve_esi::Error) -> Self {
        if let eve_esi::Error::ReqwestError(reqwest_error) = &err {
            if let Some(status) = reqwest_error.status() {
                match status.as_u16() {
                    401 => return Self::Unauthorized,
                    403 => {
                        return Self::Forbidden {
                            status: 403,
                            message: reqwest_error.to_string(),
                        }
                    }
                    _ => {}
                }
            }
        }

        Self::Esi(err)
    }
}
