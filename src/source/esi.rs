use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::{
    error::source::SourceError,
    model::roster::{Credential, ResolvedName, TrackedMember},
    source::RosterSource,
};

/// [`RosterSource`] backed by EVE Online's ESI.
///
/// Public character lookups go through the `eve_esi` client. Member tracking, bulk name
/// resolution and type lookups are issued with `reqwest` against the same ESI base URL.
pub struct EsiRosterSource {
    esi_client: eve_esi::Client,
    http_client: reqwest::Client,
    esi_url: String,
}

#[derive(Deserialize)]
struct EsiErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct EsiType {
    name: String,
}

impl EsiRosterSource {
    /// Creates a new instance of [`EsiRosterSource`]
    ///
    /// # Arguments
    /// - `esi_client` - ESI client used for public character information
    /// - `http_client` - HTTP client carrying the application user agent
    /// - `esi_url` - ESI base URL, e.g. `https://esi.evetech.net/latest`
    pub fn new(esi_client: eve_esi::Client, http_client: reqwest::Client, esi_url: &str) -> Self {
        Self {
            esi_client,
            http_client,
            esi_url: esi_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.esi_url, path)
    }

    /// Maps a non-success response to a [`SourceError`].
    async fn error_from_response(response: reqwest::Response) -> SourceError {
        let status = response.status();
        let url = response.url().to_string();

        match status {
            StatusCode::UNAUTHORIZED => SourceError::Unauthorized,
            StatusCode::FORBIDDEN => {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<EsiErrorBody>(&body)
                    .map(|b| b.error)
                    .unwrap_or(body);

                SourceError::Forbidden {
                    status: status.as_u16(),
                    message,
                }
            }
            _ => SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            },
        }
    }
}

#[async_trait]
impl RosterSource for EsiRosterSource {
    async fn character_corporation(&self, character_id: i64) -> Result<i64, SourceError> {
        let character = self
            .esi_client
            .character()
            .get_character_public_information(character_id)
            .await
            .map_err(SourceError::from_esi)?;

        Ok(character.corporation_id)
    }

    async fn member_tracking(
        &self,
        corporation_id: i64,
        credential: &Credential,
    ) -> Result<Vec<TrackedMember>, SourceError> {
        let response = self
            .http_client
            .get(self.url(&format!("/corporations/{}/membertracking", corporation_id)))
            .bearer_auth(&credential.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<Vec<TrackedMember>>().await?)
    }

    async fn resolve_names(&self, ids: &[i64]) -> Result<Vec<ResolvedName>, SourceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .http_client
            .post(self.url("/universe/names"))
            .json(ids)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json::<Vec<ResolvedName>>().await?)
    }

    async fn resolve_type_name(&self, type_id: i64) -> Result<String, SourceError> {
        let response = self
            .http_client
            .get(self.url(&format!("/universe/types/{}", type_id)))
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => Ok(response.json::<EsiType>().await?.name),
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(SourceError::InvalidId(type_id))
            }
            _ => Err(Self::error_from_response(response).await),
        }
    }
}
