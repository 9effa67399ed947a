//! EVE HTTP mock endpoint creation utilities.
//!
//! Endpoints are registered with the mockito server and verify they were called the expected
//! number of times when the context's mocks are asserted.

use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use mockito::Mock;

use crate::fixtures::eve::EveFixtures;

impl<'a> EveFixtures<'a> {
    /// Create a mock GET endpoint at `/alliances/{alliance_id}`.
    pub fn create_alliance_endpoint(
        &mut self,
        alliance_id: i64,
        mock_alliance: Alliance,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/alliances/{}", alliance_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_alliance).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET endpoint at `/corporations/{corporation_id}`.
    pub fn create_corporation_endpoint(
        &mut self,
        corporation_id: i64,
        mock_corporation: Corporation,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/corporations/{}", corporation_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_corporation).unwrap())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET endpoint at `/characters/{character_id}`.
    pub fn create_character_endpoint(
        &mut self,
        character_id: i64,
        mock_character: Character,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/characters/{}", character_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&mock_character).unwrap())
            .expect(expected_requests)
            .create()
    }
}
