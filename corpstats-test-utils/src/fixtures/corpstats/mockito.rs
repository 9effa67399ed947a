//! Mock endpoints for the ESI routes a roster sync calls.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::fixtures::corpstats::CorpStatsFixtures;

impl<'a> CorpStatsFixtures<'a> {
    /// Create a mock GET endpoint at `/corporations/{corporation_id}/membertracking`.
    ///
    /// # Arguments
    /// - `corporation_id` - The corporation ID for the endpoint path
    /// - `members` - Member tracking entries to return, see
    ///   [`mock_tracked_member`](crate::factory::mock_tracked_member)
    /// - `expected_requests` - Number of times this endpoint should be called
    pub fn create_member_tracking_endpoint(
        &mut self,
        corporation_id: i64,
        members: Vec<Value>,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/corporations/{}/membertracking", corporation_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .match_header("authorization", Matcher::Regex("^Bearer .+".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(members).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a member tracking endpoint answering with an ESI error body.
    pub fn create_member_tracking_error_endpoint(
        &mut self,
        corporation_id: i64,
        status: usize,
        error: &str,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/corporations/{}/membertracking", corporation_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": error }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock POST endpoint at `/universe/names` resolving the given characters.
    ///
    /// Every batch request receives the full list.
    pub fn create_names_endpoint(
        &mut self,
        names: &[(i64, &str)],
        expected_requests: usize,
    ) -> Mock {
        let body: Vec<Value> = names
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name, "category": "character" }))
            .collect();

        self.setup
            .server
            .mock("POST", "/universe/names")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(Value::Array(body).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock POST endpoint at `/universe/names` answering with an error status.
    pub fn create_names_error_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        self.setup
            .server
            .mock("POST", "/universe/names")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "error": "Internal server error" }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET endpoint at `/universe/types/{type_id}`.
    pub fn create_type_endpoint(
        &mut self,
        type_id: i64,
        name: &str,
        expected_requests: usize,
    ) -> Mock {
        let url = format!("/universe/types/{}", type_id);

        self.setup
            .server
            .mock("GET", url.as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({ "type_id": type_id, "name": name }).to_string())
            .expect(expected_requests)
            .create()
    }
}
