use serde_json::{json, Value};

/// Default ship type of mock tracked members (Rifter).
pub const MOCK_SHIP_TYPE_ID: i64 = 587;

/// Create a member tracking entry as returned by ESI.
///
/// The member is docked in Jita 4-4 flying [`MOCK_SHIP_TYPE_ID`].
pub fn mock_tracked_member(character_id: i64) -> Value {
    json!({
        "character_id": character_id,
        "base_id": 60003760,
        "location_id": 60003760,
        "logoff_date": "2025-01-01T12:00:00Z",
        "logon_date": "2025-01-01T10:00:00Z",
        "ship_type_id": MOCK_SHIP_TYPE_ID,
        "start_date": "2024-10-07T21:43:09Z"
    })
}

/// Create a member tracking entry carrying only the character ID.
pub fn mock_bare_tracked_member(character_id: i64) -> Value {
    json!({ "character_id": character_id })
}
