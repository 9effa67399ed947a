//! Read-only views of the identity graph.
//!
//! These records are produced by an [`IdentityGraph`](crate::identity::IdentityGraph)
//! implementation and consumed by the aggregator. They are snapshots: nothing in corpstats
//! writes back through them.

use serde::{Deserialize, Serialize};

/// A character's chosen primary ("main") character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainCharacter {
    pub character_id: i64,
    pub name: String,
    pub corporation_id: i64,
    pub alliance_id: Option<i64>,
}

/// The account that owns a character, with its chosen primary if one is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLink {
    pub user_id: i32,
    pub main: Option<MainCharacter>,
}

/// A character known to the identity store together with its ownership link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedCharacter {
    pub character_id: i64,
    pub name: String,
    pub corporation_id: i64,
    pub corporation_name: String,
    pub alliance_id: Option<i64>,
    /// `None` when no account has verified ownership of the character.
    pub account: Option<AccountLink>,
}

impl LinkedCharacter {
    /// Returns the owning account's main, if the character is linked and a main is chosen.
    pub fn main(&self) -> Option<&MainCharacter> {
        self.account.as_ref().and_then(|account| account.main.as_ref())
    }

    /// Returns true when this character is its own account's main.
    pub fn is_main(&self) -> bool {
        self.main()
            .map(|main| main.character_id == self.character_id)
            .unwrap_or(false)
    }
}
