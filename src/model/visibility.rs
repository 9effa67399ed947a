//! Permission-scoped visibility of stats units.
//!
//! Permissions themselves are stored elsewhere; callers hand in a [`Viewer`] describing what
//! the requesting user holds and this module decides which units that user may see.

use super::identity::MainCharacter;

/// Capabilities granted to a viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewPermissions {
    pub view_all: bool,
    pub view_corp: bool,
    pub view_alliance: bool,
    pub view_state: bool,
}

/// The user requesting access to corp stats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: i32,
    pub main: Option<MainCharacter>,
    pub permissions: ViewPermissions,
    /// Corporation ids that are members of the viewer's auth state
    pub state_corporations: Vec<i64>,
    /// Alliance ids that are members of the viewer's auth state
    pub state_alliances: Vec<i64>,
}

/// The parts of a unit that visibility is decided on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitScope {
    pub unit_id: i32,
    pub owner_id: Option<i32>,
    pub corporation_id: i64,
    pub alliance_id: Option<i64>,
}

impl Viewer {
    /// Determines whether the viewer may see the unit.
    ///
    /// A viewer with `view_all` sees every unit. Otherwise a main character is required, and
    /// the unit is visible when any of the following holds:
    /// - the viewer registered the unit's credential
    /// - `view_corp` and the unit tracks the main's corporation
    /// - `view_alliance` and the unit's corporation is in the main's alliance
    /// - `view_state` and the unit's corporation or alliance is a member of the viewer's state
    pub fn can_view(&self, unit: &UnitScope) -> bool {
        if self.permissions.view_all {
            return true;
        }

        let Some(main) = &self.main else {
            return false;
        };

        if unit.owner_id == Some(self.user_id) {
            return true;
        }

        if self.permissions.view_corp && unit.corporation_id == main.corporation_id {
            return true;
        }

        if self.permissions.view_alliance
            && main.alliance_id.is_some()
            && unit.alliance_id == main.alliance_id
        {
            return true;
        }

        if self.permissions.view_state {
            if self.state_corporations.contains(&unit.corporation_id) {
                return true;
            }

            if let Some(alliance_id) = unit.alliance_id {
                if self.state_alliances.contains(&alliance_id) {
                    return true;
                }
            }
        }

        false
    }

    /// Owners of a unit's credential may always trigger an update, as may anyone who can view it.
    pub fn can_update(&self, unit: &UnitScope) -> bool {
        unit.owner_id == Some(self.user_id) || self.can_view(unit)
    }
}
