//! Read-only view of the account linkage graph.
//!
//! The linkage store (accounts, the characters they have verified, the main each account has
//! chosen, and the external services each account is enrolled in) is owned by another system.
//! Corpstats only queries it through [`IdentityGraph`].

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use crate::{
    data::{
        eve::{AllianceRepository, CharacterRepository, CorporationRepository},
        identity::IdentityRepository,
    },
    model::{
        db::EveCharacterModel,
        identity::{AccountLink, LinkedCharacter, MainCharacter},
    },
};

#[async_trait]
pub trait IdentityGraph: Send + Sync {
    /// Characters whose current corporation is the given EVE corporation.
    async fn characters_in_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr>;

    /// Every character owned by an account whose main is in the given EVE corporation.
    async fn characters_with_main_in_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr>;

    /// Every character owned by an account whose main is in the given EVE alliance.
    async fn characters_with_main_in_alliance(
        &self,
        alliance_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr>;

    /// The main of the account owning the character, if the character is linked and a main is set.
    async fn main_of(&self, character_id: i64) -> Result<Option<MainCharacter>, DbErr>;

    /// Enrolled service keys per account.
    async fn service_enrollments(
        &self,
        user_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, DbErr>;
}

/// [`IdentityGraph`] over the linkage tables in the application database.
pub struct DbIdentityGraph<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DbIdentityGraph<'a> {
    /// Creates a new instance of [`DbIdentityGraph`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn characters_with_main_in(
        &self,
        corporation_record_ids: &[i32],
    ) -> Result<Vec<LinkedCharacter>, DbErr> {
        let identity_repo = IdentityRepository::new(self.db);
        let character_repo = CharacterRepository::new(self.db);

        let users = identity_repo
            .users_with_main_in_corporations(corporation_record_ids)
            .await?;
        let user_ids: Vec<i32> = users.iter().map(|user| user.id).collect();

        let character_ids: Vec<i32> = identity_repo
            .ownerships_by_users(&user_ids)
            .await?
            .into_iter()
            .map(|ownership| ownership.character_id)
            .collect();

        let characters = character_repo.get_many_by_ids(&character_ids).await?;

        self.link(characters).await
    }

    /// Attaches corporation, alliance and ownership information to character records.
    async fn link(
        &self,
        characters: Vec<EveCharacterModel>,
    ) -> Result<Vec<LinkedCharacter>, DbErr> {
        if characters.is_empty() {
            return Ok(Vec::new());
        }

        let identity_repo = IdentityRepository::new(self.db);
        let character_repo = CharacterRepository::new(self.db);
        let corporation_repo = CorporationRepository::new(self.db);
        let alliance_repo = AllianceRepository::new(self.db);

        let character_record_ids: Vec<i32> = characters.iter().map(|c| c.id).collect();

        // character record id -> user id
        let owners: HashMap<i32, i32> = identity_repo
            .ownerships_by_characters(&character_record_ids)
            .await?
            .into_iter()
            .map(|ownership| (ownership.character_id, ownership.user_id))
            .collect();

        let user_ids: Vec<i32> = owners
            .values()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        // user id -> main character record id
        let user_mains: HashMap<i32, Option<i32>> = identity_repo
            .users_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user.main_character_id))
            .collect();

        let mut known: HashMap<i32, EveCharacterModel> =
            characters.iter().map(|c| (c.id, c.clone())).collect();

        let missing_main_ids: Vec<i32> = user_mains
            .values()
            .flatten()
            .filter(|id| !known.contains_key(*id))
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        for main in character_repo.get_many_by_ids(&missing_main_ids).await? {
            known.insert(main.id, main);
        }

        let corporation_record_ids: Vec<i32> = known
            .values()
            .map(|c| c.corporation_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let corporations: HashMap<i32, _> = corporation_repo
            .get_many_by_ids(&corporation_record_ids)
            .await?
            .into_iter()
            .map(|corporation| (corporation.id, corporation))
            .collect();

        let alliance_record_ids: Vec<i32> = corporations
            .values()
            .filter_map(|corporation| corporation.alliance_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        // alliance record id -> EVE alliance id
        let alliances: HashMap<i32, i64> = alliance_repo
            .get_many_by_ids(&alliance_record_ids)
            .await?
            .into_iter()
            .map(|alliance| (alliance.id, alliance.alliance_id))
            .collect();

        let affiliation = |character: &EveCharacterModel| -> (i64, String, Option<i64>) {
            match corporations.get(&character.corporation_id) {
                Some(corporation) => (
                    corporation.corporation_id,
                    corporation.name.clone(),
                    corporation
                        .alliance_id
                        .and_then(|id| alliances.get(&id).copied()),
                ),
                None => (0, String::new(), None),
            }
        };

        let mut linked = Vec::with_capacity(characters.len());

        for character in &characters {
            let (corporation_id, corporation_name, alliance_id) = affiliation(character);

            let account = owners.get(&character.id).map(|user_id| {
                let main = user_mains
                    .get(user_id)
                    .copied()
                    .flatten()
                    .and_then(|main_id| known.get(&main_id))
                    .map(|main| {
                        let (corporation_id, _, alliance_id) = affiliation(main);

                        MainCharacter {
                            character_id: main.character_id,
                            name: main.name.clone(),
                            corporation_id,
                            alliance_id,
                        }
                    });

                AccountLink {
                    user_id: *user_id,
                    main,
                }
            });

            linked.push(LinkedCharacter {
                character_id: character.character_id,
                name: character.name.clone(),
                corporation_id,
                corporation_name,
                alliance_id,
                account,
            });
        }

        Ok(linked)
    }
}

#[async_trait]
impl<'a> IdentityGraph for DbIdentityGraph<'a> {
    async fn characters_in_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr> {
        let Some(corporation) = CorporationRepository::new(self.db)
            .get_by_corporation_id(corporation_id)
            .await?
        else {
            return Ok(Vec::new());
        };

        let characters = CharacterRepository::new(self.db)
            .get_by_corporations(&[corporation.id])
            .await?;

        self.link(characters).await
    }

    async fn characters_with_main_in_corporation(
        &self,
        corporation_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr> {
        let Some(corporation) = CorporationRepository::new(self.db)
            .get_by_corporation_id(corporation_id)
            .await?
        else {
            return Ok(Vec::new());
        };

        self.characters_with_main_in(&[corporation.id]).await
    }

    async fn characters_with_main_in_alliance(
        &self,
        alliance_id: i64,
    ) -> Result<Vec<LinkedCharacter>, DbErr> {
        let Some(alliance) = AllianceRepository::new(self.db)
            .get_by_alliance_id(alliance_id)
            .await?
        else {
            return Ok(Vec::new());
        };

        let corporation_record_ids: Vec<i32> = CorporationRepository::new(self.db)
            .get_by_alliance(alliance.id)
            .await?
            .into_iter()
            .map(|corporation| corporation.id)
            .collect();

        self.characters_with_main_in(&corporation_record_ids).await
    }

    async fn main_of(&self, character_id: i64) -> Result<Option<MainCharacter>, DbErr> {
        let character = entity::prelude::EveCharacter::find()
            .filter(entity::eve_character::Column::CharacterId.eq(character_id))
            .one(self.db)
            .await?;

        let Some(character) = character else {
            return Ok(None);
        };

        Ok(self
            .link(vec![character])
            .await?
            .into_iter()
            .next()
            .and_then(|linked| linked.account)
            .and_then(|account| account.main))
    }

    async fn service_enrollments(
        &self,
        user_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<String>>, DbErr> {
        let mut enrollments: HashMap<i32, Vec<String>> = HashMap::new();

        for service in IdentityRepository::new(self.db)
            .services_by_users(user_ids)
            .await?
        {
            enrollments
                .entry(service.user_id)
                .or_default()
                .push(service.service);
        }

        Ok(enrollments)
    }
}
