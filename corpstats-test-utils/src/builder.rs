//! Declarative test builder.
//!
//! Configuration methods queue tables, database fixtures and mock endpoints; everything is
//! executed in order during the final `build()` call.

use eve_esi::model::{alliance::Alliance, character::Character, corporation::Corporation};
use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};
use serde_json::Value;

use crate::{error::TestError, TestContext};

type MockBuilder = Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>;

/// Builder for declarative test initialization.
pub struct TestBuilder {
    // Tables to create
    tables: Vec<TableCreateStatement>,
    include_identity_tables: bool,
    include_corpstats_tables: bool,

    // Database fixtures to insert
    alliances: Vec<i64>,
    corporations: Vec<(i64, Option<i64>)>, // (corp_id, alliance_id)
    characters: Vec<(i64, i64, Option<i64>)>, // (char_id, corp_id, alliance_id)
    users: Vec<(i64, Vec<i64>)>,              // (main_character_id, alt_character_ids)
    user_services: Vec<(i64, Vec<String>)>,   // (main_character_id, services)

    // Mock endpoints to create
    mock_builders: Vec<MockBuilder>,

    // Pre-configured endpoint shortcuts
    alliance_endpoints: Vec<(i64, Alliance, usize)>,
    corporation_endpoints: Vec<(i64, Corporation, usize)>,
    character_endpoints: Vec<(i64, Character, usize)>,
    member_tracking_endpoints: Vec<(i64, Vec<Value>, usize)>,
    member_tracking_error_endpoints: Vec<(i64, usize, String, usize)>,
    names_endpoints: Vec<(Vec<(i64, String)>, usize)>,
    type_endpoints: Vec<(i64, String, usize)>,
}

impl TestBuilder {
    /// Create a new TestBuilder with no tables, fixtures, or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            tables: Vec::new(),
            include_identity_tables: false,
            include_corpstats_tables: false,
            alliances: Vec::new(),
            corporations: Vec::new(),
            characters: Vec::new(),
            users: Vec::new(),
            user_services: Vec::new(),
            mock_builders: Vec::new(),
            alliance_endpoints: Vec::new(),
            corporation_endpoints: Vec::new(),
            character_endpoints: Vec::new(),
            member_tracking_endpoints: Vec::new(),
            member_tracking_error_endpoints: Vec::new(),
            names_endpoints: Vec::new(),
            type_endpoints: Vec::new(),
        }
    }

    /// Add the EVE entity and account linkage tables.
    ///
    /// Creates EveAlliance, EveCorporation, EveCharacter, AuthUser, AuthUserCharacter and
    /// AuthUserService.
    pub fn with_identity_tables(mut self) -> Self {
        self.include_identity_tables = true;
        self
    }

    /// Add every table corp stats uses.
    ///
    /// Creates the identity tables plus CorpstatsUnit, CorpstatsMember and Notification.
    pub fn with_corpstats_tables(mut self) -> Self {
        self.include_identity_tables = true;
        self.include_corpstats_tables = true;
        self
    }

    /// Add a custom entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use corpstats_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), corpstats_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(EveAlliance)
    ///     .with_table(EveCorporation)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Insert mock alliance into database.
    pub fn with_mock_alliance(mut self, alliance_id: i64) -> Self {
        self.alliances.push(alliance_id);
        self
    }

    /// Insert mock corporation into database, creating its alliance when specified.
    pub fn with_mock_corporation(mut self, corporation_id: i64, alliance_id: Option<i64>) -> Self {
        self.corporations.push((corporation_id, alliance_id));
        self
    }

    /// Insert mock character into database with its corporation and alliance.
    pub fn with_mock_character(
        mut self,
        character_id: i64,
        corporation_id: i64,
        alliance_id: Option<i64>,
    ) -> Self {
        self.characters
            .push((character_id, corporation_id, alliance_id));
        self
    }

    /// Create an account with a main and alts.
    ///
    /// All characters must be added via `with_mock_character`.
    ///
    /// # Arguments
    /// - `main_character_id` - EVE character ID of the account's main
    /// - `alt_character_ids` - EVE character IDs the account also owns
    pub fn with_user(mut self, main_character_id: i64, alt_character_ids: &[i64]) -> Self {
        self.users
            .push((main_character_id, alt_character_ids.to_vec()));
        self
    }

    /// Enroll the account whose main is the given character in services.
    ///
    /// The account must be added via `with_user`.
    pub fn with_user_services(mut self, main_character_id: i64, services: &[&str]) -> Self {
        self.user_services.push((
            main_character_id,
            services.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Add a custom mock endpoint to the test server.
    ///
    /// Custom endpoints are created before the shortcuts so tests can queue an error response
    /// ahead of a success for the same path.
    pub fn with_mock_endpoint<F>(mut self, builder: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(builder));
        self
    }

    /// Add mock endpoint at `/alliances/{alliance_id}`.
    pub fn with_alliance_endpoint(
        mut self,
        alliance_id: i64,
        alliance: Alliance,
        expected_requests: usize,
    ) -> Self {
        self.alliance_endpoints
            .push((alliance_id, alliance, expected_requests));
        self
    }

    /// Add mock endpoint at `/corporations/{corporation_id}`.
    pub fn with_corporation_endpoint(
        mut self,
        corporation_id: i64,
        corporation: Corporation,
        expected_requests: usize,
    ) -> Self {
        self.corporation_endpoints
            .push((corporation_id, corporation, expected_requests));
        self
    }

    /// Add mock endpoint at `/characters/{character_id}`.
    pub fn with_character_endpoint(
        mut self,
        character_id: i64,
        character: Character,
        expected_requests: usize,
    ) -> Self {
        self.character_endpoints
            .push((character_id, character, expected_requests));
        self
    }

    /// Add mock endpoint at `/corporations/{corporation_id}/membertracking`.
    pub fn with_member_tracking_endpoint(
        mut self,
        corporation_id: i64,
        members: Vec<Value>,
        expected_requests: usize,
    ) -> Self {
        self.member_tracking_endpoints
            .push((corporation_id, members, expected_requests));
        self
    }

    /// Add member tracking endpoint answering with `status` and an ESI error body.
    pub fn with_member_tracking_error(
        mut self,
        corporation_id: i64,
        status: usize,
        error: &str,
        expected_requests: usize,
    ) -> Self {
        self.member_tracking_error_endpoints.push((
            corporation_id,
            status,
            error.to_string(),
            expected_requests,
        ));
        self
    }

    /// Add mock endpoint at `/universe/names` resolving the given characters.
    pub fn with_names_endpoint(mut self, names: &[(i64, &str)], expected_requests: usize) -> Self {
        self.names_endpoints.push((
            names
                .iter()
                .map(|(id, name)| (*id, name.to_string()))
                .collect(),
            expected_requests,
        ));
        self
    }

    /// Add mock endpoint at `/universe/types/{type_id}`.
    pub fn with_type_endpoint(mut self, type_id: i64, name: &str, expected_requests: usize) -> Self {
        self.type_endpoints
            .push((type_id, name.to_string(), expected_requests));
        self
    }

    /// Build the test context.
    ///
    /// Creates tables, then inserts fixtures, then registers mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test context
    /// - `Err(TestError)` - Table creation, fixture insertion or ESI client setup failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new().await?;

        // 1. Create tables
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        let mut stmts = Vec::new();

        if self.include_identity_tables {
            stmts.push(schema.create_table_from_entity(entity::prelude::EveAlliance));
            stmts.push(schema.create_table_from_entity(entity::prelude::EveCorporation));
            stmts.push(schema.create_table_from_entity(entity::prelude::EveCharacter));
            stmts.push(schema.create_table_from_entity(entity::prelude::AuthUser));
            stmts.push(schema.create_table_from_entity(entity::prelude::AuthUserCharacter));
            stmts.push(schema.create_table_from_entity(entity::prelude::AuthUserService));
        }

        if self.include_corpstats_tables {
            stmts.push(schema.create_table_from_entity(entity::prelude::CorpstatsUnit));
            stmts.push(schema.create_table_from_entity(entity::prelude::CorpstatsMember));
            stmts.push(schema.create_table_from_entity(entity::prelude::Notification));
        }

        stmts.extend(self.tables);
        setup.with_tables(stmts).await?;

        // 2. Insert fixtures, parents first
        for alliance_id in self.alliances {
            setup.eve().insert_mock_alliance(alliance_id).await?;
        }

        for (corp_id, alliance_id) in self.corporations {
            setup
                .eve()
                .insert_mock_corporation(corp_id, alliance_id)
                .await?;
        }

        for (char_id, corp_id, alliance_id) in self.characters {
            setup
                .eve()
                .insert_mock_character(char_id, corp_id, alliance_id)
                .await?;
        }

        for (main_character_id, alt_character_ids) in self.users {
            setup
                .identity()
                .insert_user(main_character_id, &alt_character_ids)
                .await?;
        }

        for (main_character_id, services) in self.user_services {
            let services: Vec<&str> = services.iter().map(String::as_str).collect();
            setup
                .identity()
                .insert_user_services(main_character_id, &services)
                .await?;
        }

        // 3. Create mock endpoints
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (alliance_id, alliance, expected) in self.alliance_endpoints {
            mocks.push(
                setup
                    .eve()
                    .create_alliance_endpoint(alliance_id, alliance, expected),
            );
        }

        for (corp_id, corporation, expected) in self.corporation_endpoints {
            mocks.push(
                setup
                    .eve()
                    .create_corporation_endpoint(corp_id, corporation, expected),
            );
        }

        for (char_id, character, expected) in self.character_endpoints {
            mocks.push(
                setup
                    .eve()
                    .create_character_endpoint(char_id, character, expected),
            );
        }

        for (corp_id, members, expected) in self.member_tracking_endpoints {
            mocks.push(
                setup
                    .corpstats()
                    .create_member_tracking_endpoint(corp_id, members, expected),
            );
        }

        for (corp_id, status, error, expected) in self.member_tracking_error_endpoints {
            mocks.push(setup.corpstats().create_member_tracking_error_endpoint(
                corp_id, status, &error, expected,
            ));
        }

        for (names, expected) in self.names_endpoints {
            let names: Vec<(i64, &str)> = names
                .iter()
                .map(|(id, name)| (*id, name.as_str()))
                .collect();
            mocks.push(setup.corpstats().create_names_endpoint(&names, expected));
        }

        for (type_id, name, expected) in self.type_endpoints {
            mocks.push(
                setup
                    .corpstats()
                    .create_type_endpoint(type_id, &name, expected),
            );
        }

        // Store mocks in setup so they live as long as the test
        setup.mocks.extend(mocks);

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
