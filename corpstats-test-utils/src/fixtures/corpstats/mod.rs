use crate::TestContext;

pub mod data;
pub mod factory;
pub mod mockito;

impl TestContext {
    pub fn corpstats<'a>(&'a mut self) -> CorpStatsFixtures<'a> {
        CorpStatsFixtures { setup: self }
    }
}

pub struct CorpStatsFixtures<'a> {
    pub setup: &'a mut TestContext,
}
