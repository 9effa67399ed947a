use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Corp stats unit {0} does not exist")]
    UnitNotFound(i32),
    #[error("Corporation {0} already has a corp stats unit")]
    UnitAlreadyExists(i64),
    #[error("Corporation {0} is not known to the identity store")]
    CorporationNotFound(i64),
}
