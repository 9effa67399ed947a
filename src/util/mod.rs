pub mod eve;
pub mod lock;
