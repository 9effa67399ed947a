mod refresh;
mod stats;
mod sync;
mod unit;
