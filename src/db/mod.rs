pub mod cities;
pub mod connection;
pub mod import;

pub use cities::{CityRecord, Dataset, Signal, SignalValue};
pub use connection::{init_db, Database};
