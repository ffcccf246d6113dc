pub mod myconfig;

pub use self::myconfig::{Config, DatastoreConfig};
