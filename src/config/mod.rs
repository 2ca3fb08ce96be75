//! User configuration: the on-disk store and the typed settings read from it.

pub mod settings;
pub mod store;

pub use settings::{BRANCH_MAX_LENGTH, Settings};
pub use store::{ConfigMap, ConfigStore};
