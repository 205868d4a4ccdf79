pub mod catalog;

pub use catalog::{Activity, ActivityCatalog, EXIT_ACTIVITY_NAME};
