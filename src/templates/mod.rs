pub mod step_catalog_defaults;

pub use step_catalog_defaults::{default_step_descriptors, install_default_step_catalog};
