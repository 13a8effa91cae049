//! Port traits decoupling the domain from external collaborators.

pub mod config_port;
pub mod decision_port;
pub mod indicator_port;
pub mod price_port;
pub mod run_store_port;
