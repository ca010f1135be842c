pub mod config;
pub mod cues;
pub mod db;
pub mod errors;
pub mod exercise;
pub mod logging;
pub mod partner;
pub mod phase;
pub mod session;
pub mod store;

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();
#[cfg(feature = "uniffi")]
pub mod uniffi_interface;
