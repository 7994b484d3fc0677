//! Terminal front end for the AcademVault research workspace, built around a
//! promise-style dialog coordinator.

pub mod app;
pub mod config;
pub mod logging;

pub use app::dialog;
