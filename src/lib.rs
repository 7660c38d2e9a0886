#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::cast_precision_loss
)]

pub mod agent;
pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod experiment;
pub mod game;
pub mod logger;
pub mod prompt;
pub mod providers;

pub use config::Config;
pub use error::{GameError, Result};
