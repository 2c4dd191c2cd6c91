//! Core library for the `autopush` CLI.
//!
//! This crate defines:
//! - The on-disk Config Document and its typed settings view
//! - The secrets file and credential slots
//! - Clients for the GitHub and weather collaborators, behind traits
//! - Cron schedule handling and the tagged-job registrar
//! - The updater orchestration and its error-reporting wrapper
//!
//! It is used by `autopush-cli`, but can also be reused by other binaries.

pub mod cron;
pub mod error;
pub mod github;
pub mod notify;
pub mod secrets;
pub mod storage;
pub mod updater;
pub mod weather;

pub use cron::{CrontabScheduler, Schedule, Scheduler};
pub use error::{Error, Result};
pub use github::{GithubClient, ProfileHost};
pub use secrets::{SecretKind, SecretsFile};
pub use storage::{BioSource, Settings, Storage};
pub use weather::{WeatherApiClient, WeatherReport, WeatherSource, format_weather};
