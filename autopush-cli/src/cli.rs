use anyhow::Context;
use clap::{Parser, Subcommand};

use autopush_core::{CrontabScheduler, Schedule, Storage};

use crate::commands;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "autopush",
    version,
    about = "Keep your GitHub bio fresh with static text or live weather"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the stored secrets and the configuration document.
    Checkup,

    /// Store a credential in the secrets file.
    Setup {
        /// Credential slot: 1 = GitHub personal access token, 2 = Weather API key.
        #[arg(long)]
        key: u8,

        /// The credential value, stored as given.
        #[arg(long)]
        value: String,
    },

    /// Configure the bio source and register the scheduled update job.
    Start {
        /// Static bio content; omit to use live weather instead.
        #[arg(long)]
        content: Option<String>,

        /// Minute of the scheduled run (0-59).
        #[arg(long, default_value_t = 0)]
        minute: u32,

        /// Hour of the scheduled run (0-23).
        #[arg(long, default_value_t = 6)]
        hour: u32,

        /// Day of month of the scheduled run (1-31).
        #[arg(long, default_value_t = 1)]
        day: u32,

        /// Month of the scheduled run (1-12).
        #[arg(long, default_value_t = 1)]
        month: u32,
    },

    /// Remove the scheduled update job.
    Stop,

    /// Run one bio update immediately (invoked by the scheduled job).
    Update,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        // Dependencies are built once here and passed down by reference;
        // the command handlers hold no ambient state.
        let storage = Storage::open()?;
        storage.init().context("failed to initialize storage")?;
        let scheduler = CrontabScheduler;

        match self.command {
            Command::Checkup => commands::checkup::run(&storage),
            Command::Setup { key, value } => commands::setup::run(&storage, key, &value),
            Command::Start {
                content,
                minute,
                hour,
                day,
                month,
            } => {
                let schedule = Schedule::new(minute, hour, day, month);
                commands::start::run(&storage, &scheduler, content.as_deref(), schedule).await
            }
            Command::Stop => commands::stop::run(&storage, &scheduler),
            Command::Update => commands::update::run(&storage).await,
        }
    }
}
