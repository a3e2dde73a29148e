// ABOUTME: Repforge CLI - command-line front end for the achievement engine
// ABOUTME: Runs evaluation cycles and manages goals, schedules and settings in a SQLite store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Run one evaluation cycle and print the events it raised
//! repforge-cli evaluate
//!
//! # Evaluate as of a fixed instant
//! repforge-cli evaluate --at 2025-03-01T09:00:00Z
//!
//! # Create a goal
//! repforge-cli goal create --title "Bench 100" --kind lift_weight --exercise "Bench Press" --target 100
//!
//! # Train Monday, Wednesday and Friday
//! repforge-cli schedule set --workout push-day --days mon,wed,fri
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use repforge::config::{DatabaseUrl, ServerConfig};
use repforge::database::Database;
use repforge::logging::LoggingConfig;
use repforge::services::AchievementService;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "repforge-cli",
    about = "Repforge achievement engine CLI",
    long_about = "Evaluate achievements and manage user goals, workout schedules and settings."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Run one evaluation cycle
    Evaluate {
        /// Evaluate as of this RFC 3339 instant instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// List every achievement definition
    Catalog,
    /// List every achievement instance with its progress
    Instances,
    /// User goal management
    Goal {
        #[command(subcommand)]
        action: GoalCommand,
    },
    /// Logged exercise names
    Exercises {
        /// Only names starting with this prefix
        #[arg(long)]
        prefix: Option<String>,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
    /// Recurring workout schedules
    Schedule {
        #[command(subcommand)]
        action: ScheduleCommand,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum GoalCommand {
    /// Create a goal and evaluate it immediately
    Create {
        /// Goal title
        #[arg(long)]
        title: String,

        /// Goal description
        #[arg(long)]
        description: Option<String>,

        /// One of `lift_weight`, `reps_at_weight`, `frequency_in_window`,
        /// `body_weight_relation`, `streak`, `time_under_tension`
        #[arg(long)]
        kind: String,

        /// Exercise the goal refers to
        #[arg(long)]
        exercise: Option<String>,

        /// Primary target
        #[arg(long)]
        target: f64,

        /// Secondary target (minimum weight for `reps_at_weight`)
        #[arg(long)]
        secondary: Option<f64>,

        /// Window in days
        #[arg(long)]
        window_days: Option<u32>,

        /// RFC 3339 deadline
        #[arg(long)]
        deadline: Option<DateTime<Utc>>,
    },
    /// Delete a goal with its definition and instance
    Delete {
        /// Goal ID
        goal_id: String,
    },
    /// List goals, newest first
    List,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum SettingsCommand {
    /// Update the default unit and body weight
    Set {
        /// Default weight unit for sets logged without one (kg or lb)
        #[arg(long)]
        unit: Option<String>,

        /// Body weight in kilograms
        #[arg(long)]
        body_weight: Option<f64>,
    },
}

#[non_exhaustive]
#[derive(Subcommand)]
enum ScheduleCommand {
    /// Create or replace a schedule
    Set {
        /// Workout identifier sessions are logged against
        #[arg(long)]
        workout: String,

        /// Comma-separated weekdays, e.g. mon,wed,fri
        #[arg(long)]
        days: String,

        /// Store the schedule disabled
        #[arg(long)]
        disabled: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_env();
    let logging = if cli.verbose {
        logging.with_level("debug")
    } else {
        logging
    };
    logging.init()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(url) = cli.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url);
    }

    info!(database = %config.database.url, "Repforge CLI");
    let database = Database::new(&config.database.url).await?;
    let service = AchievementService::new(database, config.achievements).await?;

    match cli.command {
        Command::Evaluate { at } => commands::achievements::evaluate(&service, at).await?,
        Command::Catalog => commands::achievements::catalog(&service).await?,
        Command::Instances => commands::achievements::instances(&service),
        Command::Exercises { prefix } => {
            commands::achievements::exercises(&service, prefix.as_deref()).await?;
        }
        Command::Goal { action } => match action {
            GoalCommand::Create {
                title,
                description,
                kind,
                exercise,
                target,
                secondary,
                window_days,
                deadline,
            } => {
                let request = commands::goals::GoalArgs {
                    title,
                    description,
                    kind,
                    exercise,
                    target,
                    secondary,
                    window_days,
                    deadline,
                };
                commands::goals::create(&service, request).await?;
            }
            GoalCommand::Delete { goal_id } => commands::goals::delete(&service, &goal_id).await?,
            GoalCommand::List => commands::goals::list(&service),
        },
        Command::Settings { action } => match action {
            SettingsCommand::Set { unit, body_weight } => {
                commands::log::set_settings(&service, unit.as_deref(), body_weight).await?;
            }
        },
        Command::Schedule { action } => match action {
            ScheduleCommand::Set {
                workout,
                days,
                disabled,
            } => commands::log::set_schedule(&service, workout, &days, !disabled).await?,
        },
    }

    Ok(())
}
