// ABOUTME: Command-line front end for the energy balance engine
// ABOUTME: Calculates targets for a profile, or runs live tracking against a synthetic health feed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Energy balance command-line tool.
//!
//! Usage:
//! ```bash
//! # Targets for a profile and goal
//! cargo run --bin energy-balance -- targets --age 30 --weight 80 --height 180 --sex male \
//!     --activity moderate --goal lose --rate -0.5
//!
//! # Track today's balance for a minute with two meals logged
//! cargo run --bin energy-balance -- track --age 30 --weight 80 --height 180 --sex male \
//!     --activity moderate --food 650 --food 820 --duration-secs 60
//!
//! # Same, without a health feed
//! cargo run --bin energy-balance -- track --age 30 --weight 80 --height 180 --sex male --no-feed
//! ```

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use energy_balance::config::EngineConfig;
use energy_balance::engine::EnergyBalanceEngine;
use energy_balance::intelligence::{TargetCalculator, TargetInputs};
use energy_balance::logging;
use energy_balance::persistence::InMemoryStore;
use energy_core::errors::ErrorResponse;
use energy_core::models::{
    ActivityLevel, FoodEntry, GoalParameters, GoalType, Sex, SyncStatus, UserProfile,
};
use energy_core::{AppError, Clock, SystemClock};
use energy_feed::{HealthFeed, SyntheticHealthFeed};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "energy-balance",
    about = "Real-time energy balance and nutrition targets",
    long_about = "Calculate daily calorie, protein and water targets, or track the live calorie balance against a synthetic health feed."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print resting energy, daily need and targets as JSON
    Targets {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        goal: GoalArgs,

        /// Measured total daily energy expenditure (kcal) to use instead of the formula
        #[arg(long)]
        tdee: Option<f64>,
    },
    /// Run the engine and print balance and sync status updates
    Track {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        goal: GoalArgs,

        /// Calories of a food entry to log today (repeatable)
        #[arg(long)]
        food: Vec<f64>,

        /// Stop after this many seconds (runs until Ctrl-C when absent)
        #[arg(long)]
        duration_secs: Option<u64>,

        /// Run without a health feed; energy is always calculated
        #[arg(long)]
        no_feed: bool,

        /// Synthetic feed resting energy (kcal)
        #[arg(long, default_value = "1650")]
        feed_resting: f64,

        /// Synthetic feed active energy (kcal)
        #[arg(long, default_value = "450")]
        feed_active: f64,
    },
}

#[derive(Args)]
struct ProfileArgs {
    /// Age in years
    #[arg(long)]
    age: u32,

    /// Body weight (kg)
    #[arg(long)]
    weight: f64,

    /// Height (cm)
    #[arg(long)]
    height: f64,

    /// male, female or other
    #[arg(long, value_parser = parse_sex)]
    sex: Sex,

    /// sedentary, light, moderate, very or extra
    #[arg(long, value_parser = parse_activity, default_value = "sedentary")]
    activity: ActivityLevel,
}

impl ProfileArgs {
    fn profile(&self) -> UserProfile {
        UserProfile::new(self.age, self.weight, self.height, self.sex, self.activity)
    }
}

#[derive(Args)]
struct GoalArgs {
    /// lose, maintain, gain or muscle
    #[arg(long, value_parser = parse_goal, default_value = "maintain")]
    goal: GoalType,

    /// Weekly weight change (kg/week), negative to lose
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    rate: f64,
}

fn parse_sex(s: &str) -> Result<Sex, String> {
    match s.to_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        "other" => Ok(Sex::Other),
        _ => Err(format!("unknown sex '{s}'")),
    }
}

fn parse_activity(s: &str) -> Result<ActivityLevel, String> {
    ActivityLevel::from_str_lossy(s).ok_or_else(|| format!("unknown activity level '{s}'"))
}

fn parse_goal(s: &str) -> Result<GoalType, String> {
    GoalType::from_str_lossy(s).ok_or_else(|| format!("unknown goal type '{s}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_from_env()?;
    let config = EngineConfig::load()?;

    match cli.command {
        Command::Targets { profile, goal, tdee } => targets_command(&config, &profile, &goal, tdee),
        Command::Track {
            profile,
            goal,
            food,
            duration_secs,
            no_feed,
            feed_resting,
            feed_active,
        } => {
            let feed: Option<Arc<dyn HealthFeed>> = (!no_feed).then(|| {
                Arc::new(SyntheticHealthFeed::new(
                    feed_resting,
                    feed_active,
                    Some(profile.weight),
                )) as Arc<dyn HealthFeed>
            });
            track_command(config, &profile, &goal, &food, duration_secs, feed).await
        }
    }
}

fn targets_command(
    config: &EngineConfig,
    profile: &ProfileArgs,
    goal: &GoalArgs,
    tdee: Option<f64>,
) -> Result<()> {
    let calculator = TargetCalculator::new(config.targets.clone());
    let inputs = TargetInputs::from_profile(&profile.profile(), goal.goal, goal.rate)
        .with_measured_tdee(tdee);

    let params = GoalParameters::new(goal.goal, goal.rate);
    let checked = calculator
        .validate_goal(&params, SystemClock.today())
        .and_then(|()| calculator.calculate(&inputs));

    match checked {
        Ok(targets) => {
            println!("{}", serde_json::to_string_pretty(&targets)?);
            Ok(())
        }
        Err(error) => {
            let response = ErrorResponse::from(AppError::from(error));
            println!("{}", serde_json::to_string_pretty(&response)?);
            Err(anyhow!("{}", response.message))
        }
    }
}

async fn track_command(
    config: EngineConfig,
    profile: &ProfileArgs,
    goal: &GoalArgs,
    food: &[f64],
    duration_secs: Option<u64>,
    feed: Option<Arc<dyn HealthFeed>>,
) -> Result<()> {
    let store = Arc::new(InMemoryStore::with_user(profile.profile()));
    let clock = Arc::new(SystemClock);
    let engine = EnergyBalanceEngine::new(config, store, feed, clock)?;

    let created = engine
        .create_goal(GoalParameters::new(goal.goal, goal.rate))
        .await
        .map_err(AppError::from)?;
    info!(
        calories = created.daily_calorie_target,
        protein_g = created.daily_protein_target_g,
        water_ml = created.daily_water_target_ml,
        "Goal created"
    );

    let today = engine.today();
    for calories in food {
        let entry = FoodEntry::new(*calories, chrono::Utc::now());
        if let Err(error) = engine.add_food_entry(today, entry).await {
            warn!(error = %AppError::from(error), "Food entry rejected");
        }
    }

    let mut balances = engine.subscribe_balance();
    let mut statuses = engine.subscribe_sync_status();
    engine.start_tracking().await;

    let run = async {
        loop {
            tokio::select! {
                changed = balances.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    if let Some(balance) = *balances.borrow_and_update() {
                        println!("{}", serde_json::to_string(&balance).unwrap_or_default());
                    }
                }
                changed = statuses.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let status = statuses.borrow_and_update().clone();
                    if let SyncStatus::Failed(failure) = &status {
                        eprintln!("sync failed: {}", failure.message);
                    }
                }
            }
        }
    };

    match duration_secs {
        Some(secs) => {
            let _ = tokio::time::timeout(Duration::from_secs(secs), run).await;
        }
        None => {
            tokio::select! {
                () = run => {}
                _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C"),
            }
        }
    }

    engine.stop_tracking();
    Ok(())
}
