//! SoloRank CLI
//!
//! Balance inspection tool: level curve, achievement catalog, starter quests
//! and single-quest reward simulation against an in-memory store.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use sr_core::data::starter_quests;
use sr_core::progression::{total_xp_for_level, xp_required_for_level};
use sr_core::{
    level_from_total_xp, BalanceConfig, Difficulty, FixedOffsetCalendar, GameSession, ManualClock,
    MemoryProfileStore, Quest, QuestCategory, UserProfile, CATALOG, MAX_LEVEL,
};

#[derive(Parser)]
#[command(name = "solorank")]
#[command(about = "Inspect SoloRank progression and rewards", long_about = None)]
struct Cli {
    /// Balance config JSON (overrides SOLORANK_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the XP needed for each level
    Curve {
        #[arg(long, default_value_t = 20)]
        max_level: u32,
    },

    /// List every achievement
    Catalog,

    /// List the starter quest board
    Quests,

    /// Settle one quest and print the reward as JSON
    Simulate {
        /// Estimated duration in minutes
        #[arg(long, default_value_t = 30)]
        minutes: u32,

        /// Base XP (defaults to the duration table)
        #[arg(long)]
        xp: Option<u64>,

        #[arg(long, default_value_t = 50)]
        gold: u64,

        /// Seconds left on the timer at completion. Negative means overtime.
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        remaining: i64,

        /// Total XP the profile starts with
        #[arg(long, default_value_t = 0)]
        total_xp: u64,

        #[arg(long, default_value = "Custom quest")]
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sr_core=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => BalanceConfig::load(path)?,
        None => BalanceConfig::from_env()?,
    };

    match cli.command {
        Commands::Curve { max_level } => print_curve(max_level.min(MAX_LEVEL)),
        Commands::Catalog => print_catalog(),
        Commands::Quests => print_quests(),
        Commands::Simulate { minutes, xp, gold, remaining, total_xp, name } => {
            let mut quest = Quest::from_duration(
                "sim-quest",
                name,
                QuestCategory::Study,
                Difficulty::Medium,
                minutes,
                gold,
            );
            if let Some(xp) = xp {
                quest.xp_reward = xp;
            }
            simulate(config, quest, remaining, total_xp)?;
        }
    }

    Ok(())
}

fn print_curve(max_level: u32) {
    println!("{:>5} {:>10} {:>12}", "level", "to reach", "total");
    for level in 1..=max_level {
        println!(
            "{:>5} {:>10} {:>12}",
            level,
            xp_required_for_level(level),
            total_xp_for_level(level)
        );
    }
}

fn print_catalog() {
    for achievement in CATALOG.iter() {
        println!(
            "{:<22} {:<10} {:<24} {}",
            achievement.id,
            format!("{:?}", achievement.rarity),
            achievement.name,
            achievement.description
        );
    }
    println!("{} achievements", CATALOG.len());
}

fn print_quests() {
    for quest in starter_quests() {
        println!(
            "{:<26} {:<8} {:>4}m {:>4}xp {:>4}g  {}",
            quest.id,
            quest.category.as_str(),
            quest.estimated_minutes,
            quest.xp_reward,
            quest.gold_reward,
            quest.name
        );
    }
}

fn simulate(config: BalanceConfig, quest: Quest, remaining: i64, total_xp: u64) -> Result<()> {
    let elapsed = quest.estimated_seconds() - remaining;
    if elapsed < 0 {
        bail!("remaining ({}s) exceeds the quest duration", remaining);
    }

    let mut profile = UserProfile::new("sim-user", "simulator");
    let progress = level_from_total_xp(total_xp);
    profile.total_xp = total_xp;
    profile.level = progress.level;
    profile.current_xp = progress.current_xp;

    let store = MemoryProfileStore::new();
    store.insert_profile(profile);
    let clock = ManualClock::new(Utc::now());
    let config = BalanceConfig { enforce_completion_gate: false, ..config };
    let mut session =
        GameSession::new("sim-user", store, clock.clone(), FixedOffsetCalendar::utc(), config);

    session.load_profile()?;
    session.start_quest(quest)?;
    for _ in 0..elapsed {
        session.tick();
    }
    clock.advance_secs(elapsed);

    let reward = session.complete_quest().context("settlement failed")?;
    info!(xp = reward.xp_earned, gold = reward.gold_earned, "simulation settled");
    println!("{}", serde_json::to_string_pretty(&reward)?);
    Ok(())
}
