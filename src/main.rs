//! Critical - command line runner
//!
//! Plays seeded self-play games with random controllers and prints the game
//! log, for manual inspection and for reproducing a session from its seed.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use critical_engine::{
    core::{Expansion, PlayerId},
    game::{play_random_game, GameConfig, GameEndReason, VerbosityLevel},
};
use rustc_hash::FxHashMap;

/// Expansion pack selectable on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExpansionArg {
    Attack,
    Future,
    Theft,
    Chaos,
    Deity,
    /// Every pack
    All,
}

impl ExpansionArg {
    fn expansions(self) -> Vec<Expansion> {
        match self {
            ExpansionArg::Attack => vec![Expansion::Attack],
            ExpansionArg::Future => vec![Expansion::Future],
            ExpansionArg::Theft => vec![Expansion::Theft],
            ExpansionArg::Chaos => vec![Expansion::Chaos],
            ExpansionArg::Deity => vec![Expansion::Deity],
            ExpansionArg::All => Expansion::ALL.to_vec(),
        }
    }
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

/// Table options shared by every subcommand
#[derive(clap::Args, Debug)]
struct TableArgs {
    /// Number of players (2 or more)
    #[arg(long, short = 'p', default_value_t = 4)]
    players: usize,

    /// Expansion packs to shuffle in (repeatable)
    #[arg(long = "expansion", short = 'e', value_enum)]
    expansions: Vec<ExpansionArg>,

    /// Let action cards form same-kind combos
    #[arg(long)]
    allow_action_combos: bool,

    /// Give up after this many actions
    #[arg(long, default_value_t = 5_000)]
    max_actions: u32,
}

impl TableArgs {
    fn player_ids(&self) -> anyhow::Result<Vec<PlayerId>> {
        if self.players < 2 {
            bail!("a game needs at least 2 players, got {}", self.players);
        }
        Ok((1..=self.players).map(|i| PlayerId::new(format!("player{i}"))).collect())
    }

    fn config(&self) -> GameConfig {
        GameConfig::new()
            .with_expansions(self.expansions.iter().flat_map(|e| e.expansions()))
            .with_action_card_combos(self.allow_action_combos)
    }
}

#[derive(Parser)]
#[command(name = "critical")]
#[command(about = "Critical - elimination card game rules engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one seeded game with random controllers and print its log
    Play {
        #[command(flatten)]
        table: TableArgs,

        /// Random seed (same seed, same game)
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// Print the final state as JSON
        #[arg(long)]
        dump_state: bool,
    },

    /// Run many games and report outcome statistics
    Profile {
        #[command(flatten)]
        table: TableArgs,

        /// Number of games to run
        #[arg(long, short = 'g', default_value_t = 1000)]
        games: usize,

        /// Seed of the first game; game i uses seed + i
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            table,
            seed,
            verbosity,
            dump_state,
        } => run_play(&table, seed, verbosity.0, dump_state),
        Commands::Profile { table, games, seed } => run_profile(&table, games, seed),
    }
}

fn run_play(table: &TableArgs, seed: u64, verbosity: VerbosityLevel, dump_state: bool) -> anyhow::Result<()> {
    let players = table.player_ids()?;
    let (state, result) = play_random_game(&players, &table.config(), seed, table.max_actions)
        .with_context(|| format!("game with seed {seed} failed"))?;

    critical_engine::game::logger::print_entries(&state.logs, verbosity);

    if verbosity > VerbosityLevel::Silent {
        println!("=== Game Over ===");
        match &result.end_reason {
            GameEndReason::LastSurvivor(winner) => println!("Winner: {winner}"),
            GameEndReason::NoSurvivors => println!("Nobody survived"),
            GameEndReason::ActionLimit => println!("Stopped after {} actions", result.actions_played),
            GameEndReason::Stalled(player) => println!("{player} had no move"),
        }
        println!("Actions played: {}", result.actions_played);
    }

    if dump_state {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }
    Ok(())
}

fn run_profile(table: &TableArgs, games: usize, seed: u64) -> anyhow::Result<()> {
    let players = table.player_ids()?;
    let config = table.config();

    let mut wins: FxHashMap<PlayerId, usize> = FxHashMap::default();
    let mut unfinished = 0usize;
    let mut total_actions = 0u64;
    let start = std::time::Instant::now();

    for game in 0..games {
        let game_seed = seed.wrapping_add(game as u64);
        let (_, result) = play_random_game(&players, &config, game_seed, table.max_actions)
            .with_context(|| format!("game with seed {game_seed} failed"))?;
        total_actions += u64::from(result.actions_played);
        match result.end_reason {
            GameEndReason::LastSurvivor(winner) => *wins.entry(winner).or_insert(0) += 1,
            _ => unfinished += 1,
        }
    }

    let elapsed = start.elapsed();
    println!("=== Profile Complete ===");
    println!("Games: {games}");
    println!("Unfinished: {unfinished}");
    for player in &players {
        println!("  {player}: {} wins", wins.get(player).copied().unwrap_or(0));
    }
    if games > 0 {
        println!("Avg actions/game: {:.1}", total_actions as f64 / games as f64);
        println!("Avg time/game: {:.3}ms", elapsed.as_secs_f64() * 1000.0 / games as f64);
    }
    Ok(())
}
