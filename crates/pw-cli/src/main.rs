//! CLI frontend for the Pitywise gacha probability engine.

mod commands;

use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};
use pw_core::{GachaRequest, GameKey, PoolKey};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pw",
    about = "Pitywise: expected pulls and pull distributions for gacha banners",
    version,
    propagate_version = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Banner and starting state shared by `expect` and `simulate`.
#[derive(Args)]
struct BannerArgs {
    /// Game: genshin, hsr, zzz
    #[arg(short, long)]
    game: GameKey,

    /// Pool: character, weapon, lightcone
    #[arg(short, long)]
    pool: PoolKey,

    /// Copies of the featured item wanted
    #[arg(short, long, default_value = "1")]
    count: u32,

    /// Pulls since the last 5★
    #[arg(long, default_value = "0")]
    pity: u32,

    /// Next 5★ is guaranteed featured
    #[arg(long)]
    guaranteed: bool,

    /// Capturing Radiance counter (Genshin character)
    #[arg(long, default_value = "0")]
    radiance: u32,

    /// Epitomized Path fate points (Genshin weapon)
    #[arg(long, default_value = "0")]
    fate: u32,
}

impl BannerArgs {
    fn to_request(&self) -> GachaRequest {
        GachaRequest::new(self.game, self.pool)
            .with_target_count(self.count)
            .with_pity(self.pity)
            .with_guaranteed(self.guaranteed)
            .with_radiance_counter(self.radiance)
            .with_fate_point(self.fate)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Exact expected number of pulls
    Expect {
        #[command(flatten)]
        banner: BannerArgs,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Monte Carlo distribution of pulls and byproduct currency
    Simulate {
        #[command(flatten)]
        banner: BannerArgs,

        /// Pull budget for the success rate
        #[arg(short, long)]
        budget: Option<u32>,

        /// Number of simulated runs (default depends on the pool)
        #[arg(short, long)]
        runs: Option<usize>,

        /// RNG seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Worker threads (0 = all cores)
        #[arg(short, long, default_value = "0")]
        threads: usize,

        /// The featured 4★ is already maxed
        #[arg(long)]
        up4_c6: bool,

        /// Print the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a JSON request body read from a file or stdin (`-`)
    Request {
        /// Path to the request body, or `-` for stdin
        path: String,

        /// Number of simulated runs for distribution requests
        #[arg(short, long)]
        runs: Option<usize>,

        /// RNG seed for distribution requests
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List supported banners and their rule constants
    Variants {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Expect { banner, json } => commands::expect::run(&banner.to_request(), json),
        Commands::Simulate {
            banner,
            budget,
            runs,
            seed,
            threads,
            up4_c6,
            json,
        } => {
            let request = banner
                .to_request()
                .with_budget(budget)
                .with_up4_c6(up4_c6);
            let options = commands::simulate::Options {
                runs,
                seed,
                threads,
                json,
            };
            commands::simulate::run(&request, &options)
        }
        Commands::Request { path, runs, seed } => commands::request::run(&path, runs, seed),
        Commands::Variants { json } => commands::variants::run(json),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}
