use colored::Colorize;

use pw_core::{GachaRequest, GachaResponse, Mode};
use pw_engine::SimConfig;
use pw_mechanics::Variant;

use super::{CliResult, copies, describe_start, stats_table};

/// Run options that are not part of the request itself.
pub struct Options {
    pub runs: Option<usize>,
    pub seed: Option<u64>,
    pub threads: usize,
    pub json: bool,
}

impl Options {
    fn config(&self) -> SimConfig {
        SimConfig {
            simulation_count: self.runs,
            seed: self.seed,
            ..SimConfig::default()
        }
        .with_threads(self.threads)
    }
}

pub fn run(request: &GachaRequest, options: &Options) -> CliResult {
    let request = request.clone().with_mode(Mode::Distribution);
    let variant = Variant::from_keys(request.game, request.pool)?;
    let config = options.config();
    let response = pw_engine::run_with(&request, &config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    let runs = config.runs_or(variant.default_simulation_count());
    print_response(&response, variant, runs, options.seed);
    Ok(())
}

fn print_response(response: &GachaResponse, variant: Variant, runs: usize, seed: Option<u64>) {
    let args = &response.args;
    let seed = seed.map_or_else(|| "random".to_string(), |s| s.to_string());
    println!(
        "  {} {} {}",
        "Distribution".bold(),
        variant.to_string().cyan(),
        format!(
            "({}, {}, {runs} runs, seed={seed})",
            copies(args.target_count),
            describe_start(args, variant)
        )
        .dimmed()
    );
    println!();

    let mut rows = vec![("Pulls", &response.pulls)];
    if let Some(returns) = &response.returns {
        rows.push(("Returns", returns));
    }
    println!("{}", stats_table(&rows));

    if let (Some(rate), Some(budget)) = (response.success_rate, args.budget) {
        let pct = format!("{rate:.1}%");
        let pct = if rate >= 80.0 {
            pct.green().bold()
        } else if rate >= 50.0 {
            pct.yellow().bold()
        } else {
            pct.red().bold()
        };
        println!();
        println!("  Success within {budget} pulls: {pct}");
    }
}
