use colored::Colorize;

use pw_core::{GachaRequest, GachaResponse, Mode};
use pw_mechanics::Variant;

use super::{CliResult, copies, describe_start};

pub fn run(request: &GachaRequest, json: bool) -> CliResult {
    let request = request.clone().with_mode(Mode::Expectation);
    let variant = Variant::from_keys(request.game, request.pool)?;
    let response = pw_engine::run(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    print_response(&response, variant);
    Ok(())
}

fn print_response(response: &GachaResponse, variant: Variant) {
    let args = &response.args;
    println!(
        "  {} {} {}",
        "Expectation".bold(),
        variant.to_string().cyan(),
        format!(
            "({}, {})",
            copies(args.target_count),
            describe_start(args, variant)
        )
        .dimmed()
    );
    println!();
    println!(
        "  Expected pulls: {}",
        format!("{:.2}", response.pulls.mean).green().bold()
    );
    if args.target_count > 1 {
        let per_copy = response.pulls.mean / f64::from(args.target_count);
        println!("  Per copy:       {per_copy:.2}");
    }
}
