pub mod expect;
pub mod request;
pub mod simulate;
pub mod variants;

use comfy_table::{ContentArrangement, Table};
use pw_core::{GachaError, GachaRequest, PullStats};
use pw_mechanics::{Variant, WinRule};

/// Errors surfaced by CLI commands.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Gacha(#[from] GachaError),

    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// 2 for problems with the caller's input, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Gacha(e) if e.is_caller_error() => 2,
            Self::Read { .. } => 2,
            _ => 1,
        }
    }
}

pub type CliResult = Result<(), CliError>;

/// One-line description of the starting state, e.g. `pity 20, guaranteed, radiance 1`.
fn describe_start(request: &GachaRequest, variant: Variant) -> String {
    let state = &request.initial_state;
    let mut parts = vec![format!("pity {}", state.pity)];
    if state.is_guaranteed {
        parts.push("guaranteed".to_string());
    }
    match variant.win_rule() {
        WinRule::Radiance { .. } => parts.push(format!("radiance {}", state.radiance_counter)),
        WinRule::FatePath { .. } => parts.push(format!("fate {}", state.fate_point)),
        WinRule::Guarantee { .. } => {}
    }
    parts.join(", ")
}

fn copies(n: u32) -> String {
    if n == 1 {
        "1 copy".to_string()
    } else {
        format!("{n} copies")
    }
}

/// Mean and percentile rows for each labelled population.
fn stats_table(rows: &[(&str, &PullStats)]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["", "Mean", "P25", "P50", "P75", "P90", "P95"]);

    let cell = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.0}"));
    for (label, stats) in rows {
        table.add_row(vec![
            label.to_string(),
            format!("{:.2}", stats.mean),
            cell(stats.p25),
            cell(stats.p50),
            cell(stats.p75),
            cell(stats.p90),
            cell(stats.p95),
        ]);
    }
    table
}
