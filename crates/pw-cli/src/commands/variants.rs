use comfy_table::{ContentArrangement, Table};
use serde_json::{Value, json};

use pw_mechanics::{AbsorbingChain, Variant, WinRule};

use super::CliResult;

pub fn run(json: bool) -> CliResult {
    if json {
        let list: Vec<Value> = pw_engine::models().map(|m| describe(m.variant())).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Banner",
        "Base",
        "Soft pity",
        "Hard pity",
        "Win rule",
        "Chain states",
        "Default runs",
    ]);

    for model in pw_engine::models() {
        let variant = model.variant();
        let curve = variant.curve();
        table.add_row(vec![
            variant.to_string(),
            format!("{:.2}%", curve.base * 100.0),
            curve.soft_pity.to_string(),
            curve.hard_pity.to_string(),
            win_rule_label(variant.win_rule()),
            AbsorbingChain::new(variant.chain_id()).state_count().to_string(),
            model.default_simulation_count().to_string(),
        ]);
    }

    println!("{table}");
    Ok(())
}

fn win_rule_label(rule: WinRule) -> String {
    match rule {
        WinRule::Guarantee { win_rate } => format!("{:.0}% + guarantee", win_rate * 100.0),
        WinRule::Radiance {
            win_rate,
            streak_max,
        } => format!("{:.0}% + radiance at {streak_max}", win_rate * 100.0),
        WinRule::FatePath { win_rate, fate_max } => {
            format!("{:.1}% + fate at {fate_max}", win_rate * 100.0)
        }
    }
}

fn describe(variant: Variant) -> Value {
    let curve = variant.curve();
    json!({
        "key": variant.key(),
        "game": variant.game(),
        "pool": variant.pool(),
        "curve": curve,
        "winRule": variant.win_rule(),
        "chain": variant.chain_id(),
        "states": AbsorbingChain::new(variant.chain_id()).state_count(),
        "defaultRuns": variant.default_simulation_count(),
    })
}
