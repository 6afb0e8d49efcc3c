//! split-engine CLI
//!
//! Compute group balances and settlement plans from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Per-member balances for a group file
//! split-engine balances --input group.json
//!
//! # Balances plus who pays whom, as JSON
//! split-engine settle --input group.json --format json
//!
//! # Check manual splits against a total
//! split-engine check-splits --total 100 --splits 40,40
//!
//! # Generate a random group for testing
//! split-engine generate --members 6 --expenses 30
//! ```

use log::{error, info};
use rust_decimal::Decimal;
use split_engine::balance::validation::splits_match_total_within;
use split_engine::core::money::SplitConfig;
use split_engine::group::store::{GroupStore, InMemoryGroupStore};
use split_engine::group::summary::GroupSummary;
use split_engine::simulation::random_group::{generate_random_group, GroupConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-engine: group expense balances and settlement plans

USAGE:
    split-engine <COMMAND> [OPTIONS]

COMMANDS:
    balances      Show each member's net balance
    settle        Show balances and the payments that settle them
    check-splits  Check that manual split amounts add up to a total
    generate      Generate a random group (for testing)
    help          Show this message

OPTIONS (balances, settle):
    --input <FILE>      Path to JSON group file
    --format <FORMAT>   Output format: text (default) or json
    --epsilon <DEC>     Zero tolerance (default: 0.01)
    --decimals <N>      Decimal places for reported amounts (default: 2)

OPTIONS (check-splits):
    --total <DEC>       Expense total
    --splits <LIST>     Comma-separated split amounts

OPTIONS (generate):
    --members <N>       Number of members (default: 5)
    --expenses <N>      Number of expenses (default: 20)
    --manual-ratio <R>  Fraction of manually split expenses (default: 0.25)
    --output <FILE>     Write to file instead of stdout

Set RUST_LOG=debug for computation details.

EXAMPLES:
    split-engine settle --input trip.json
    split-engine settle --input trip.json --format json --epsilon 0.05
    split-engine check-splits --total 100 --splits 60,40
    split-engine generate --members 4 --expenses 12 --output trip.json"#
    );
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn next_value(args: &[String], i: &mut usize, flag: &str, what: &str) -> String {
    *i += 1;
    args.get(*i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, what)))
}

fn parse_decimal(raw: &str, flag: &str) -> Decimal {
    raw.trim()
        .parse()
        .unwrap_or_else(|e| fail(format!("invalid {} '{}': {}", flag, raw, e)))
}

struct ReportOptions {
    input: String,
    json: bool,
    config: SplitConfig,
}

fn parse_report_options(args: &[String]) -> ReportOptions {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut config = SplitConfig::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => input_path = Some(next_value(args, &mut i, "--input", "a file path")),
            "--format" => format = next_value(args, &mut i, "--format", "'text' or 'json'"),
            "--epsilon" => {
                let raw = next_value(args, &mut i, "--epsilon", "a decimal");
                config.epsilon = parse_decimal(&raw, "--epsilon");
            }
            "--decimals" => {
                let raw = next_value(args, &mut i, "--decimals", "a number");
                config.minor_units = raw
                    .parse()
                    .unwrap_or_else(|_| fail("--decimals requires a number"));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    if format != "text" && format != "json" {
        fail(format!("unknown format '{}'", format));
    }

    ReportOptions {
        input: input_path.unwrap_or_else(|| fail("--input <FILE> is required")),
        json: format == "json",
        config,
    }
}

fn load_summary(options: &ReportOptions) -> GroupSummary {
    let store = InMemoryGroupStore::from_file(&options.input).unwrap_or_else(|e| {
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "group_id": "trip",
  "members": [{{ "id": "u1", "name": "Ana" }}, {{ "id": "u2", "name": "Ben" }}],
  "expenses": [
    {{ "id": "e1", "group_id": "trip", "amount": "90.00", "paid_by": "u1",
      "date": "2024-03-09", "split_type": "equal" }}
  ]
}}"#
        );
        fail(e)
    });

    let group_id = match store.group_ids().next() {
        Some(id) => id.clone(),
        None => fail("input file contains no group"),
    };

    GroupSummary::compute(&store as &dyn GroupStore, &group_id, options.config).unwrap_or_else(|e| {
        error!("computation failed for group {}: {}", group_id, e);
        fail(e)
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e))
}

fn cmd_balances(args: &[String]) {
    let options = parse_report_options(args);
    let summary = load_summary(&options);

    if options.json {
        println!("{}", to_json(&summary.balances()));
    } else {
        println!("Group {}:", summary.group_id());
        for b in summary.balances() {
            println!("  {:<20} {:>12}", b.name, b.amount);
        }
    }
}

fn cmd_settle(args: &[String]) {
    let options = parse_report_options(args);
    let summary = load_summary(&options);
    info!(
        "group {} settles with {} payments",
        summary.group_id(),
        summary.plan().len()
    );

    if options.json {
        println!("{}", to_json(&summary));
    } else {
        println!("{}", summary);
    }
}

fn cmd_check_splits(args: &[String]) {
    let mut total = None;
    let mut splits: Vec<Decimal> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--total" => {
                let raw = next_value(args, &mut i, "--total", "a decimal");
                total = Some(parse_decimal(&raw, "--total"));
            }
            "--splits" => {
                let raw = next_value(args, &mut i, "--splits", "a comma-separated list");
                splits = raw
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| parse_decimal(s, "--splits"))
                    .collect();
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let total = total.unwrap_or_else(|| fail("--total <DEC> is required"));
    let config = SplitConfig::default();
    let allocated: Decimal = splits.iter().sum();

    if splits_match_total_within(&splits, total, config.epsilon) {
        println!("OK: splits allocate {} of {}", allocated, total);
    } else {
        println!(
            "MISMATCH: splits allocate {} of {} (off by {})",
            allocated,
            total,
            (allocated - total).abs()
        );
        process::exit(1);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--members" => {
                let raw = next_value(args, &mut i, "--members", "a number");
                config.member_count = raw
                    .parse()
                    .unwrap_or_else(|_| fail("--members requires a number"));
            }
            "--expenses" => {
                let raw = next_value(args, &mut i, "--expenses", "a number");
                config.expense_count = raw
                    .parse()
                    .unwrap_or_else(|_| fail("--expenses requires a number"));
            }
            "--manual-ratio" => {
                let raw = next_value(args, &mut i, "--manual-ratio", "a number");
                config.manual_ratio = raw
                    .parse()
                    .unwrap_or_else(|_| fail("--manual-ratio requires a number"));
            }
            "--output" => output_path = Some(next_value(args, &mut i, "--output", "a file path")),
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let group = generate_random_group(&config);
    let json = to_json(&group);

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("writing to '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses across {} members → {}",
            group.expenses.len(),
            group.members.len(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "balances" => cmd_balances(rest),
        "settle" => cmd_settle(rest),
        "check-splits" => cmd_check_splits(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
