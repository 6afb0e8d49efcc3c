//! Weekend trip example.
//!
//! Four friends log shared costs over a weekend, some split equally and one
//! split by hand, then work out who pays whom.

use chrono::NaiveDate;
use rust_decimal_macros::dec;
use split_engine::balance::validation::validate_manual_expense;
use split_engine::core::money::{SplitConfig, EPSILON};
use split_engine::group::store::InMemoryGroupStore;
use split_engine::group::summary::GroupSummary;
use split_engine::prelude::*;

fn main() {
    println!("╔══════════════════════════════════════════╗");
    println!("║  split-engine: Weekend Trip Example      ║");
    println!("╚══════════════════════════════════════════╝\n");

    let trip = GroupId::new("lake-weekend");
    let ana = MemberId::new("ana");
    let ben = MemberId::new("ben");
    let cai = MemberId::new("cai");
    let dee = MemberId::new("dee");

    let members = vec![
        Member::new(ana.clone(), "Ana"),
        Member::new(ben.clone(), "Ben"),
        Member::new(cai.clone(), "Cai"),
        Member::new(dee.clone(), "Dee"),
    ];

    let friday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
    let saturday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    let expenses = vec![
        Expense::equal(trip.clone(), ana.clone(), dec!(420), friday).with_description("Cabin"),
        Expense::equal(trip.clone(), ben.clone(), dec!(86.75), friday).with_description("Groceries"),
        Expense::manual(
            trip.clone(),
            cai.clone(),
            dec!(120),
            saturday,
            // Dee skipped the boat
            [(ana.clone(), dec!(40)), (ben.clone(), dec!(40)), (cai.clone(), dec!(40))],
        )
        .with_description("Boat rental"),
        Expense::equal(trip.clone(), dee.clone(), dec!(64.20), saturday).with_description("Dinner"),
    ];

    // --- Split validation ---
    println!("━━━ Validating manual splits ━━━\n");
    for expense in &expenses {
        let label = expense.description().unwrap_or("expense");
        match validate_manual_expense(expense, EPSILON) {
            Ok(()) => println!("  {:<12} ok ({})", label, expense.policy()),
            Err(e) => println!("  {:<12} REJECTED: {}", label, e),
        }
    }
    println!();

    // --- Full pipeline through the store port ---
    let mut store = InMemoryGroupStore::new();
    store.insert(GroupSnapshot::new(trip.clone(), members, expenses));

    let summary = GroupSummary::compute(&store, &trip, SplitConfig::default()).unwrap();
    println!("{}", summary);

    // --- Who is involved in what ---
    println!("━━━ Per-member payments ━━━\n");
    for member in [&ana, &ben, &cai, &dee] {
        let lines: Vec<String> = summary
            .plan()
            .settlements_for(member)
            .map(|s| {
                if &s.from == member {
                    format!("pays {} {}", s.to, s.amount)
                } else {
                    format!("receives {} from {}", s.amount, s.from)
                }
            })
            .collect();
        if lines.is_empty() {
            println!("  {:<5} nothing to do", member);
        } else {
            println!("  {:<5} {}", member, lines.join(", "));
        }
    }
}
