use criterion::{black_box, criterion_group, criterion_main, Criterion};
use split_engine::balance::calculator::BalanceCalculator;
use split_engine::settlement::minimizer::SettlementMinimizer;
use split_engine::simulation::random_group::{generate_random_group, GroupConfig};

fn bench_balances_10_members(c: &mut Criterion) {
    let config = GroupConfig {
        member_count: 10,
        expense_count: 200,
        ..Default::default()
    };
    let group = generate_random_group(&config);
    let calculator = BalanceCalculator::default();

    c.bench_function("balances_10_members", |b| {
        b.iter(|| calculator.compute_balances(black_box(&group.members), black_box(&group.expenses)))
    });
}

fn bench_settle_group(c: &mut Criterion, members: usize, expenses: usize) {
    let config = GroupConfig {
        member_count: members,
        expense_count: expenses,
        ..Default::default()
    };
    let group = generate_random_group(&config);
    let balances = BalanceCalculator::default()
        .compute_balances(&group.members, &group.expenses)
        .expect("generated groups are consistent");
    let minimizer = SettlementMinimizer::default();

    c.bench_function(&format!("settle_{}_members", members), |b| {
        b.iter(|| minimizer.minimize(black_box(&balances)))
    });
}

fn bench_settle_10_members(c: &mut Criterion) {
    bench_settle_group(c, 10, 100);
}

fn bench_settle_100_members(c: &mut Criterion) {
    bench_settle_group(c, 100, 1_000);
}

fn bench_settle_1000_members(c: &mut Criterion) {
    bench_settle_group(c, 1_000, 5_000);
}

criterion_group!(
    benches,
    bench_balances_10_members,
    bench_settle_10_members,
    bench_settle_100_members,
    bench_settle_1000_members
);
criterion_main!(benches);
