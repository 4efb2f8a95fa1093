use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::runtime::Runtime;

use fraudr::aml::{AmlMonitor, Watchlist};
use fraudr::domain::context::{Direction, RecentTx};
use fraudr::domain::transaction::{Currency, DeviceId, GeoPoint, TransactionId};
use fraudr::domain::{AmlParams, RiskPolicy, ScoreWeights, Transaction, UserContext};
use fraudr::engine::{decide, Evaluator};
use fraudr::rules::{FraudRule, RuleSet, UnusualAmountRule};
use fraudr::scoring::{composite_score, SubScores};

fn create_test_tx(amount: i64) -> Transaction {
    Transaction {
        id: TransactionId::new(),
        amount: Decimal::new(amount, 0),
        currency: Currency::new("USD"),
        occurred_at: chrono::Utc::now(),
        location: Some(GeoPoint::new(40.4168, -3.7038)),
        device_id: DeviceId::new("dev-1"),
        user_agent: "Mozilla/5.0".to_string(),
        merchant: None,
    }
}

fn create_test_context() -> UserContext {
    let now = chrono::Utc::now();
    let mut ctx = UserContext::empty("user1");
    ctx.avg_amount = Decimal::new(1000, 0);
    ctx.trusted_devices.push(DeviceId::new("dev-1"));
    ctx.last_known_location = Some(GeoPoint::new(40.4168, -3.7038));
    ctx.last_transaction_at = Some(now - chrono::Duration::hours(3));
    ctx.recent_txs = (0..20)
        .map(|i| {
            RecentTx::new(
                now - chrono::Duration::minutes(30 * i),
                Decimal::new(800 + 10 * i, 0),
                Direction::Outbound,
            )
        })
        .collect();
    ctx
}

fn bench_unusual_amount_rule(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let rule = UnusualAmountRule::new(Decimal::new(3, 0));

    let tx = create_test_tx(1200);
    let ctx = create_test_context();

    c.bench_function("unusual_amount_rule_miss", |b| {
        b.to_async(&rt)
            .iter(|| rule.evaluate(black_box(&tx), black_box(&ctx)))
    });
}

fn bench_full_rule_pass(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let ruleset = RuleSet::from_policy(
        RiskPolicy::with_defaults("bench"),
        Arc::new(Watchlist::empty()),
    );

    let tx = create_test_tx(1200);
    let ctx = create_test_context();

    c.bench_function("full_rule_pass_clean", |b| {
        b.to_async(&rt)
            .iter(|| Evaluator::evaluate(black_box(&ruleset.rules), black_box(&tx), black_box(&ctx)))
    });

    let hot_tx = create_test_tx(15000);
    c.bench_function("full_rule_pass_violations", |b| {
        b.to_async(&rt)
            .iter(|| Evaluator::evaluate(black_box(&ruleset.rules), black_box(&hot_tx), black_box(&ctx)))
    });
}

fn bench_aml_monitor(c: &mut Criterion) {
    let monitor = AmlMonitor::new(AmlParams::default(), Arc::new(Watchlist::empty()));

    let tx = create_test_tx(9600);
    let ctx = create_test_context();

    c.bench_function("aml_monitor_pass", |b| {
        b.iter(|| monitor.monitor(black_box(&tx), black_box(&ctx)))
    });
}

fn bench_watchlist_contains(c: &mut Criterion) {
    let names: Vec<String> = (0..10_000).map(|i| format!("Person Number{i}")).collect();
    let watchlist = Watchlist::from_names(names.iter().map(String::as_str));

    c.bench_function("watchlist_contains_miss", |b| {
        b.iter(|| watchlist.contains(black_box("John Innocent")))
    });

    c.bench_function("watchlist_contains_hit", |b| {
        b.iter(|| watchlist.contains(black_box("Person Number5000")))
    });
}

fn bench_scoring_and_decision(c: &mut Criterion) {
    let policy = RiskPolicy::with_defaults("bench");
    let sub = SubScores {
        behavioral: 0.8,
        transactional: 0.4,
        technical: 0.3,
        geographic: 0.9,
    };

    c.bench_function("score_and_decide", |b| {
        b.iter(|| {
            let score = composite_score(black_box(&sub), &ScoreWeights::default());
            decide(black_box(score), &[], &policy)
        })
    });
}

criterion_group!(
    benches,
    bench_unusual_amount_rule,
    bench_full_rule_pass,
    bench_aml_monitor,
    bench_watchlist_contains,
    bench_scoring_and_decision,
);

criterion_main!(benches);
