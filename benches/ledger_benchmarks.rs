//! Performance benchmarks for the payroll ledger.
//!
//! Covers the read paths that scan the whole record set:
//! - Dashboard aggregation (unpaid balances and last payouts)
//! - Filtered history
//! - CSV export
//! - The `/summary` endpoint end to end
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use uuid::Uuid;

use payroll_ledger::api::{AppState, create_router};
use payroll_ledger::ledger::{HoursInput, Ledger, WorkEntry};
use payroll_ledger::models::{Employee, Settings, WorkRecord};
use payroll_ledger::reporting::{
    HistoryFilter, history, last_payouts, to_csv_bytes, unpaid_balances,
};
use payroll_ledger::store::Backend;

use axum::{body::Body, http::Request};
use tower::ServiceExt;

/// Builds `employee_count` employees with `records_per_employee` records
/// each; every other record is paid, in batches of four.
fn create_dataset(
    employee_count: usize,
    records_per_employee: usize,
) -> (Vec<Employee>, Vec<WorkRecord>) {
    let base_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let base_time = Utc.with_ymd_and_hms(2024, 1, 1, 18, 0, 0).unwrap();

    let employees: Vec<Employee> = (0..employee_count)
        .map(|i| Employee {
            id: Uuid::new_v4(),
            name: format!("Employee {}", i),
            hourly_rate: None,
        })
        .collect();

    let records = employees
        .iter()
        .flat_map(|employee| {
            (0..records_per_employee).map(move |day| {
                let paid = day % 2 == 0;
                WorkRecord {
                    id: Uuid::new_v4(),
                    employee_id: employee.id,
                    date: base_date + Duration::days(day as i64),
                    hours: Decimal::new(75, 1),
                    strings: Decimal::from(day as i64 % 30),
                    salary: Decimal::new(15750, 2),
                    paid,
                    paid_at: paid.then(|| base_time + Duration::days((day / 4) as i64)),
                    created_at: base_time,
                }
            })
        })
        .collect();

    (employees, records)
}

/// Benchmark: dashboard aggregation over growing record sets.
fn bench_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for employee_count in [10, 50, 200].iter() {
        let (employees, records) = create_dataset(*employee_count, 60);
        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("dashboard", employee_count),
            employee_count,
            |b, _| {
                b.iter(|| {
                    black_box(unpaid_balances(&employees, &records));
                    black_box(last_payouts(&employees, &records));
                })
            },
        );
    }

    group.finish();
}

/// Benchmark: history filtered by employee and date range.
fn bench_history(c: &mut Criterion) {
    let (employees, records) = create_dataset(100, 60);
    let filter = HistoryFilter {
        employee_id: Some(employees[42].id),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
        end_date: NaiveDate::from_ymd_opt(2024, 2, 15),
    };

    c.bench_function("history_filtered", |b| {
        b.iter(|| black_box(history(&records, &filter)))
    });
}

/// Benchmark: CSV export of 6,000 records.
fn bench_export(c: &mut Criterion) {
    let (employees, records) = create_dataset(100, 60);

    let mut group = c.benchmark_group("export");
    group.throughput(Throughput::Elements(records.len() as u64));
    group.bench_function("csv_6000_records", |b| {
        b.iter(|| black_box(to_csv_bytes(&records, &employees).unwrap()))
    });
    group.finish();
}

/// Benchmark: `/summary` request over an in-memory ledger.
fn bench_summary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = rt.block_on(async {
        let mut ledger = Ledger::load(Backend::memory(Settings::default()))
            .await
            .unwrap();
        for i in 0..20 {
            let employee = ledger
                .add_employee(&format!("Employee {}", i), None)
                .await
                .unwrap();
            for day in 1..=28 {
                ledger
                    .record_work(WorkEntry {
                        employee_id: employee.id,
                        date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
                        hours: Some(HoursInput::Explicit(Decimal::from(8))),
                        strings: Decimal::ZERO,
                    })
                    .await
                    .unwrap();
            }
            if i % 2 == 0 {
                ledger.settle(employee.id, Utc::now()).await.unwrap();
            }
        }
        create_router(AppState::new(ledger))
    });

    c.bench_function("summary_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(Request::builder().uri("/summary").body(Body::empty()).unwrap())
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_aggregation,
    bench_history,
    bench_export,
    bench_summary_endpoint,
);
criterion_main!(benches);
