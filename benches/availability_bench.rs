// Benchmark for the availability resolver
// Measures the first-available-table scan over a busy evening

use chrono::{NaiveDate, NaiveTime};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use table_plan::models::booking::Booking;
use table_plan::models::table::DiningTable;
use table_plan::services::availability::find_first_available_table;

fn make_tables(count: usize) -> Vec<DiningTable> {
    (1..=count)
        .map(|i| DiningTable {
            id: i as i64,
            number: i.to_string(),
            min_capacity: 1,
            max_capacity: 8,
            section: None,
            is_active: true,
        })
        .collect()
}

fn make_bookings(tables: &[DiningTable], per_table: usize) -> Vec<Booking> {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let mut bookings = Vec::new();
    let mut id = 0;
    for table in tables {
        for seating in 0..per_table {
            id += 1;
            let hour = 17 + (seating as u32 * 2) % 6;
            bookings.push(
                Booking::builder()
                    .id(id)
                    .guest_name("Bench Guest")
                    .party_size(2)
                    .table_number(&table.number)
                    .date(date)
                    .time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
                    .duration_minutes(90)
                    .build()
                    .expect("valid bench booking"),
            );
        }
    }
    bookings
}

fn bench_first_available(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let time = NaiveTime::from_hms_opt(18, 0, 0).unwrap();

    let mut group = c.benchmark_group("find_first_available_table");
    for table_count in [10usize, 40, 120] {
        let tables = make_tables(table_count);
        let bookings = make_bookings(&tables, 3);
        group.bench_with_input(
            BenchmarkId::from_parameter(table_count),
            &table_count,
            |b, _| {
                b.iter(|| {
                    find_first_available_table(
                        black_box(date),
                        black_box(time),
                        black_box(90),
                        black_box(4),
                        &tables,
                        &bookings,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_first_available);
criterion_main!(benches);
