use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transit_map::interline::{build_interline_segments, diff_interline_segments};
use transit_map::models::{default_levels, Line, Station, System};
use transit_map::track_stats::compute_track_statistics;

fn add_line(system: &mut System, id: String, color: String, stations: Vec<String>) {
    system.lines.insert(id.clone(), Line::new(id.clone(), id, color).with_stations(stations));
}

/// Grid of stations with every row and column served by a line, and every
/// third row doubled by an express line sharing the track
fn grid_system(size: usize) -> System {
    let mut system = System::empty();

    for row in 0..size {
        for col in 0..size {
            let id = format!("{row}-{col}");
            #[allow(clippy::cast_precision_loss)]
            let station = Station::new(id.as_str(), row as f64 * 0.01, col as f64 * 0.01, id.as_str());
            system.stations.insert(id, station);
        }
    }

    for row in 0..size {
        let stations: Vec<String> = (0..size).map(|col| format!("{row}-{col}")).collect();
        add_line(&mut system, format!("row-{row}"), format!("#{:06x}", row * 97), stations.clone());
        if row % 3 == 0 {
            add_line(&mut system, format!("express-{row}"), format!("#{:06x}", row * 97 + 1), stations);
        }
    }
    for col in 0..size {
        let stations: Vec<String> = (0..size).map(|row| format!("{row}-{col}")).collect();
        add_line(&mut system, format!("col-{col}"), format!("#{:06x}", 0x80_0000 + col * 89), stations);
    }

    system
}

fn benchmark_interline_segments(c: &mut Criterion) {
    let system = grid_system(30);
    let order = system.line_order();
    let levels = default_levels();

    c.bench_function("build_interline_segments", |b| {
        b.iter(|| build_interline_segments(black_box(&system), black_box(&order)));
    });

    // A single station moved: what happens after a typical edit
    let before = build_interline_segments(&system, &order);
    let mut edited = system.clone();
    if let Some(station) = edited.stations.get_mut("0-0") {
        station.lat += 0.005;
    }
    let after = build_interline_segments(&edited, &order);

    c.bench_function("diff_interline_segments", |b| {
        b.iter(|| diff_interline_segments(black_box(&before), black_box(&after)));
    });

    c.bench_function("rebuild_and_diff", |b| {
        b.iter(|| {
            let next = build_interline_segments(black_box(&edited), black_box(&order));
            diff_interline_segments(black_box(&before), &next)
        });
    });

    c.bench_function("compute_track_statistics", |b| {
        b.iter(|| compute_track_statistics(black_box(&system.lines), black_box(&system.stations), &levels));
    });
}

criterion_group!(benches, benchmark_interline_segments);
criterion_main!(benches);
