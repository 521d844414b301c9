use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rail_spacetime::constants::TIME_SCALE;
use rail_spacetime::geometry::{build_infrastructure, build_infrastructure_by_kind, build_timetable};
use rail_spacetime::models::{
    Infrastructure, Node, Operation, Point, Resource, ResourceKind, Timetable, Train,
};

const STATIONS: usize = 400;
const TRAINS: usize = 200;

/// A straight line of alternating open track and stations, each track
/// resource bent through a few waypoints
fn synthetic_line() -> Infrastructure {
    let mut infrastructure = Infrastructure::default();
    for i in 0..=2 * STATIONS {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64;
        infrastructure.nodes.push(Node { location: Point::new(x, 0.0) });
    }
    for i in 0..2 * STATIONS {
        #[allow(clippy::cast_precision_loss)]
        let x = i as f64;
        let resource = if i % 2 == 0 {
            Resource::new(i, i + 1, ResourceKind::SingleTrack).with_segments(vec![
                Point::new(x + 0.25, 0.1),
                Point::new(x + 0.5, 0.15),
                Point::new(x + 0.75, 0.1),
            ])
        } else {
            Resource::new(i, i + 1, ResourceKind::Station)
        };
        infrastructure.resources.push(resource);
    }
    infrastructure
}

fn synthetic_timetable(infrastructure: &Infrastructure) -> Timetable {
    let resources = infrastructure.resources.len();
    let trains = (0..TRAINS)
        .map(|t| {
            let forward = t % 2 == 0;
            #[allow(clippy::cast_precision_loss)]
            let mut time = t as f64 * 600.0;
            let order: Box<dyn Iterator<Item = usize>> = if forward {
                Box::new(0..resources)
            } else {
                Box::new((0..resources).rev())
            };
            let operations = order
                .map(|resource| {
                    let op = Operation { resource, forward, time, min_duration: 60.0 };
                    time += 62.4;
                    op
                })
                .collect();
            Train { operations }
        })
        .collect();
    Timetable { trains }
}

fn benchmark_geometry_build(c: &mut Criterion) {
    let infrastructure = synthetic_line();
    let timetable = synthetic_timetable(&infrastructure);

    c.bench_function("infrastructure_single", |b| {
        b.iter(|| build_infrastructure::<u16>(black_box(&infrastructure)));
    });

    c.bench_function("infrastructure_by_kind", |b| {
        b.iter(|| build_infrastructure_by_kind::<u16>(black_box(&infrastructure)));
    });

    // 200 trains over 800 resources needs more than 65535 vertices
    c.bench_function("timetable_u32", |b| {
        b.iter(|| {
            build_timetable::<u32>(black_box(&infrastructure), black_box(&timetable), TIME_SCALE)
        });
    });
}

criterion_group!(benches, benchmark_geometry_build);
criterion_main!(benches);
