use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_core::Rect;
use tessera_platform::compositor::{overlapping_areas, z_order};
use tessera_platform::WindowManager;

fn cascade(count: i32) -> Vec<(String, Rect)> {
    (0..count)
        .map(|i| (format!("w{}", i), Rect::new(i * 37 % 900, i * 23 % 600, 400, 300)))
        .collect()
}

fn bench_overlapping_areas(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlapping_areas");
    for count in [4, 16, 64] {
        let windows = cascade(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &windows, |b, windows| {
            b.iter(|| {
                for (name, bounds) in windows {
                    let others = windows
                        .iter()
                        .filter(|(other, _)| other != name)
                        .map(|(_, r)| *r);
                    black_box(overlapping_areas(*bounds, others));
                }
            })
        });
    }
    group.finish();
}

fn bench_z_order(c: &mut Criterion) {
    let windows = cascade(64);
    c.bench_function("z_order_64", |b| {
        b.iter(|| black_box(z_order(windows.iter().map(|(n, r)| (n.as_str(), *r)))))
    });
}

fn bench_render_frame(c: &mut Criterion) {
    let (mut wm, _) = WindowManager::headless();
    for (name, bounds) in cascade(16) {
        wm.create_window(&name, &name, bounds.x, bounds.y, bounds.width, bounds.height)
            .unwrap();
    }
    wm.show_all_windows();
    c.bench_function("render_all_windows_16", |b| {
        b.iter(|| black_box(wm.render_all_windows()))
    });
}

criterion_group!(benches, bench_overlapping_areas, bench_z_order, bench_render_frame);
criterion_main!(benches);
