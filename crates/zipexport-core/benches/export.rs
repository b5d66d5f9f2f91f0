//! Benchmarks for export performance.
//!
//! Measures export throughput across compression levels, file counts and
//! directory depth, plus the cost of exclusion matching and pruning.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::uninlined_format_args,
    clippy::items_after_statements
)]

use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use std::fs;
use std::hint::black_box;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;
use zipexport_core::ExclusionFilter;
use zipexport_core::ExportConfig;
use zipexport_core::Exporter;
use zipexport_core::walker::FilteredWalker;

/// Creates `data/` with `file_count` files of 1 KB each.
fn create_test_directory(temp: &TempDir, file_count: usize) -> PathBuf {
    let dir = temp.path().join("data");
    fs::create_dir_all(&dir).unwrap();

    let content = "x".repeat(1024);
    for i in 0..file_count {
        fs::write(dir.join(format!("file_{:05}.txt", i)), &content).unwrap();
    }

    dir
}

/// Creates a nested tree with `files_per_level` files at every level.
fn create_nested_directory(temp: &TempDir, depth: usize, files_per_level: usize) -> PathBuf {
    let root = temp.path().join("src");
    fs::create_dir_all(&root).unwrap();

    fn create_level(base: &Path, current_depth: usize, max_depth: usize, files: usize) {
        if current_depth >= max_depth {
            return;
        }

        for i in 0..files {
            fs::write(base.join(format!("module_{}.js", i)), "export default 1;\n").unwrap();
        }

        let subdir = base.join(format!("level_{}", current_depth + 1));
        fs::create_dir_all(&subdir).unwrap();
        create_level(&subdir, current_depth + 1, max_depth, files);
    }

    create_level(&root, 0, depth, files_per_level);
    root
}

/// Creates a tree where most bytes sit under excluded directories.
fn create_dependency_heavy_directory(temp: &TempDir) -> PathBuf {
    let root = temp.path().join("src");
    fs::create_dir_all(&root).unwrap();

    for i in 0..50 {
        fs::write(root.join(format!("app_{}.js", i)), "app").unwrap();
        fs::write(root.join(format!("debug_{}.log", i)), "log line").unwrap();
    }

    for pkg in 0..20 {
        let dir = root.join(format!("node_modules/pkg_{}/lib", pkg));
        fs::create_dir_all(&dir).unwrap();
        for i in 0..25 {
            fs::write(dir.join(format!("index_{}.js", i)), "module").unwrap();
        }
    }

    root
}

fn export_once(base: &Path, config: &ExportConfig) {
    let report = Exporter::new(config.clone())
        .unwrap()
        .with_base_dir(base)
        .run()
        .unwrap();
    black_box(report);
}

fn benchmark_compression_levels(c: &mut Criterion) {
    let mut group = c.benchmark_group("compression_levels");
    let temp = TempDir::new().unwrap();
    create_test_directory(&temp, 100);

    for level in [1, 6, 9] {
        group.bench_with_input(BenchmarkId::new("deflate_level", level), &level, |b, level| {
            let config = ExportConfig::default()
                .with_include(vec![PathBuf::from("data")])
                .with_compression_level(*level);
            b.iter(|| export_once(temp.path(), &config));
        });
    }

    group.finish();
}

fn benchmark_file_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_counts");

    for count in [10, 100, 1000] {
        let temp = TempDir::new().unwrap();
        create_test_directory(&temp, count);
        let config = ExportConfig::default().with_include(vec![PathBuf::from("data")]);

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| export_once(temp.path(), &config));
        });
    }

    group.finish();
}

fn benchmark_nested_directories(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_directories");

    for depth in [5, 20] {
        let temp = TempDir::new().unwrap();
        create_nested_directory(&temp, depth, 5);
        let config = ExportConfig::default().with_include(vec![PathBuf::from("src")]);

        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, _| {
            b.iter(|| export_once(temp.path(), &config));
        });
    }

    group.finish();
}

fn benchmark_exclusion_matching(c: &mut Criterion) {
    let filter = ExclusionFilter::new(ExportConfig::default().exclude);
    let paths = [
        Path::new("src/core/logger.js"),
        Path::new("src/node_modules/pkg/index.js"),
        Path::new("dashboard/access.log"),
        Path::new("test/test-results/junit.xml"),
        Path::new("data/nested/deeper/deepest/leaf.json"),
    ];

    c.bench_function("exclusion_default_patterns", |b| {
        b.iter(|| {
            for path in &paths {
                black_box(filter.is_excluded(black_box(path)));
            }
        });
    });
}

fn benchmark_pruned_walk(c: &mut Criterion) {
    let temp = TempDir::new().unwrap();
    let root = create_dependency_heavy_directory(&temp);
    let filter = ExclusionFilter::new(ExportConfig::default().exclude);

    c.bench_function("walk_prunes_node_modules", |b| {
        b.iter(|| {
            let walker = FilteredWalker::new(&root, &filter, false).with_base(temp.path());
            let count = walker.walk().filter(Result::is_ok).count();
            black_box(count);
        });
    });
}

criterion_group!(
    benches,
    benchmark_compression_levels,
    benchmark_file_counts,
    benchmark_nested_directories,
    benchmark_exclusion_matching,
    benchmark_pruned_walk,
);
criterion_main!(benches);
