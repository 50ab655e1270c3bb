use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use fstab_language_server::parser::{parse_document, parse_line, tokenize_line};

/// Generate fstab content of different patterns for benchmarking
fn generate_fstab_content(lines: usize, pattern: &str) -> String {
    let mut content = String::new();

    match pattern {
        "uuid_entries" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "UUID={:08x}-{:04x}-4c6e-9f0a-{:012x} /srv/{} ext4 defaults,noatime,nodev 0 2\n",
                    i,
                    i % 0xffff,
                    i,
                    i
                ));
            }
        }
        "comment_heavy" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "/dev/sda{} /mnt/{} xfs defaults 0 2 # disk {}, bay {}\n",
                    i % 16,
                    i,
                    i,
                    i % 8
                ));
            }
        }
        "long_options" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "nas:/export/{} /net/{} nfs rw,_netdev,nofail,noatime,x-systemd.automount,uid={},gid={} 0 0\n",
                    i, i, 1000 + i, 1000 + i
                ));
            }
        }
        "mixed" => {
            for i in 0..lines {
                match i % 4 {
                    0 => content.push_str(&format!("# section {}\n", i / 4)),
                    1 => content.push_str(&format!("LABEL=data{} /data{} btrfs defaults 0 2\n", i, i)),
                    2 => content.push_str("swap swap swap sw 0 0\n"),
                    3 => content.push('\n'),
                    _ => unreachable!(),
                }
            }
        }
        _ => {
            for i in 0..lines {
                content.push_str(&format!("/dev/sda{} /mnt/{} ext4 defaults 0 0\n", i, i));
            }
        }
    }

    content
}

/// Benchmark parsing of individual lines of different shapes
fn bench_single_line_parsing(c: &mut Criterion) {
    let test_lines = vec![
        ("uuid", "UUID=3f1c2a9e-8b7d-4c6e-9f0a-1b2c3d4e5f60 / ext4 defaults,noatime 0 1"),
        ("label", "LABEL=scratch /scratch xfs defaults 0 2"),
        ("swap", "swap swap swap sw 0 0"),
        ("escaped_hash", "/dev/sdb1 /mnt/a\\#b ext4 defaults 0 2 # note"),
        ("structural_error", "/dev/sdb1 /mnt ext4"),
        ("comment", "# just a comment"),
    ];

    let mut group = c.benchmark_group("single_line_parsing");

    for (name, line) in test_lines {
        group.bench_with_input(BenchmarkId::new("parse_line", name), &line, |b, line| {
            b.iter(|| black_box(parse_line(1, black_box(line))))
        });
    }

    group.finish();
}

/// Benchmark whole-document parsing for each content pattern
fn bench_file_parsing(c: &mut Criterion) {
    let patterns = vec!["uuid_entries", "comment_heavy", "long_options", "mixed"];

    let mut group = c.benchmark_group("file_parsing");

    for pattern in patterns {
        let content = generate_fstab_content(1_000, pattern);

        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::new("pattern", pattern), &content, |b, content| {
            b.iter(|| black_box(parse_document(black_box(content))))
        });
    }

    group.finish();
}

/// Benchmark parsing throughput as documents grow
fn bench_parsing_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing_throughput");

    for &size in &[10, 100, 1_000, 10_000] {
        let content = generate_fstab_content(size, "mixed");

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("lines", size), &content, |b, content| {
            b.iter(|| black_box(parse_document(black_box(content))))
        });
    }

    group.finish();
}

/// Benchmark the tokenizer alone
fn bench_tokenization(c: &mut Criterion) {
    let test_lines = vec![
        ("simple", "/dev/sda1 /data ext4 defaults 0 2"),
        ("tabs", "LABEL=home\t/home\t\text4\tdefaults\t0\t2"),
        ("comment", "UUID=1234-5678 / ext4 defaults 0 1 # root filesystem"),
    ];

    let mut group = c.benchmark_group("tokenization");

    for (name, line) in test_lines {
        group.bench_with_input(BenchmarkId::new("tokenize", name), &line, |b, line| {
            b.iter(|| black_box(tokenize_line(black_box(line))))
        });
    }

    group.finish();
}

criterion_group!(
    parsing_benches,
    bench_single_line_parsing,
    bench_file_parsing,
    bench_parsing_throughput,
    bench_tokenization
);

criterion_main!(parsing_benches);
