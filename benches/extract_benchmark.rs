//! Benchmarks for hostsplit extraction throughput.
//!
//! Run with: cargo bench
//!
//! This benchmark suite measures:
//! - Full URL extraction throughput
//! - Trie matching alone
//! - Trie construction from suffix list text

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hostsplit::{extract_with_trie, scheme_end_index, ExtractOptions, SuffixLists, SuffixTrie};

/// Generate a synthetic suffix list with plain, wildcard and exception rules.
fn generate_list(tld_count: usize) -> String {
    let mut text = String::from("// ===BEGIN ICANN DOMAINS===\n");
    for i in 0..tld_count {
        text.push_str(&format!("tld{i}\nco.tld{i}\n*.wild.tld{i}\n!www.wild.tld{i}\n"));
    }
    text.push_str("// ===END ICANN DOMAINS===\n// ===BEGIN PRIVATE DOMAINS===\n");
    for i in 0..tld_count / 10 {
        text.push_str(&format!("hosted{i}.co.tld{i}\n"));
    }
    text.push_str("// ===END PRIVATE DOMAINS===\n");
    text
}

/// Generate URLs covering each rule shape and some misses.
fn generate_urls(count: usize, tld_count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let t = i % tld_count;
            match i % 5 {
                0 => format!("https://www.example{i}.co.tld{t}/path?q=1"),
                1 => format!("http://user@a.b.example{i}.wild.tld{t}:8080/"),
                2 => format!("www.wild.tld{t}"),
                3 => format!("10.0.{}.{}", i % 250, t % 250),
                _ => format!("//unknown{i}.nowhere"),
            }
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let lists = SuffixLists::parse(&generate_list(1_000));
    let trie = SuffixTrie::from_lists(&lists, true);
    let urls = generate_urls(1_000, 1_000);
    let opts = ExtractOptions::default();

    let mut group = c.benchmark_group("extract");
    group.throughput(Throughput::Elements(urls.len() as u64));

    group.bench_function("mixed_urls", |b| {
        b.iter(|| {
            for url in &urls {
                black_box(extract_with_trie(&trie, url, &opts));
            }
        })
    });

    let punycode = opts.to_punycode(true);
    group.bench_function("mixed_urls_punycode", |b| {
        b.iter(|| {
            for url in &urls {
                black_box(extract_with_trie(&trie, url, &punycode));
            }
        })
    });

    group.finish();
}

fn bench_trie_match(c: &mut Criterion) {
    let trie = SuffixTrie::from_lists(&SuffixLists::parse(&generate_list(1_000)), true);
    let hosts: Vec<String> = (0..1_000)
        .map(|i| format!("a.b.example{}.wild.tld{}", i, i % 1_000))
        .collect();

    let mut group = c.benchmark_group("trie_match");
    group.throughput(Throughput::Elements(hosts.len() as u64));
    group.bench_function("public_suffix", |b| {
        b.iter(|| {
            for host in &hosts {
                black_box(trie.public_suffix(host));
            }
        })
    });
    group.finish();
}

fn bench_scheme(c: &mut Criterion) {
    let inputs = ["https://example.com", "example.com", "//cdn.example.com", "git+ssh://h"];
    c.bench_function("scheme_end_index", |b| {
        b.iter(|| {
            for input in &inputs {
                black_box(scheme_end_index(input));
            }
        })
    });
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("trie_build");

    for size in [100, 1_000, 10_000].iter() {
        let text = generate_list(*size);
        group.throughput(Throughput::Elements((*size * 4) as u64));
        group.bench_with_input(BenchmarkId::new("rules", size), &text, |b, text| {
            b.iter(|| {
                let lists = SuffixLists::parse(text);
                black_box(SuffixTrie::from_lists(&lists, true))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_trie_match, bench_scheme, bench_build);
criterion_main!(benches);
