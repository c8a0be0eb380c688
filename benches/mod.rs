use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::client::bench_parse_head,
    network::application::http::client::bench_parse_head_incomplete,
    network::application::http::client::bench_build_get
);
criterion_main!(benches);
