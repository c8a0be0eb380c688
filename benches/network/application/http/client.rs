use criterion::{BatchSize, Criterion, Throughput};
use embnet::network::application::http::request::build_get;
use embnet::network::application::http::response::{Head, parse_head};
use embnet::network::buffer::NetBuffer;
use std::hint::black_box;

const RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\n\
Server: nginx\r\n\
Date: Thu, 01 Jan 2026 00:00:00 GMT\r\n\
Content-Type: application/octet-stream\r\n\
Content-Length: 262144\r\n\
Connection: keep-alive\r\n\
ETag: \"5f3c-1a2b\"\r\n\
\r\n\
firmware image bytes follow";

pub fn bench_parse_head(c: &mut Criterion) {
    let mut group = c.benchmark_group("http_parse_head");
    group.throughput(Throughput::Bytes(RESPONSE.len() as u64));
    group.bench_function("complete", |b| {
        b.iter_batched(
            || NetBuffer::from_slice(RESPONSE).unwrap(),
            |mut buf| {
                let head = parse_head(&mut buf).unwrap();
                assert!(matches!(head, Head::Complete(_)));
                black_box(buf.len())
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_parse_head_incomplete(c: &mut Criterion) {
    let split = RESPONSE.len() / 2;
    c.bench_function("http_parse_head_incomplete", |b| {
        b.iter_batched(
            || NetBuffer::from_slice(&RESPONSE[..split]).unwrap(),
            |mut buf| black_box(parse_head(&mut buf).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

pub fn bench_build_get(c: &mut Criterion) {
    let mut buf = NetBuffer::new();
    c.bench_function("http_build_get", |b| {
        b.iter(|| {
            build_get(
                &mut buf,
                black_box("/firmware/esp32c3/app-1.4.2.bin"),
                black_box("updates.example.com:8080"),
                black_box("embnet"),
            )
            .unwrap();
            black_box(buf.len())
        })
    });
}
