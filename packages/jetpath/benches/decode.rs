//! Decode throughput benchmarks.
//!
//! Measures raw extraction speed over synthetic record streams:
//! - wildcard element streaming from one large array
//! - scalar plucking from deep records
//! - a no-match pass (pure scan overhead)

use std::time::Instant;

use jetpath::StreamDecoder;

fn main() {
    println!("jetpath decode benchmarks\n");

    let records = build_records(50_000);
    bench_element_streaming(&records);
    bench_scalar_plucking(&records);
    bench_no_match_scan(&records);
}

fn build_records(count: usize) -> String {
    let mut out = String::with_capacity(count * 96);
    out.push_str("{\"records\":[");
    for i in 0..count {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "{{\"id\":{i},\"name\":\"record-{i}\",\"score\":{}.5,\"tags\":[\"a\",\"b\"]}}",
            i % 100
        ));
    }
    out.push_str("]}");
    out
}

fn throughput(bytes: usize, elapsed: std::time::Duration) -> f64 {
    bytes as f64 / 1_048_576.0 / elapsed.as_secs_f64()
}

fn bench_element_streaming(input: &str) {
    let mut count = 0usize;
    let start = Instant::now();
    StreamDecoder::new(input.as_bytes())
        .decode_path("$.records[*]", |_, _| {
            count += 1;
            Ok(())
        })
        .expect("benchmark input is well-formed");
    let elapsed = start.elapsed();

    println!("element streaming   $.records[*]");
    println!("   {count} elements in {elapsed:?}");
    println!("   {:.1} MiB/s\n", throughput(input.len(), elapsed));
}

fn bench_scalar_plucking(input: &str) {
    let mut count = 0usize;
    let start = Instant::now();
    StreamDecoder::new(input.as_bytes())
        .decode_path("$.records[*].score", |_, _| {
            count += 1;
            Ok(())
        })
        .expect("benchmark input is well-formed");
    let elapsed = start.elapsed();

    println!("scalar plucking     $.records[*].score");
    println!("   {count} scores in {elapsed:?}");
    println!("   {:.1} MiB/s\n", throughput(input.len(), elapsed));
}

fn bench_no_match_scan(input: &str) {
    let start = Instant::now();
    StreamDecoder::new(input.as_bytes())
        .decode_path("$.absent", |_, _| Ok(()))
        .expect("benchmark input is well-formed");
    let elapsed = start.elapsed();

    println!("no-match scan       $.absent");
    println!("   {:.1} MiB/s\n", throughput(input.len(), elapsed));
}
