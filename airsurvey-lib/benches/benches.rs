use rand::Rng;

use airsurvey::header::split_record;
use airsurvey::spectrometer::Frame;
use airsurvey::{process_reader, Discard, Synchronizer};
use criterion::{criterion_group, criterion_main, Criterion, Throughput};

fn random_frame() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut frame = Frame::default();
    for count in frame.down.spectrum.iter_mut() {
        *count = rng.gen();
    }
    for count in frame.up.spectrum.iter_mut() {
        *count = rng.gen();
    }
    frame.encode()
}

fn bench_frame_decode(c: &mut Criterion) {
    let dat = random_frame();

    let mut group = c.benchmark_group("frame");
    group.throughput(Throughput::Bytes(dat.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| {
            let frame = Frame::decode(&dat).unwrap();
            assert_eq!(frame.down.spectrum.len(), 1024);
        });
    });
    group.finish();
}

fn bench_split_record(c: &mut Criterion) {
    let line = "$GPS,1234567.0,$GPGGA,134259.30,2350.4087,N,07344.9629,E,1,05,4.1,312.48,M,-53.10,M,,*4E\r\n";

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("split_record", |b| {
        b.iter(|| {
            let _ = split_record(line);
        });
    });
    group.finish();
}

// One second of every channel, for 100 seconds.
fn bench_stream(c: &mut Criterion) {
    let frame = random_frame();
    let mut dat = Vec::new();
    for sec in 0..100u64 {
        let ms = sec * 1000;
        dat.extend_from_slice(
            format!(
                "$GPS,{ms},$GPGGA,134259.30,2350.4087,N,07344.9629,E,1,05,4.1,312.48,M,-53.10,M,,*4E\n\
                 $NAV,{},$RDALT,152.3,\n$TRM,{},21.5,\n$HUM,{},55.0,\n$BAR,{},1013.2,\n$RSX,{},\n",
                ms + 10,
                ms + 20,
                ms + 30,
                ms + 40,
                ms + 50,
            )
            .as_bytes(),
        );
        dat.extend_from_slice(&frame);
    }

    let mut group = c.benchmark_group("stream");
    group.throughput(Throughput::Bytes(dat.len() as u64));
    group.bench_function("process_reader", |b| {
        b.iter(|| {
            let mut sync = Synchronizer::new();
            let summary = process_reader(&dat[..], &mut sync, &mut Discard).unwrap();
            assert_eq!(summary.flushes, 99);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_frame_decode, bench_split_record, bench_stream);
criterion_main!(benches);
