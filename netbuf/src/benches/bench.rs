use criterion::criterion_main;


criterion_main!(append::benches, varint::benches);
