use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use zune_core::bit_depth::BitDepth;
use zune_core::bytestream::ZCursor;
use zune_core::colorspace::ColorSpace;
use zune_core::options::EncoderOptions;

const WIDTH: u16 = 1024;
const HEIGHT: u16 = 1024;

fn uncompressed_image() -> Vec<u8>
{
    let (width, height) = (usize::from(WIDTH), usize::from(HEIGHT));
    let pixels: Vec<u8> = (0..width * height * 4).map(|x| (x % 251) as u8).collect();

    let options = EncoderOptions::new(width, height, ColorSpace::RGBA, BitDepth::Eight);
    let mut output = Vec::new();
    zune_tga::TgaEncoder::new(&pixels, options)
        .encode(&mut output)
        .unwrap();
    output
}

/// Runs of 128 pixels, 24 bits per pixel
fn rle_image() -> Vec<u8>
{
    let mut data = vec![0; 18];
    data[2] = 10;
    data[12..14].copy_from_slice(&WIDTH.to_le_bytes());
    data[14..16].copy_from_slice(&HEIGHT.to_le_bytes());
    data[16] = 24;

    for i in 0..(usize::from(WIDTH) * usize::from(HEIGHT)) / 128 {
        data.extend_from_slice(&[0xFF, i as u8, 0x7F, 0x20]);
    }
    data
}

fn decode_zune_tga(data: &[u8]) -> Vec<u8>
{
    zune_tga::TgaDecoder::new(ZCursor::new(data))
        .decode()
        .unwrap()
}

fn bench_decode(c: &mut Criterion)
{
    let uncompressed = uncompressed_image();
    let rle = rle_image();

    let mut group = c.benchmark_group("tga: Simple decode");

    group.throughput(Throughput::Bytes(uncompressed.len() as u64));
    group.bench_function("zune-tga uncompressed", |b| {
        b.iter(|| black_box(decode_zune_tga(uncompressed.as_slice())))
    });

    group.throughput(Throughput::Bytes(rle.len() as u64));
    group.bench_function("zune-tga rle", |b| {
        b.iter(|| black_box(decode_zune_tga(rle.as_slice())))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(20))
      };
    targets=bench_decode);

criterion_main!(benches);
