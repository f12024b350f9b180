//! Helpers for building synthetic EXR files straight through the codec.

#![allow(dead_code)]

use std::path::Path;

use exr::prelude::*;
use smallvec::SmallVec;

/// Writes an uncompressed single-part file with the given channels.
///
/// Samples are row-major over the data window starting at `origin`.
pub fn write_raw_channels(
    path: &Path,
    origin: (i32, i32),
    size: (usize, usize),
    channels: Vec<(&str, FlatSamples)>,
) {
    let list: SmallVec<[AnyChannel<FlatSamples>; 4]> = channels
        .into_iter()
        .map(|(name, samples)| AnyChannel::new(name, samples))
        .collect();

    let mut attributes = LayerAttributes::default();
    attributes.layer_position = Vec2(origin.0, origin.1);

    let layer = Layer::new(size, attributes, Encoding::UNCOMPRESSED, AnyChannels::sort(list));
    Image::from_layer(layer)
        .write()
        .to_file(path)
        .expect("write synthetic exr");
}

/// Writes a ZIP1-compressed single-part file split into square tiles.
pub fn write_tiled_channels(
    path: &Path,
    origin: (i32, i32),
    size: (usize, usize),
    tile: usize,
    channels: Vec<(&str, FlatSamples)>,
) {
    let list: SmallVec<[AnyChannel<FlatSamples>; 4]> = channels
        .into_iter()
        .map(|(name, samples)| AnyChannel::new(name, samples))
        .collect();

    let mut attributes = LayerAttributes::default();
    attributes.layer_position = Vec2(origin.0, origin.1);

    let layer = Layer::new(size, attributes, tiled_encoding(tile), AnyChannels::sort(list));
    Image::from_layer(layer)
        .write()
        .to_file(path)
        .expect("write tiled exr");
}

/// ZIP1 compression over `tile` x `tile` blocks.
pub fn tiled_encoding(tile: usize) -> Encoding {
    Encoding {
        compression: Compression::ZIP1,
        blocks: Blocks::Tiles(Vec2(tile, tile)),
        line_order: LineOrder::Increasing,
    }
}

/// A plane whose value at absolute `(x, y)` is `x * 100 + y + bias`.
pub fn coordinate_plane(origin: (i32, i32), size: (usize, usize), bias: f32) -> Vec<f32> {
    let (x0, y0) = origin;
    let mut plane = Vec::with_capacity(size.0 * size.1);
    for row in 0..size.1 as i32 {
        for col in 0..size.0 as i32 {
            plane.push(coordinate_value(x0 + col, y0 + row, bias));
        }
    }
    plane
}

/// Value stored by [`coordinate_plane`] at absolute `(x, y)`.
pub fn coordinate_value(x: i32, y: i32, bias: f32) -> f32 {
    (x * 100 + y) as f32 + bias
}

/// Deterministic awkward floats: negatives, zeros, tiny and huge magnitudes.
pub fn awkward_samples(count: usize) -> Vec<f32> {
    let specials = [
        0.0,
        -0.0,
        1.0,
        -1.5,
        f32::MIN_POSITIVE,
        f32::MIN_POSITIVE / 8.0,
        f32::MAX,
        f32::INFINITY,
        f32::NEG_INFINITY,
        65504.0,
        1.0e-30,
        std::f32::consts::PI,
    ];
    (0..count)
        .map(|i| {
            if i % 3 == 0 {
                specials[(i / 3) % specials.len()]
            } else {
                (i as f32 * 0.37).sin() * 1000.0 / (i as f32 + 1.0)
            }
        })
        .collect()
}

/// Asserts bit-exact equality of two sample slices.
pub fn assert_bits_eq(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len(), "sample count");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a.to_bits(), e.to_bits(), "sample {} differs: {} vs {}", i, a, e);
    }
}
