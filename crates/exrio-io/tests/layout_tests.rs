//! Data window addressing, layer resolution, sample widening and error cases
//! against files synthesized directly with the codec.

mod common;

use approx::assert_relative_eq;
use common::{
    assert_bits_eq, coordinate_plane, coordinate_value, tiled_encoding, write_raw_channels,
    write_tiled_channels,
};
use exr::math::RoundingMode;
use exr::prelude::{
    AnyChannel, AnyChannels, FlatSamples, Image, Layer, LayerAttributes, Levels, ReadChannels,
    ReadLayers, SmallVec, Vec2, WritableImage,
};
use exrio_io::{
    is_exr_file, open, read, read_channels, read_named, write, write_with_options, Error,
    PixelBuffer, WriteOptions,
};
use half::f16;
use tempfile::tempdir;

#[test]
fn test_negative_window_reads_without_shift() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("overscan.exr");
    let origin = (-2, -3);
    let size = (8, 8);

    write_raw_channels(
        &path,
        origin,
        size,
        vec![
            ("R", FlatSamples::F32(coordinate_plane(origin, size, 0.0))),
            ("G", FlatSamples::F32(coordinate_plane(origin, size, 0.25))),
            ("B", FlatSamples::F32(coordinate_plane(origin, size, 0.5))),
        ],
    );

    let file = open(&path).unwrap();
    let window = file.data_window();
    assert_eq!(window.min(), (-2, -3));
    assert_eq!(window.max(), (5, 4));

    let buf = file.get().unwrap();
    assert_eq!(buf.shape(), [8, 8, 3]);

    // row i is y = min_y + i, column j is x = min_x + j
    for i in 0..8 {
        for j in 0..8 {
            let (x, y) = (j as i32 - 2, i as i32 - 3);
            assert_eq!(buf.get(i, j, 0), coordinate_value(x, y, 0.0));
            assert_eq!(buf.get(i, j, 1), coordinate_value(x, y, 0.25));
            assert_eq!(buf.get(i, j, 2), coordinate_value(x, y, 0.5));
        }
    }

    // the origin pixel sits at row 3, column 2
    assert_eq!(buf.get(3, 2, 0), 0.0);
    assert_eq!(buf.pixel(0, 0), &[-203.0, -202.75, -202.5]);
    assert_eq!(buf.pixel(7, 7), &[504.0, 504.25, 504.5]);
}

#[test]
fn test_positive_window_reads_without_shift() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cropped.exr");
    let origin = (100, 40);
    let size = (5, 3);

    write_raw_channels(
        &path,
        origin,
        size,
        vec![("Z", FlatSamples::F32(coordinate_plane(origin, size, 0.0)))],
    );

    let buf = read_named(&path, "Z").unwrap();
    assert_eq!(buf.shape(), [3, 5, 1]);
    assert_eq!(buf.get(0, 0, 0), coordinate_value(100, 40, 0.0));
    assert_eq!(buf.get(2, 4, 0), coordinate_value(104, 42, 0.0));
}

#[test]
fn test_write_with_negative_origin_roundtrips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("offset_write.exr");

    let data: Vec<f32> = (0..6 * 4 * 3).map(|i| i as f32 * 0.5 - 7.0).collect();
    let original = PixelBuffer::from_vec(4, 6, 3, data).unwrap();
    write_with_options(&path, &original, &WriteOptions::new().with_origin(-2, -3)).unwrap();

    let image = exr::prelude::read()
        .no_deep_data()
        .largest_resolution_level()
        .all_channels()
        .first_valid_layer()
        .all_attributes()
        .from_file(&path)
        .unwrap();
    assert_eq!(image.layer_data.attributes.layer_position, exr::prelude::Vec2(-2, -3));
    assert_eq!(image.layer_data.size, exr::prelude::Vec2(6, 4));

    let file = open(&path).unwrap();
    assert_eq!(file.data_window().max(), (3, 0));
    assert_bits_eq(file.get().unwrap().as_slice(), original.as_slice());
}

#[test]
fn test_tiled_negative_window_reads_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("tiled.exr");
    let origin = (-5, -7);
    let size = (37, 21);

    write_tiled_channels(
        &path,
        origin,
        size,
        8,
        vec![
            ("R", FlatSamples::F32(coordinate_plane(origin, size, 0.0))),
            ("G", FlatSamples::F32(coordinate_plane(origin, size, 0.25))),
            ("B", FlatSamples::F32(coordinate_plane(origin, size, 0.5))),
        ],
    );

    let file = open(&path).unwrap();
    assert!(file.header().tiled);
    assert_eq!(file.data_window().min(), (-5, -7));
    assert_eq!(file.data_window().max(), (31, 13));

    let buf = file.get().unwrap();
    assert_eq!(buf.shape(), [21, 37, 3]);
    assert_bits_eq(&buf.to_planes(3)[0], &coordinate_plane(origin, size, 0.0));
    assert_bits_eq(&buf.to_planes(3)[2], &coordinate_plane(origin, size, 0.5));
    assert_eq!(buf.pixel(20, 36), &[3113.0, 3113.25, 3113.5]);
}

#[test]
fn test_mip_mapped_file_reads_full_resolution_level() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mipmapped.exr");
    let origin = (-3, 2);
    let size = (19, 12);
    let rounding = RoundingMode::Down;

    // level 0 carries coordinates, every smaller level a constant marker
    let levels = |bias: f32| {
        let level_data = exr::meta::mip_map_levels(rounding, Vec2(size.0, size.1))
            .map(|(index, level_size)| {
                if index == 0 {
                    FlatSamples::F32(coordinate_plane(origin, size, bias))
                } else {
                    FlatSamples::F32(vec![-1.0; level_size.area()])
                }
            })
            .collect();
        Levels::Mip {
            rounding_mode: rounding,
            level_data,
        }
    };

    let channels: SmallVec<[AnyChannel<Levels<FlatSamples>>; 4]> = ["R", "G", "B"]
        .iter()
        .zip([0.0, 0.25, 0.5])
        .map(|(name, bias)| AnyChannel::new(*name, levels(bias)))
        .collect();

    let mut attributes = LayerAttributes::default();
    attributes.layer_position = Vec2(origin.0, origin.1);
    let layer = Layer::new(size, attributes, tiled_encoding(4), AnyChannels::sort(channels));
    Image::from_layer(layer).write().to_file(&path).unwrap();

    let buf = read(&path).unwrap();
    assert_eq!(buf.shape(), [12, 19, 3]);
    assert_bits_eq(&buf.to_planes(3)[1], &coordinate_plane(origin, size, 0.25));
    assert!(buf.as_slice().iter().all(|&v| v != -1.0));
}

fn write_layered(path: &std::path::Path) {
    let size = (4, 2);
    let fill = |v: f32| FlatSamples::F32(vec![v; 8]);
    write_raw_channels(
        path,
        (0, 0),
        size,
        vec![
            ("diffuse.R", fill(10.0)),
            ("diffuse.G", fill(11.0)),
            ("diffuse.B", fill(12.0)),
            ("R", fill(1.0)),
            ("G", fill(2.0)),
            ("B", fill(3.0)),
        ],
    );
}

#[test]
fn test_layer_catalog_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layers.exr");
    write_layered(&path);

    let file = open(&path).unwrap();
    assert_eq!(file.channels().len(), 6);
    assert_eq!(file.layers(), vec!["diffuse".to_string()]);

    // the container stores channels sorted by name
    let members = file.catalog().channels_in_layer("diffuse");
    assert_eq!(members, &["diffuse.B", "diffuse.G", "diffuse.R"]);
    assert!(file.catalog().channels_in_layer("specular").is_empty());
}

#[test]
fn test_read_layer_follows_catalog_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layers.exr");
    write_layered(&path);

    let diffuse = read_named(&path, "diffuse").unwrap();
    assert_eq!(diffuse.shape(), [2, 4, 3]);
    assert_eq!(diffuse.pixel(1, 3), &[12.0, 11.0, 10.0]);

    let rgb = read(&path).unwrap();
    assert_eq!(rgb.pixel(0, 0), &[1.0, 2.0, 3.0]);

    let single = read_named(&path, "diffuse.G").unwrap();
    assert_eq!(single.shape(), [2, 4, 1]);
    assert_eq!(single.get(1, 1, 0), 11.0);

    let mixed = read_channels(&path, &["diffuse.R", "R", "diffuse.R"]).unwrap();
    assert_eq!(mixed.pixel(0, 2), &[10.0, 1.0, 10.0]);
}

#[test]
fn test_half_and_uint_channels_widen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mixed_types.exr");

    let halves: Vec<f16> = [0.5, -2.0, 0.1, 1024.0].iter().map(|&v| f16::from_f32(v)).collect();
    write_raw_channels(
        &path,
        (0, 0),
        (2, 2),
        vec![
            ("Y", FlatSamples::F16(halves)),
            ("id", FlatSamples::U32(vec![0, 7, 1000, 65536])),
        ],
    );

    let buf = read_channels(&path, &["Y", "id"]).unwrap();
    assert_eq!(buf.get(0, 0, 0), 0.5);
    assert_eq!(buf.get(0, 1, 0), -2.0);
    assert_relative_eq!(buf.get(1, 0, 0), 0.1, epsilon = 1e-3);
    assert_eq!(buf.get(1, 1, 0), 1024.0);
    assert_eq!(buf.get(0, 1, 1), 7.0);
    assert_eq!(buf.get(1, 1, 1), 65536.0);
}

#[test]
fn test_unknown_name_is_not_found() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layers.exr");
    write_layered(&path);

    let err = read_named(&path, "specular").unwrap_err();
    assert!(matches!(err, Error::NotFound { ref name } if name == "specular"));

    let err = read_channels(&path, &["R", "Q", "W"]).unwrap_err();
    assert!(matches!(err, Error::NotFound { ref name } if name == "Q"));

    let err = read_channels::<_, &str>(&path, &[]).unwrap_err();
    assert!(matches!(err, Error::EmptySelection));
}

#[test]
fn test_default_read_requires_rgb() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("luma.exr");
    write_raw_channels(&path, (0, 0), (2, 2), vec![("Y", FlatSamples::F32(vec![1.0; 4]))]);

    let err = read(&path).unwrap_err();
    assert!(matches!(err, Error::NotFound { ref name } if name == "R"));
}

#[test]
fn test_sniff_never_fails() {
    let dir = tempdir().unwrap();

    let text = dir.path().join("notes.exr");
    std::fs::write(&text, b"this is not an image at all").unwrap();
    assert!(!is_exr_file(&text));

    let empty = dir.path().join("empty.exr");
    std::fs::write(&empty, b"").unwrap();
    assert!(!is_exr_file(&empty));

    let magic_only = dir.path().join("magic.exr");
    std::fs::write(&magic_only, [0x76, 0x2f, 0x31, 0x01]).unwrap();
    assert!(!is_exr_file(&magic_only));

    assert!(!is_exr_file(dir.path().join("missing.exr")));
    assert!(!is_exr_file(dir.path()));
}

#[test]
fn test_truncated_header_is_not_exr() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.exr");
    write(&good, &PixelBuffer::new(8, 8, 3)).unwrap();
    assert!(is_exr_file(&good));

    let bytes = std::fs::read(&good).unwrap();
    for len in [8, 40, 120] {
        let cut = dir.path().join(format!("cut_{}.exr", len));
        std::fs::write(&cut, &bytes[..len]).unwrap();
        assert!(!is_exr_file(&cut), "{} bytes should not pass", len);
    }
}

#[test]
fn test_open_non_exr_is_invalid_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("image.png");
    std::fs::write(&path, [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

    let err = open(&path).unwrap_err();
    assert!(matches!(err, Error::InvalidFormat { .. }));
    assert!(matches!(read(&path).unwrap_err(), Error::InvalidFormat { .. }));
}

#[test]
fn test_truncated_pixel_data_fails_whole_read() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.exr");
    write_raw_channels(
        &good,
        (0, 0),
        (16, 16),
        vec![
            ("R", FlatSamples::F32(vec![1.0; 256])),
            ("G", FlatSamples::F32(vec![2.0; 256])),
            ("B", FlatSamples::F32(vec![3.0; 256])),
        ],
    );

    let bytes = std::fs::read(&good).unwrap();
    let cut = dir.path().join("cut_pixels.exr");
    std::fs::write(&cut, &bytes[..bytes.len() - 64]).unwrap();

    let err = read(&cut).unwrap_err();
    assert!(err.is_transfer_error(), "unexpected error: {}", err);
}
