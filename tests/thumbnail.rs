use std::fs;
use std::path::Path;

use image::{Rgb, RgbImage};
use smartthumb::{
    BatchReport, Error, FitMode, OutputFormat, Properties, ThumbnailParams, find_crop_for_path,
    process_directory_to_path, thumbnail_to_buffer, thumbnail_to_path,
};

/// Dark frame with a bright skin-toned square whose left edge starts at `patch_x`.
fn write_scene(path: &Path, width: u32, height: u32, patch_x: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let in_patch = (patch_x..patch_x + 24).contains(&x) && (height / 2 - 12..height / 2 + 12).contains(&y);
        if in_patch {
            Rgb([200, 146, 113])
        } else {
            Rgb([12, 12, 12])
        }
    });
    img.save(path).unwrap();
}

fn params(width: u32, height: u32) -> ThumbnailParams {
    ThumbnailParams {
        properties: Properties {
            resize_width: width,
            resize_height: height,
            ..Properties::default()
        },
        ..ThumbnailParams::default()
    }
}

#[test]
fn crop_moves_toward_salient_region() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.png");
    write_scene(&input, 192, 64, 150);

    let result = find_crop_for_path(&input, &params(64, 64).properties, true).unwrap();
    assert_eq!((result.crop.width, result.crop.height), (64, 64));
    assert!(result.crop.x <= 150, "{:?}", result.crop);
    assert!(result.crop.x + result.crop.width >= 174, "{:?}", result.crop);
}

#[test]
fn thumbnail_buffer_has_target_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.png");
    write_scene(&input, 160, 120, 40);

    for fit in [FitMode::Stretch, FitMode::Extent] {
        let thumb = thumbnail_to_buffer(
            &input,
            &ThumbnailParams {
                fit,
                ..params(40, 30)
            },
        )
        .unwrap();
        assert_eq!((thumb.width, thumb.height), (40, 30));
        assert_eq!(thumb.rgba.len(), 40 * 30 * 4);
    }
}

#[test]
fn writes_thumbnail_sidecar_and_analysis_image() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.png");
    write_scene(&input, 128, 96, 80);
    let output = dir.path().join("out/scene_thumb.jpg");

    let p = ThumbnailParams {
        sidecar: true,
        debug_output: true,
        ..params(48, 48)
    };
    let result = thumbnail_to_path(&input, &output, &p).unwrap();

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
    let decoded = image::open(&output).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (48, 48));

    let sidecar: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("out/scene_thumb.json")).unwrap())
            .unwrap();
    assert_eq!(sidecar["crop"]["x"], result.crop.x);
    assert_eq!(sidecar["crop"]["width"], result.crop.width);
    assert_eq!(sidecar["outputWidth"], 48);

    let analysis = image::open(dir.path().join("out/scene_thumb.analysis.png")).unwrap();
    assert_eq!((analysis.width(), analysis.height()), (128, 96));
}

#[test]
fn output_formats_carry_their_magic_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.png");
    write_scene(&input, 64, 64, 20);

    let cases: [(OutputFormat, &[u8]); 3] = [
        (OutputFormat::JPEG, &[0xFF, 0xD8, 0xFF]),
        (OutputFormat::PNG, b"\x89PNG"),
        (OutputFormat::TIFF, &[0x49, 0x49, 0x2A, 0x00]),
    ];
    for (format, magic) in cases {
        let output = dir.path().join(format!("thumb.{}", format.extension()));
        thumbnail_to_path(
            &input,
            &output,
            &ThumbnailParams {
                format,
                ..params(16, 16)
            },
        )
        .unwrap();
        let bytes = fs::read(&output).unwrap();
        assert_eq!(&bytes[..magic.len()], magic, "{}", format);
    }
}

#[test]
fn target_larger_than_tiny_image_still_fits() {
    // Derived geometry always fits, so only the thumbnail is upscaled
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.png");
    write_scene(&input, 30, 30, 2);

    let thumb = thumbnail_to_buffer(&input, &params(100, 50)).unwrap();
    assert_eq!((thumb.crop.crop.width, thumb.crop.crop.height), (30, 15));
    assert_eq!(thumb.rgba.len(), 100 * 50 * 4);
}

#[test]
fn batch_counts_processed_skipped_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir_all(input_dir.join("nested")).unwrap();

    write_scene(&input_dir.join("a.png"), 64, 48, 10);
    write_scene(&input_dir.join("b.bmp"), 48, 64, 10);
    fs::write(input_dir.join("notes.txt"), "not an image").unwrap();
    fs::write(input_dir.join("broken.jpg"), "not a jpeg either").unwrap();

    let report = process_directory_to_path(&input_dir, &output_dir, &params(32, 32), true).unwrap();
    assert_eq!(
        report,
        BatchReport {
            processed: 2,
            skipped: 2,
            errors: 1
        }
    );
    assert!(output_dir.join("a.jpg").exists());
    assert!(output_dir.join("b.jpg").exists());

    // Without continue-on-error the broken file aborts the run
    let err = process_directory_to_path(&input_dir, &dir.path().join("out2"), &params(32, 32), false);
    assert!(matches!(err, Err(Error::Image(_))));
}

#[test]
fn invalid_quality_is_rejected_before_decoding() {
    let p = ThumbnailParams {
        quality: 0,
        ..params(10, 10)
    };
    let err = thumbnail_to_buffer(Path::new("/does/not/exist.png"), &p).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "quality", .. }));
}
