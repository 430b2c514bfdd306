use image::{GenericImageView, Rgb, RgbImage};

use super::*;

fn sample() -> DynamicImage {
    let mut img = RgbImage::from_pixel(6, 9, Rgb([1, 2, 3]));
    img.put_pixel(5, 8, Rgb([200, 100, 50]));
    DynamicImage::ImageRgb8(img)
}

#[test]
fn test_decode_png_bytes() {
    let bytes = encode_png(&sample()).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    let decoded = decode_poster(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (6, 9));
    assert_eq!(decoded.to_rgb8().get_pixel(5, 8), &Rgb([200, 100, 50]));
}

#[test]
fn test_decode_garbage_is_error() {
    let err = decode_poster(b"<html>Unauthorized</html>").unwrap_err();
    assert!(matches!(err, RenderError::Image(_)));
}

#[test]
fn test_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Poster.png");
    save_png(&sample(), &path).unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("Poster.png.part").exists());

    let loaded = load_poster(&path).unwrap();
    assert_eq!(loaded.dimensions(), (6, 9));
}

#[test]
fn test_save_into_missing_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("Poster.png");
    assert!(matches!(save_png(&sample(), &path), Err(RenderError::Io(_))));
}

#[test]
fn test_failed_rename_removes_part_file() {
    let dir = tempfile::tempdir().unwrap();
    // A directory squatting on the target name makes the rename fail
    let path = dir.path().join("Poster.png");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("keep"), b"x").unwrap();

    assert!(matches!(save_png(&sample(), &path), Err(RenderError::Io(_))));
    assert!(!dir.path().join("Poster.png.part").exists());
    assert!(path.join("keep").is_file());
}

#[test]
fn test_discard_missing_part_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    discard_part(&dir.path().join("never-written.png.part"));
}

#[test]
fn test_part_path() {
    assert_eq!(
        part_path(Path::new("/a/b/Title.png")),
        PathBuf::from("/a/b/Title.png.part")
    );
}
