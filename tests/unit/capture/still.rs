use super::*;
use crate::foundation::core::{Frame, Size};
use crate::foundation::error::CardError;
use crate::render::surface::{CardSurface, Layer, LayerKind, LayerSource};

struct BrokenSurface;

impl CaptureSurface for BrokenSurface {
    fn size(&self) -> Size {
        Size::new(2, 2)
    }

    fn rasterize(&self, _opts: &RasterizeOpts) -> CardResult<Frame> {
        Err(CardError::raster("boom"))
    }
}

fn surface() -> CardSurface {
    CardSurface::new(Size::new(3, 2))
        .with_layer(Layer::new(
            LayerKind::BackgroundVideo,
            LayerSource::Fill([0, 0, 255, 255]),
        ))
        .with_layer(Layer::new(LayerKind::Content, LayerSource::Fill([255, 0, 0, 255])))
}

#[test]
fn still_png_is_2x_and_decodable() {
    let png = render_still_png(&surface()).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (6, 4));
    assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
}

#[test]
fn still_export_writes_file_into_new_directory() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("card.png");
    assert_eq!(export_still(&surface(), &out), Some(out.clone()));
    assert!(std::fs::read(&out).unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn failed_raster_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("card.png");
    assert_eq!(export_still(&BrokenSurface, &out), None);
    assert!(!out.exists());
}
