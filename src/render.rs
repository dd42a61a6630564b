pub mod card_svg;
pub mod composite;
pub mod surface;

pub use card_svg::{CARD_SIZE, CardRenderer};
pub use surface::{
    CaptureSurface, CardSurface, EXPORT_PIXEL_RATIO, Layer, LayerKind, LayerSource, RasterizeOpts,
};
