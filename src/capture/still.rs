use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::CardResult;
use crate::render::surface::{CaptureSurface, RasterizeOpts};

/// Encode the export raster of `surface` (2x, background video excluded) as PNG bytes.
pub fn render_still_png(surface: &dyn CaptureSurface) -> CardResult<Vec<u8>> {
    surface.rasterize(&RasterizeOpts::export())?.encode_png()
}

pub fn ensure_parent_dir(path: &Path) -> CardResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Write `surface` as a PNG to `out_path`.
///
/// Failures are logged and the export becomes a no-op (`None`). The PNG is encoded in memory
/// first, so a failed rasterization never leaves a file behind.
pub fn export_still(surface: &dyn CaptureSurface, out_path: &Path) -> Option<PathBuf> {
    let written = render_still_png(surface).and_then(|png| {
        ensure_parent_dir(out_path)?;
        std::fs::write(out_path, &png)
            .with_context(|| format!("write png '{}'", out_path.display()))?;
        Ok(png.len())
    });
    match written {
        Ok(bytes) => {
            tracing::info!(path = %out_path.display(), bytes, "still exported");
            Some(out_path.to_path_buf())
        }
        Err(err) => {
            tracing::error!(path = %out_path.display(), error = %err, "still export failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/still.rs"]
mod tests;
