use image::GrayImage;
use tiny_skia::{Color, Pixmap};

use crate::bitmap::MaskBitmap;
use crate::brush::{solid_paint, stroke_polyline};
use crate::error::{MaskError, MaskResult};
use crate::geometry::ScaleFactors;
use crate::stroke::StrokePath;

const SELECTED: [u8; 4] = [255, 255, 255, 255];

/// Replays a recorded path at the source image's native resolution
#[derive(Debug, Clone, Copy)]
pub struct MaskRasterizer {
    native: [u32; 2],
    display: [u32; 2],
}

impl MaskRasterizer {
    pub fn new(native: [u32; 2], display: [u32; 2]) -> Self {
        Self { native, display }
    }

    pub fn scale(&self) -> ScaleFactors {
        ScaleFactors::between(self.native, self.display)
    }

    /// Paint `path` as one white polyline on black.
    ///
    /// The line is `brush_size` display pixels wide, scaled by the horizontal
    /// factor, with round caps and joins. Edges are not anti-aliased, so every
    /// pixel is either 0 or 255. Returns `None` for an empty path.
    pub fn rasterize(&self, path: &StrokePath, brush_size: u32) -> MaskResult<Option<GrayImage>> {
        if path.is_empty() {
            return Ok(None);
        }

        let [width, height] = self.native;
        let mut pixmap =
            Pixmap::new(width, height).ok_or(MaskError::EmptySurface { width, height })?;
        pixmap.fill(Color::BLACK);

        let scale = self.scale();
        let line_width = scale.stroke_width(brush_size as f32);
        let points: Vec<_> = path.points().iter().map(|p| scale.to_native(*p)).collect();
        stroke_polyline(&mut pixmap, &points, line_width, &solid_paint(SELECTED, false));

        log::debug!(
            "Rasterized {} points into {}x{} mask (line width {:.1})",
            points.len(),
            width,
            height,
            line_width
        );
        let luma = pixmap.pixels().iter().map(|pixel| pixel.red()).collect();
        GrayImage::from_raw(width, height, luma)
            .map(Some)
            .ok_or(MaskError::EmptySurface { width, height })
    }

    /// Rasterize and encode in one go
    pub fn extract(&self, path: &StrokePath, brush_size: u32) -> MaskResult<Option<MaskBitmap>> {
        self.rasterize(path, brush_size)?
            .map(MaskBitmap::encode)
            .transpose()
    }
}
