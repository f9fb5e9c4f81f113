// src/renderer.rs
use egui::{Color32, ColorImage};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tiny_skia::{ColorU8, Pixmap};

use crate::bitmap::SourceImage;
use crate::brush::{solid_paint, stroke_polyline};
use crate::error::{MaskError, MaskResult};
use crate::geometry::DisplaySurface;
use crate::stroke::Segment;

/// Paints live stroke feedback over the source image at display resolution.
///
/// The renderer keeps the unmarked frame around so that clearing restores the
/// exact pixels shown right after loading.
pub struct DisplayRenderer {
    base: Pixmap,
    frame: Pixmap,
    overlay: Color32,
    dirty: bool,
}

impl std::fmt::Debug for DisplayRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayRenderer")
            .field("size", &(self.frame.width(), self.frame.height()))
            .field("overlay", &self.overlay)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl DisplayRenderer {
    /// Scale `source` down to `surface` and start from an unmarked frame
    pub fn new(
        source: &SourceImage,
        surface: DisplaySurface,
        overlay: Color32,
    ) -> MaskResult<Self> {
        let scaled;
        let pixels = if source.size() == surface.size() {
            source.pixels()
        } else {
            scaled = imageops::resize(
                source.pixels(),
                surface.width(),
                surface.height(),
                FilterType::Triangle,
            );
            &scaled
        };
        let base = premultiplied(pixels)?;

        Ok(Self {
            frame: base.clone(),
            base,
            overlay,
            dirty: true,
        })
    }

    /// The current frame, unmultiplied
    pub fn frame_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.frame.width(), self.frame.height());
        for (dst, src) in image.pixels_mut().zip(self.frame.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        image
    }

    /// Paint the overlay color along `segment`, `brush_size` display pixels wide
    pub fn draw_segment(&mut self, segment: Segment, brush_size: u32) {
        let paint = solid_paint(self.overlay.to_srgba_unmultiplied(), true);
        stroke_polyline(
            &mut self.frame,
            &[segment.from, segment.to],
            brush_size as f32,
            &paint,
        );
        self.dirty = true;
    }

    /// Throw away all feedback and show the unmarked image again
    pub fn reset(&mut self) {
        self.frame.clone_from(&self.base);
        self.dirty = true;
    }

    /// Returns the frame for upload if it changed since the last call
    pub fn take_dirty_frame(&mut self) -> Option<ColorImage> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(ColorImage::from_rgba_premultiplied(
            [self.frame.width() as usize, self.frame.height() as usize],
            self.frame.data(),
        ))
    }
}

fn premultiplied(image: &RgbaImage) -> MaskResult<Pixmap> {
    let (width, height) = image.dimensions();
    let mut pixmap =
        Pixmap::new(width, height).ok_or(MaskError::EmptySurface { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}
