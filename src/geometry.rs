use egui::{Pos2, Rect, Vec2, pos2};

/// Size of the on-screen drawing area for one source image.
///
/// Both dimensions are whole display pixels and never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySurface {
    width: u32,
    height: u32,
}

impl DisplaySurface {
    /// Fit a `native_width x native_height` image into the available layout width.
    ///
    /// The image is never scaled up. A container width that cannot be measured
    /// (zero, negative or not finite) is replaced by `fallback_width`.
    pub fn fit(
        native_width: u32,
        native_height: u32,
        container_width: f32,
        fallback_width: f32,
    ) -> Self {
        let available = if container_width.is_finite() && container_width >= 1.0 {
            container_width
        } else {
            fallback_width
        };

        let width = (native_width as f32).min(available).floor().max(1.0) as u32;
        let height =
            (width as f64 * native_height as f64 / native_width.max(1) as f64).floor() as u32;

        Self {
            width,
            height: height.max(1),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> [u32; 2] {
        [self.width, self.height]
    }

    pub fn size_vec2(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Independent horizontal and vertical factors from display space to native space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f32,
    pub y: f32,
}

impl ScaleFactors {
    pub fn between(native: [u32; 2], display: [u32; 2]) -> Self {
        Self {
            x: native[0] as f32 / display[0].max(1) as f32,
            y: native[1] as f32 / display[1].max(1) as f32,
        }
    }

    pub fn to_native(&self, point: Pos2) -> Pos2 {
        pos2(point.x * self.x, point.y * self.y)
    }

    /// Brush widths follow the horizontal factor
    pub fn stroke_width(&self, display_width: f32) -> f32 {
        display_width * self.x
    }
}

/// Map a pointer position in viewport coordinates onto the drawing surface.
///
/// Returns `None` while the surface has not been laid out.
pub fn surface_local(pointer: Pos2, surface_rect: Option<Rect>) -> Option<Pos2> {
    let rect = surface_rect?;
    Some(pos2(pointer.x - rect.min.x, pointer.y - rect.min.y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_keeps_small_images_at_native_size() {
        let surface = DisplaySurface::fit(200, 100, 800.0, 500.0);
        assert_eq!(surface.size(), [200, 100]);
    }

    #[test]
    fn test_fit_scales_down_to_container() {
        let surface = DisplaySurface::fit(1000, 500, 500.0, 500.0);
        assert_eq!(surface.size(), [500, 250]);
    }

    #[test]
    fn test_fit_uses_fallback_for_unmeasured_layout() {
        assert_eq!(DisplaySurface::fit(1000, 1000, 0.0, 500.0).size(), [500, 500]);
        assert_eq!(DisplaySurface::fit(1000, 1000, f32::NAN, 500.0).size(), [500, 500]);
    }

    #[test]
    fn test_fit_never_collapses_height() {
        let surface = DisplaySurface::fit(4000, 1, 400.0, 500.0);
        assert_eq!(surface.width(), 400);
        assert_eq!(surface.height(), 1);
    }

    #[test]
    fn test_scale_factors_are_independent() {
        // 333 / 3 = 111 wide, 100 * 111 / 333 = 33.33 -> 33 high
        let surface = DisplaySurface::fit(333, 100, 111.0, 500.0);
        let scale = ScaleFactors::between([333, 100], surface.size());
        assert_eq!(scale.x, 3.0);
        assert!((scale.y - 100.0 / 33.0).abs() < 1e-6);
        let native = scale.to_native(pos2(10.0, 33.0));
        assert_eq!(native.x, 30.0);
        assert!((native.y - 100.0).abs() < 1e-3);
        assert_eq!(scale.stroke_width(10.0), 30.0);
    }

    #[test]
    fn test_surface_local_requires_mounted_surface() {
        let rect = Rect::from_min_size(pos2(40.0, 60.0), Vec2::new(200.0, 100.0));
        assert_eq!(surface_local(pos2(50.0, 70.0), Some(rect)), Some(pos2(10.0, 10.0)));
        assert_eq!(surface_local(pos2(50.0, 70.0), None), None);
    }
}
