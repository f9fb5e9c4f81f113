use std::sync::Arc;

use egui::{Color32, Rect, Sense, TextureHandle, TextureOptions, pos2};

use crate::bitmap::{MaskBitmap, SourceImage};
use crate::config::MaskCanvasConfig;
use crate::error::MaskResult;
use crate::event::{EventBus, MaskEvent, MaskEventHandler};
use crate::geometry::{DisplaySurface, surface_local};
use crate::input::{InputEvent, InputHandler};
use crate::rasterizer::MaskRasterizer;
use crate::renderer::DisplayRenderer;
use crate::stroke::StrokeRecorder;

/// Everything tied to the currently loaded source image.
///
/// Dropping it releases the image reference and its GPU texture.
struct LoadedImage {
    source: Arc<SourceImage>,
    surface: DisplaySurface,
    renderer: DisplayRenderer,
    texture: Option<TextureHandle>,
}

impl Drop for LoadedImage {
    fn drop(&mut self) {
        log::debug!("Releasing source image {}", self.source.id());
    }
}

/// Freehand mask authoring over a source image.
///
/// The caller drives it with [`MaskCanvas::load`], [`MaskCanvas::extract_mask`],
/// [`MaskCanvas::clear`] and [`MaskCanvas::set_brush_size`], and hears about
/// selection changes through [`MaskCanvas::subscribe`].
pub struct MaskCanvas {
    config: MaskCanvasConfig,
    brush_size: u32,
    loaded: Option<LoadedImage>,
    recorder: StrokeRecorder,
    input: InputHandler,
    surface_rect: Option<Rect>,
    events: EventBus,
}

impl std::fmt::Debug for MaskCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaskCanvas")
            .field("brush_size", &self.brush_size)
            .field("image", &self.loaded.as_ref().map(|loaded| loaded.source.id()))
            .field("points", &self.recorder.path().len())
            .field("surface_rect", &self.surface_rect)
            .field("events", &self.events)
            .finish()
    }
}

impl Default for MaskCanvas {
    fn default() -> Self {
        Self::with_valid_config(MaskCanvasConfig::default())
    }
}

impl MaskCanvas {
    /// Create a canvas, rejecting a config whose brush range is unusable
    pub fn new(config: MaskCanvasConfig) -> MaskResult<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: MaskCanvasConfig) -> Self {
        let brush_size = config.clamp_brush_size(config.brush_size);
        Self {
            config,
            brush_size,
            loaded: None,
            recorder: StrokeRecorder::new(),
            input: InputHandler::new(),
            surface_rect: None,
            events: EventBus::new(),
        }
    }

    pub fn config(&self) -> &MaskCanvasConfig {
        &self.config
    }

    /// Register a handler for [`MaskEvent`]s
    pub fn subscribe(&self, handler: impl MaskEventHandler + 'static) {
        self.events.subscribe(Box::new(handler));
    }

    /// Show `source`, fitted into `container_width` display pixels.
    ///
    /// Recorded strokes are kept; use a fresh canvas per image. On error the
    /// previously loaded image stays in place.
    pub fn load(&mut self, source: Arc<SourceImage>, container_width: f32) -> MaskResult<()> {
        let surface = DisplaySurface::fit(
            source.width(),
            source.height(),
            container_width,
            self.config.fallback_container_width,
        );
        let renderer = DisplayRenderer::new(&source, surface, self.config.overlay_color32())?;

        log::info!(
            "Loaded {}x{} image {} at {}x{} display size",
            source.width(),
            source.height(),
            source.id(),
            surface.width(),
            surface.height()
        );
        let event = MaskEvent::ImageLoaded {
            image_id: source.id(),
            width: source.width(),
            height: source.height(),
            display_width: surface.width(),
            display_height: surface.height(),
        };

        // the previous image, if any, is dropped here
        self.loaded = Some(LoadedImage {
            source,
            surface,
            renderer,
            texture: None,
        });
        self.input.reset();
        self.events.emit(event);
        Ok(())
    }

    /// Release the source image and stop accepting input
    pub fn unload(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            self.events.emit(MaskEvent::ImageUnloaded {
                image_id: loaded.source.id(),
            });
        }
        self.surface_rect = None;
        self.input.reset();
    }

    pub fn source(&self) -> Option<&Arc<SourceImage>> {
        self.loaded.as_ref().map(|loaded| &loaded.source)
    }

    pub fn display_surface(&self) -> Option<DisplaySurface> {
        self.loaded.as_ref().map(|loaded| loaded.surface)
    }

    /// Display width and height of the loaded image
    pub fn display_size(&self) -> Option<[u32; 2]> {
        self.display_surface().map(|surface| surface.size())
    }

    /// The frame currently shown to the user
    pub fn display_frame(&self) -> Option<image::RgbaImage> {
        self.loaded.as_ref().map(|loaded| loaded.renderer.frame_image())
    }

    pub fn brush_size(&self) -> u32 {
        self.brush_size
    }

    /// Change the brush width for new feedback and for every later extraction
    pub fn set_brush_size(&mut self, size: u32) {
        let clamped = self.config.clamp_brush_size(size);
        if clamped != size {
            log::warn!("Brush size {} out of range, using {}", size, clamped);
        }
        if clamped != self.brush_size {
            self.brush_size = clamped;
            self.events.emit(MaskEvent::BrushSizeChanged { size: clamped });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recorder.path().is_empty()
    }

    /// Gestures that recorded at least one point since the last clear
    pub fn stroke_count(&self) -> usize {
        self.recorder.gesture_count()
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }

    pub fn recorder(&self) -> &StrokeRecorder {
        &self.recorder
    }

    /// Where the surface sits on screen, or `None` while it is not shown
    pub fn set_surface_rect(&mut self, rect: Option<Rect>) {
        self.surface_rect = rect;
    }

    pub fn surface_rect(&self) -> Option<Rect> {
        self.surface_rect
    }

    /// Rasterize the recorded path at native resolution.
    ///
    /// Returns `Ok(None)` when nothing has been drawn or no image is loaded.
    pub fn extract_mask(&self) -> MaskResult<Option<MaskBitmap>> {
        let Some(loaded) = &self.loaded else {
            return Ok(None);
        };
        MaskRasterizer::new(loaded.source.size(), loaded.surface.size())
            .extract(self.recorder.path(), self.brush_size)
    }

    /// Discard all strokes and show the unmarked image again
    pub fn clear(&mut self) {
        self.recorder.clear();
        if let Some(loaded) = &mut self.loaded {
            loaded.renderer.reset();
        }
        log::debug!("Mask cleared");
        self.events.emit(MaskEvent::SelectionChanged { is_empty: true });
    }

    /// Feed one input event through the stroke state machine
    pub fn handle_input(&mut self, event: &InputEvent) {
        let Some(loaded) = &mut self.loaded else {
            return;
        };
        let location = event.location();
        let Some(point) = surface_local(location.position, self.surface_rect) else {
            log::trace!("Ignoring {:?}: surface not mounted", event);
            return;
        };

        match event {
            InputEvent::PointerDown { .. } | InputEvent::TouchStart { .. } => {
                if location.is_in_canvas {
                    self.recorder.begin(point);
                }
            }
            InputEvent::PointerMove { .. } | InputEvent::TouchMove { .. } => {
                if let Some(segment) = self.recorder.extend(point) {
                    loaded.renderer.draw_segment(segment, self.brush_size);
                }
            }
            InputEvent::PointerUp { .. }
            | InputEvent::PointerLeave { .. }
            | InputEvent::TouchEnd { .. } => {
                if let Some(is_empty) = self.recorder.end() {
                    self.events.emit(MaskEvent::SelectionChanged { is_empty });
                }
            }
        }
    }

    /// Show the canvas and process this frame's pointer and touch input.
    ///
    /// Input is only read while this is called, so a canvas that is no longer
    /// shown stops listening.
    pub fn ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let Some(surface) = self.display_surface() else {
            self.surface_rect = None;
            return ui.label("No image loaded");
        };

        let (rect, response) = ui.allocate_exact_size(surface.size_vec2(), Sense::drag());
        self.surface_rect = Some(rect);

        for event in self.input.process_input(ui.ctx(), rect) {
            self.handle_input(&event);
        }

        let Some(loaded) = &mut self.loaded else {
            return response;
        };
        if let Some(frame) = loaded.renderer.take_dirty_frame() {
            if let Some(texture) = loaded.texture.as_mut() {
                texture.set(frame, TextureOptions::LINEAR);
            } else {
                let name = format!("mask_canvas_{}", loaded.source.id());
                let texture = ui.ctx().load_texture(name, frame, TextureOptions::LINEAR);
                loaded.texture = Some(texture);
            }
        }
        if let Some(texture) = &loaded.texture {
            let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
            ui.painter_at(rect).image(texture.id(), rect, uv, Color32::WHITE);
        }

        response
    }
}

impl Drop for MaskCanvas {
    fn drop(&mut self) {
        self.unload();
    }
}

