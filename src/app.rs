use std::path::PathBuf;
use std::sync::Arc;

use image::{Rgba, RgbaImage};
use parking_lot::Mutex;

use crate::bitmap::{MaskBitmap, SourceImage, SourceImageRef};
use crate::canvas::MaskCanvas;
use crate::config::MaskCanvasConfig;
use crate::error::MaskResult;
use crate::event::MaskEvent;

/// Startup options for the demo host
#[derive(Debug, Default)]
pub struct DemoOptions {
    pub source: Option<SourceImageRef>,
    /// Overrides the persisted configuration when set
    pub config: Option<MaskCanvasConfig>,
    pub output: Option<PathBuf>,
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(serde::Deserialize, serde::Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct MaskDemoApp {
    config: MaskCanvasConfig,
    output: PathBuf,

    #[serde(skip)]
    canvas: MaskCanvas,
    #[serde(skip)]
    pending_source: Option<SourceImageRef>,
    #[serde(skip)]
    mask_empty: Arc<Mutex<bool>>,
    #[serde(skip)]
    status: Option<String>,
}

impl Default for MaskDemoApp {
    fn default() -> Self {
        Self {
            config: MaskCanvasConfig::default(),
            output: PathBuf::from("mask.png"),
            canvas: MaskCanvas::default(),
            pending_source: None,
            mask_empty: Arc::new(Mutex::new(true)),
            status: None,
        }
    }
}

impl MaskDemoApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, options: DemoOptions) -> Self {
        let mut app: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        app.config = checked_config(app.config.clone());

        if let Some(config) = options.config {
            app.config = config;
        }
        if let Some(output) = options.output {
            app.output = output;
        }
        app.pending_source = options.source.or_else(|| match demo_image() {
            Ok(source) => Some(source),
            Err(err) => {
                log::error!("Failed to build demo image: {}", err);
                None
            }
        });
        app.attach_canvas();
        app
    }

    fn attach_canvas(&mut self) {
        self.canvas = MaskCanvas::new(self.config.clone()).unwrap_or_else(|err| {
            log::error!("Falling back to the default canvas: {}", err);
            MaskCanvas::default()
        });
        self.mask_empty = Arc::new(Mutex::new(true));

        let mask_empty = Arc::clone(&self.mask_empty);
        self.canvas.subscribe(move |event: &MaskEvent| {
            if let MaskEvent::SelectionChanged { is_empty } = event {
                *mask_empty.lock() = *is_empty;
            }
        });
    }

    fn export_mask(&mut self) {
        self.status = Some(match self.canvas.extract_mask() {
            Ok(Some(mask)) => self.save_mask(&mask),
            Ok(None) => "Mark the area to edit first.".to_owned(),
            Err(err) => {
                log::error!("Mask export failed: {}", err);
                format!("Mask export failed: {err}")
            }
        });
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_mask(&self, mask: &MaskBitmap) -> String {
        match std::fs::write(&self.output, mask.png_bytes()) {
            Ok(()) => {
                log::info!("Wrote mask to {}", self.output.display());
                format!(
                    "Saved {}x{} mask to {}",
                    mask.width(),
                    mask.height(),
                    self.output.display()
                )
            }
            Err(err) => {
                log::error!("Failed to write {}: {}", self.output.display(), err);
                format!("Could not save mask: {err}")
            }
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn save_mask(&self, mask: &MaskBitmap) -> String {
        format!(
            "Extracted {}x{} mask ({} base64 characters)",
            mask.width(),
            mask.height(),
            mask.to_base64().len()
        )
    }
}

impl eframe::App for MaskDemoApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.config.brush_size = self.canvas.brush_size();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("mask_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Brush size:");
                let mut size = self.canvas.brush_size();
                let range = self.config.min_brush_size..=self.config.max_brush_size;
                if ui.add(egui::Slider::new(&mut size, range)).changed() {
                    self.canvas.set_brush_size(size);
                }

                if ui.button("Reset mask").clicked() {
                    self.canvas.clear();
                    self.status = None;
                }

                let has_selection = !*self.mask_empty.lock();
                if ui
                    .add_enabled(has_selection, egui::Button::new("Export mask"))
                    .clicked()
                {
                    self.export_mask();
                }
            });
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(source) = self.pending_source.take() {
                if let Err(err) = self.canvas.load(source, ui.available_width()) {
                    log::error!("Failed to show image: {}", err);
                    self.status = Some(format!("Could not show image: {err}"));
                }
            }
            self.canvas.ui(ui);
        });

        if self.canvas.is_drawing() {
            ctx.request_repaint();
        }
    }
}

/// Fall back to the defaults when stored settings are no longer usable
fn checked_config(config: MaskCanvasConfig) -> MaskCanvasConfig {
    match config.validate() {
        Ok(()) => config,
        Err(err) => {
            log::warn!("Ignoring stored mask canvas config: {}", err);
            MaskCanvasConfig::default()
        }
    }
}

/// A checkerboard with a soft gradient, shown when no image is given
pub fn demo_image() -> MaskResult<SourceImageRef> {
    let pixels = RgbaImage::from_fn(960, 600, |x, y| {
        let checker = ((x / 60) + (y / 60)) % 2 == 0;
        let shade: u8 = if checker { 200 } else { 150 };
        Rgba([shade, (shade as u32 * y / 600) as u8 + 40, 180, 255])
    });
    Ok(Arc::new(SourceImage::from_rgba(pixels)?))
}
