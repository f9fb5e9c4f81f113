#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod bitmap;
pub mod brush;
pub mod canvas;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod rasterizer;
pub mod renderer;
pub mod stroke;

pub use app::MaskDemoApp;
pub use bitmap::{MaskBitmap, SourceImage, SourceImageRef};
pub use canvas::MaskCanvas;
pub use config::MaskCanvasConfig;
pub use error::{MaskError, MaskResult};
pub use event::{EventBus, MaskEvent, MaskEventHandler};
pub use geometry::{DisplaySurface, ScaleFactors};
pub use input::{InputEvent, InputHandler, InputLocation};
pub use rasterizer::MaskRasterizer;
pub use renderer::DisplayRenderer;
pub use stroke::{Segment, StrokePath, StrokeRecorder, StrokeState};
