#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

// When compiling natively:
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result {
    use std::sync::Arc;

    use mask_canvas::app::DemoOptions;
    use mask_canvas::{MaskCanvasConfig, MaskDemoApp, SourceImage};

    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    // usage: mask_canvas_demo [IMAGE] [OUTPUT.png] [CONFIG.json]
    let mut args = std::env::args().skip(1);
    let mut options = DemoOptions::default();

    if let Some(path) = args.next() {
        match std::fs::read(&path)
            .map_err(mask_canvas::MaskError::from)
            .and_then(|bytes| SourceImage::from_bytes(&bytes))
        {
            Ok(source) => options.source = Some(Arc::new(source)),
            Err(err) => {
                log::error!("Could not open {}: {}", path, err);
                std::process::exit(1);
            }
        }
    }
    options.output = args.next().map(Into::into);
    if let Some(path) = args.next() {
        match MaskCanvasConfig::from_path(&path) {
            Ok(config) => options.config = Some(config),
            Err(err) => {
                log::error!("Could not load config {}: {}", path, err);
                std::process::exit(1);
            }
        }
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([300.0, 220.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Mask Canvas",
        native_options,
        Box::new(|cc| Ok(Box::new(MaskDemoApp::new(cc, options)))),
    )
}

// When compiling to web using trunk:
#[cfg(target_arch = "wasm32")]
fn main() {
    use eframe::wasm_bindgen::JsCast as _;

    use mask_canvas::MaskDemoApp;
    use mask_canvas::app::DemoOptions;

    // Redirect `log` message to `console.log` and friends:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("the_canvas_id")
            .expect("Failed to find the_canvas_id")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("the_canvas_id was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(MaskDemoApp::new(cc, DemoOptions::default())))),
            )
            .await;

        if let Err(e) = start_result {
            log::error!("Failed to start eframe: {e:?}");
        }
    });
}
