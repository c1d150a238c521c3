#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod context;
mod helpers;
mod modules;
mod theme;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> eframe::Result {
    // Without FFmpeg every load fails with a notice; the window still opens.
    if let Err(e) = ffmpeg_the_third::init() {
        loopdesk_log!("[app] FFmpeg init failed: {e}");
    }

    let native_options = eframe::NativeOptions {
        centered: true,
        viewport: egui::ViewportBuilder::default()
            .with_title("Loopdesk Video Analytics")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([860.0, 560.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        "Loopdesk",
        native_options,
        Box::new(|cc| Ok(Box::new(app::LoopdeskApp::new(cc)))),
    )
}
