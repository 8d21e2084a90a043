// Table Plan Application
// Main entry point

use table_plan::ui_egui::BookingApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Table Plan dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Table Plan",
        options,
        Box::new(|cc| Ok(Box::new(BookingApp::new(cc)))),
    )
}
