use bookmark_popup::gui::PopupApp;
use bookmark_popup::loader::spawn_loader;
use bookmark_popup::logging;
use bookmark_popup::navigator::SystemBrowser;
use bookmark_popup::settings::Settings;

use eframe::egui;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(&Settings::path())?;
    logging::init(settings.debug_logging, settings.log_file.clone().map(Into::into));
    tracing::debug!(?settings, "settings loaded");

    let (w, h) = settings.window_size.unwrap_or((420, 480));
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([w as f32, h as f32])
            .with_min_inner_size([320.0, 160.0])
            .with_always_on_top(),
        ..Default::default()
    };

    let loader = spawn_loader(&settings);
    eframe::run_native(
        "Bookmarks",
        native_options,
        Box::new(move |_cc| Box::new(PopupApp::new(&settings, loader, Box::new(SystemBrowser)))),
    )
    .map_err(|e| anyhow::anyhow!("failed to run popup: {e}"))?;
    Ok(())
}
