mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::session`, `crate::scene`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use flagwave_gui_lib::build;
pub use flagwave_gui_lib::config;
pub use flagwave_gui_lib::scene;
pub use flagwave_gui_lib::session;

use app::FlagApp;
use config::{CliArgs, ViewerConfig};

fn main() {
    // Resolve config before logging so its filter can apply
    let resolved = CliArgs::from_env().and_then(|args| ViewerConfig::resolve(&args));
    let fallback_filter = resolved
        .as_ref()
        .map(|c| c.log_filter.clone())
        .unwrap_or_else(|_| ViewerConfig::default().log_filter);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback_filter.into()),
        )
        .init();

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("usage: flagwave [--config <path>] [--library <dir>] [--image <id>] [--velocity <v>] [--align]");
            std::process::exit(2);
        }
    };
    tracing::info!(
        "Starting with library {} (velocity {})",
        config.library_dir.display(),
        config.velocity
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Flagwave")
            .with_inner_size(config.window_size)
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "flagwave",
        native_options,
        Box::new(move |cc| Ok(Box::new(FlagApp::new(cc, &config)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}
