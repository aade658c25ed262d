use colored::Colorize;
use deskjobs::config::Settings;
use deskjobs::tui::{self, UpscaleApp};

fn main() {
    // best-effort: the UI works without a log file
    let _ = deskjobs::logging::init("upscale");

    let settings = Settings::load_or_create();
    let mut app = UpscaleApp::new(settings, Settings::config_path().ok());
    if let Err(e) = tui::run(&mut app) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
