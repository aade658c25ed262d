use colored::Colorize;
use deskjobs::config::Settings;
use deskjobs::tui::{self, OcrApp};

fn main() {
    let _ = deskjobs::logging::init("ocr");

    let settings = Settings::load_or_create();
    let mut app = OcrApp::new(settings, Settings::config_path().ok());
    if let Err(e) = tui::run(&mut app) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
