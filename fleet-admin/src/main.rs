use std::fs::File;
use std::path::PathBuf;

use fleet_admin::{App, AppError, Settings, paths, source};
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};

fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let path = paths::log_file().unwrap_or_else(|| PathBuf::from("fleet-admin.log"));
    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("Failed to create log file {}: {}", path.display(), e),
    }
}

async fn run() -> Result<(), AppError> {
    let settings = Settings::load_default()?;
    init_logging(settings.log_level()?);
    info!("Starting fleet-admin");

    let source = source::from_settings(&settings.source)?;
    let (app, events) = App::new(settings, source);
    app.run(events).await
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
