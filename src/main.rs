/*!
Here we go!

Usage: `mo100 [ path/to/config.toml ]`
*/
use std::sync::Arc;

use simplelog::{ColorChoice, TerminalMode, TermLogger};

use mo100::{config, inter};

static DEFAULT_CONFIG_PATH: &str = "config.toml";

fn die(msg: &str) -> ! {
    log::error!("{}", msg);
    eprintln!("{}", msg);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let log_cfg = simplelog::ConfigBuilder::new()
        .add_filter_allow_str("mo100")
        .build();
    if let Err(e) = TermLogger::init(
        mo100::log_level_from_env(),
        log_cfg,
        TerminalMode::Stdout,
        ColorChoice::Auto
    ) {
        eprintln!("Unable to start logging: {}", &e);
    }
    log::info!("Logging started.");

    let config_path = std::env::args().nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_owned());

    let glob = match config::load_configuration(&config_path).await {
        Ok(glob) => glob,
        Err(e) => die(&format!("Error loading configuration: {}", &e)),
    };

    if let Err(e) = inter::init(&glob.cfg.templates_dir) {
        die(&format!("Error initializing templates: {}", &e));
    }

    let addr = glob.cfg.addr;
    let app = inter::router(Arc::new(glob));

    log::info!("Listening on {}", &addr);

    if let Err(e) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        die(&format!("Server error: {}", &e));
    }
}
