mod app;
mod cli;
mod config;
mod core;
mod utils;

use clap::Parser;

#[dotenvy::load(path = "./.env", required = false)]
#[tokio::main]
async fn main() {
    let args = cli::Cli::parse();
    let Some(title) = args.title() else {
        println!("{}", cli::usage());
        std::process::exit(1);
    };

    let config = match config::Config::init() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to initialize configuration: {e}");
            std::process::exit(1);
        }
    };
    app::common::init_logging(&config);

    // Client and lookup failures are written into the report; the exit status stays 0.
    let mut stdout = std::io::stdout();
    let client = match core::moviebox::MovieboxClient::new(&config.moviebox) {
        Ok(c) => c,
        Err(e) => {
            app::report::report_setup_failure(&mut stdout, title, args.year, &e);
            return;
        }
    };
    tracing::debug!("Using MovieBox host {}", config.moviebox.host_url());

    app::report::run_language_check(&client, title, args.year, &mut stdout).await;
}
