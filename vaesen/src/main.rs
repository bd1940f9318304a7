//! Vaesen investigator manager.
//!
//! A line-oriented interface for one investigator and their headquarters:
//! dice tests with pushing, fear, conditions and upgrade purchases.
//!
//! ```bash
//! cargo run -p vaesen -- --quick-start "Signe Ek" writer middle-aged --seed 7
//! cargo run -p vaesen -- --campaign saves/Signe_Ek.json
//! ```

mod headless;
mod store;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays scriptable
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = headless::config_from_env(|key| std::env::var(key).ok());
    let config = headless::parse_config_from_args(config, &args);

    if config.show_help {
        print_help();
        return Ok(());
    }

    headless::run_headless(config).await.map_err(|e| e.into())
}

fn print_help() {
    println!("Vaesen investigator manager");
    println!();
    println!("Usage: vaesen [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --campaign <path>                        Campaign file to load (or save to)");
    println!("  --quick-start <name> <archetype> [age]   Start a new campaign");
    println!("  --seed <n>                               Seed the dice");
    println!("  -h, --help                               Show this help");
    println!();
    println!("Environment:");
    println!("  VAESEN_CAMPAIGN      Default campaign file");
    println!("  VAESEN_HISTORY_LEN   Number of rolls kept in history (default 5)");
    println!("  RUST_LOG             Log filter, e.g. vaesen_core=debug");
}
