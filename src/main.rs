use colored::Colorize;
use std::error::Error;
use subnet_calculator::cmd::{run, CommandLine};
use subnet_calculator::config::Config;
use subnet_calculator::logging::init_logging;
use subnet_calculator::output::Handler;
use subnet_calculator::ranges::load_cloudflare_table;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    init_logging(&config.log_config)?;
    log::info!("#Start main()");

    let cli = CommandLine::parse_args();
    let handler = Handler::new(load_cloudflare_table(&config).await, config.default_mode);

    match run(&cli, &handler) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            log::warn!("{} failed: {e}", cli.command_name());
            if cli.json {
                println!("{}", e.to_json());
            } else {
                eprintln!("{} {e}", format!("Error ({}):", e.status_code()).red());
            }
            std::process::exit(1);
        }
    }

    Ok(())
}
