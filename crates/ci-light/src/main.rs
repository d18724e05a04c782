use anyhow::{Context, Result};
use ci_light::pipeline::EXIT_STARTUP;
use ci_light::{build_api, exit_code, ConsoleIndicator, Pipeline, Ribbon};
use ci_light_config::{AppConfig, TokenResolver};
use log::{debug, error, info};
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    // .env may carry RUST_LOG, so it is read before the logger exists
    let dotenv = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    match dotenv {
        Ok(path) => debug!("Loaded .env file from: {:?}", path),
        Err(_) => debug!(".env file not found, will rely on environment variables"),
    }

    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            EXIT_STARTUP
        }
    };
    process::exit(code);
}

async fn run() -> Result<i32> {
    let config = AppConfig::load();
    config.validate().context("Invalid configuration")?;

    let token = TokenResolver::new()
        .get_token()
        .context("No GitHub token available")?;
    let api = build_api(&config, &token)?;
    let pipeline = Pipeline::new(&config, api)?;
    info!("Watching in {:?} mode", pipeline.mode());

    let mut ribbon = Ribbon::new(ConsoleIndicator::new(), &config.ribbon, config.palette);
    ribbon.start();

    let interval = Duration::from_secs(config.poll_interval_secs);
    loop {
        let cycle = tokio::select! {
            cycle = pipeline.run_cycle() => cycle,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, exiting");
                return Ok(0);
            }
        };
        cycle.render(&mut ribbon);

        if config.once {
            return Ok(cycle.failure().map_or(0, exit_code));
        }

        debug!("Next poll in {}s", interval.as_secs());
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, exiting");
                return Ok(0);
            }
        }
    }
}
