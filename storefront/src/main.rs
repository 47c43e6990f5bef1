//! # Storefront
//!
//! Headless driver for the data layer: loads configuration and logging, restores
//! the stored session, opens the first screen and logs what it loaded.

use std::process::ExitCode;

use shared::format_price;
use storefront::app::{App, Intent};
use storefront::config::init_config;
use storefront::services::cart::summarize;

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let _log_guard = match storefront::debug::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Logging disabled: {}", e);
            None
        }
    };

    let config = match init_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        api = %config.api_base_url,
        timeout_ms = config.request_timeout.as_millis() as u64,
        session_file = %config.session_file.display(),
        "Storefront starting"
    );

    let app = match App::from_config(config).await {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Startup failed: {}", e);
            tracing::error!(error = %e, "Startup failed");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = app.perform(Intent::Start).await {
        tracing::warn!(error = %e, "Start intent failed");
    }
    app.settle().await;

    let screen = app.current_screen();
    match app.session() {
        Some(session) => {
            let state = app.controllers().home.state();
            let cart = app.cart().items().await;
            let totals = summarize(&cart, 0.0);
            tracing::info!(
                screen = screen.route_name(),
                email = %session.email,
                role = %session.role,
                home = state.label(),
                products = state.data().map(|d| d.products.len()).unwrap_or(0),
                cart_lines = cart.len(),
                "Session restored"
            );
            if let Some(error) = state.error() {
                eprintln!("{}: {} ({})", screen.title(), error.message, error.code());
            } else {
                println!("{}: signed in as {} ({})", screen.title(), session.email, session.role);
            }
            if let Some(weather) = state
                .data()
                .and_then(|d| d.insights.as_ref())
                .and_then(|i| i.weather.ready())
            {
                println!("Weather: {:.1}°C, {}", weather.temperature_c, weather.description);
            }
            if !cart.is_empty() {
                println!("Cart: {} line(s), total {}", cart.len(), format_price(totals.total));
            }
        }
        None => {
            tracing::info!(screen = screen.route_name(), "No stored session");
            println!("{}: not signed in", screen.title());
        }
    }

    ExitCode::SUCCESS
}
