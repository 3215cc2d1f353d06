use clap::Parser;
use color_eyre::eyre::{Context, Result};
use travelsage_relay::cli::App;
use travelsage_relay::{RelayConfig, RelayService, server};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    color_eyre::install()?;

    let app = App::parse();
    app.logging.init();

    let config = RelayConfig::try_from(&app.relay).wrap_err("invalid relay configuration")?;
    let service = RelayService::from_config(&config).wrap_err("failed to initialise the relay")?;

    let addr = app.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("failed to bind to {addr}"))?;

    server::serve(listener, service)
        .await
        .wrap_err("relay server error")
}
