mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use hubwatch::{Controller, HttpTransport, LogWriter, RpcChannels, Subscribe};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for human-readable logs
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or(
                EnvFilter::default()
                    .add_directive("info".parse()?)
                    .add_directive("hyper=error".parse()?)
                    .add_directive("reqwest=error".parse()?),
            ),
        )
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(fmt::format().compact().with_target(false)),
        )
        .init();

    let cli = Cli::parse();
    let cfg = cli.config();
    debug!("{:#?}", cfg);

    let transport = HttpTransport::new()?;
    let relay = Arc::new(RpcChannels::new(&transport, cli.relay_url.as_str(), cfg.http_timeout));
    let subscribers: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];

    info!(hub = %cfg.hub_url, relay = %cli.relay_url, "starting hub watch");
    let controller = Controller::builder(cfg)
        .with_transport(Arc::new(transport))
        .with_channels(relay.clone(), relay)
        .with_subscribers(subscribers)
        .build()?;

    let token = CancellationToken::new();
    let handle = controller.handle();
    let run = tokio::spawn(controller.run(token.clone()));

    let hangups = tokio::spawn(hubwatch::forward_hangups(handle, token.clone()));

    if let Err(e) = hubwatch::wait_for_shutdown_signal().await {
        warn!(error = %e, "signal registration failed, shutting down");
    }
    info!("shutdown requested");
    token.cancel();

    run.await?;
    if let Ok(Err(e)) = hangups.await {
        warn!(error = %e, "SIGHUP forwarding unavailable");
    }
    Ok(())
}
