use minipool_preflight::{
    chain::EthersChainClient,
    config::Config,
    OwnerMode, PreflightValidator,
};
use ethers::providers::{Http, Provider};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// The main entry point for the pre-flight validator.
///
/// This function loads the configuration, initializes logging, connects to
/// the execution layer RPC, and validates the configured minipools. A JSON
/// summary is printed to stdout on success.
#[tokio::main] // Marks the async main function to be run by the Tokio runtime.
async fn main() -> anyhow::Result<()> {
    // Config path is the only argument; fall back to the bundled default.
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());
    let config = Config::load(&path)?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_target(false)
        .init();
    info!("Pre-flight validator starting with config: {:?}", config);

    let provider = Provider::<Http>::try_from(config.rpc.url.as_str())?;
    let client = EthersChainClient::new(Arc::new(provider));

    let mut request = config.request();
    info!(
        "Checking {} minipools in {:?} mode",
        request.minipools.len(),
        OwnerMode::for_request(&request)
    );

    // Ctrl-C aborts the run between or during RPC reads
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling validation");
            on_interrupt.cancel();
        }
    });

    // pacing comes from the request's rate_limit_ms
    let validator = PreflightValidator::unpaced(client);
    match validator.validate(&mut request, &cancel).await {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(e) => {
            error!("Pre-flight validation failed: {}", e);
            Err(e.into())
        }
    }
}
