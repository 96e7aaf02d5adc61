use clap::Parser;
use env_logger::Builder;
use log::{error, info, LevelFilter};
use std::io::Write;
use std::sync::Arc;

use foto_gateway::config::{Args, GatewayConfig};
use foto_gateway::net::bootstrap;
use foto_gateway::photos::PhotoStore;
use foto_gateway::proxy::ProxyState;
use foto_gateway::router::{self, AppState};
use foto_gateway::share::{ShareConnectionManager, KEEPALIVE_INTERVAL};

fn init_logger() {
    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() {
    init_logger();

    if let Err(e) = run().await {
        error!("❌ Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = GatewayConfig::from_env(&args)?;

    // The share connects concurrently with the server coming up; failures
    // are logged and retried, never fatal.
    let share = Arc::new(ShareConnectionManager::new(&config.share));
    share.spawn_keepalive(KEEPALIVE_INTERVAL);

    let (listener, port) = bootstrap::bind_listener(config.http.start_port, config.http.max_port).await?;
    info!(
        "📡 Proxy running on http://localhost:{}/#/tate/tarjeta/fotos",
        port
    );

    let photos = PhotoStore::new(config.share.mount_path.clone(), Arc::clone(&share));
    let proxy = ProxyState::new(&config.proxy)?;
    let app = router::build(Arc::new(AppState { photos, proxy }));

    axum::serve(listener, app).await?;
    Ok(())
}
