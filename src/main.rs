use sse_hub::startup::{Config, build_router};
use sse_hub::{Hub, HubConfig};

#[macro_use]
extern crate tracing;

#[tokio::main]
async fn main() {
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "INFO");
        }
    }
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("Invalid configuration");

    let hub = Hub::new(HubConfig {
        mailbox_capacity: config.mailbox_capacity,
    });

    let app = build_router(hub.clone());

    info!("listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Unable to spawn tcp listener");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await
        .expect("Server error");
}

/// Waits for Ctrl-C, then ends every open stream so graceful shutdown can finish.
async fn shutdown_signal(hub: Hub) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("shutting down");
    let _ = hub.disconnect_all();
    let _ = hub.shutdown();
}
