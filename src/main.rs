use qr_admin_api::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SUPABASE_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Using Supabase project at {}", config.supabase_url);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 QR admin API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.expect("server");
}
