use agrimarket::api::router::create_router;
use agrimarket::config::{AppConfig, LogFormat};
use agrimarket::{db, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(agrimarket::config::log_format_from_env());

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    if config.run_migrations {
        db::run_migrations(&pool).await?;
        tracing::info!("Migrations applied");
    }

    if config.api_token.is_none() {
        tracing::warn!("API_TOKEN is not set, /api routes are open");
    }

    let analysis = config.analysis;
    tracing::info!(
        base_rate = analysis.transport.base_rate_per_km,
        weight_factor = analysis.transport.weight_factor_per_kg_km,
        avg_speed_kmh = analysis.spoilage.avg_speed_kmh,
        default_price = analysis.default_price_per_kg,
        "Analysis constants loaded"
    );

    let metrics_handle = agrimarket::metrics::init_metrics()?;
    let state = AppState::new(pool, config, metrics_handle);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}
