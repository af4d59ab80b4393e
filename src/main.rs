use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pyquest::auth::JwtKeys;
use pyquest::config::Config;
use pyquest::state::AppState;
use pyquest::tutor::TutorClient;
use pyquest::{content, db, routes};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pyquest=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();

    let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

    {
        let conn = pool.lock().expect("Database lock failed during startup");
        let seeded = db::levels::upsert_seed_levels(&conn, &content::seed_levels())
            .expect("Failed to seed levels");
        tracing::info!("Applied {} seed levels", seeded);
    }

    let tutor = TutorClient::from_env();
    if tutor.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; AI tutor will serve fallback replies");
    }

    let state = AppState::new(pool, JwtKeys::new(&config.secret_key), tutor);
    let app = routes::build_router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

    tracing::info!("Server running on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
