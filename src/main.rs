use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use marko::{
    AppState,
    config::Config,
    database::PgStore,
    fanout::membership::reconcile_creator_memberships,
    infrastructure::{ExpoPushSender, JwtVerifier, LogPushSender, PushSender},
    routes,
};
use sqlx::Executor;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // 初始化日志，开发环境默认 debug
    let default_filter = if config.is_development() { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(environment = %config.environment, "Starting marko backend");

    // 设置数据库连接池
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                conn.execute("SET application_name = 'marko_backend';")
                    .await?;
                Ok(())
            })
        })
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    let store = Arc::new(PgStore::new(pool));

    // 推送：未开启时只打日志
    let push: Arc<dyn PushSender> = if config.expo_push_enabled {
        tracing::info!(url = %config.expo_push_url, "Expo push delivery enabled");
        Arc::new(
            ExpoPushSender::new(
                config.expo_push_url.clone(),
                config.expo_access_token.clone(),
                config.push_timeout(),
            )
            .expect("Failed to build push client"),
        )
    } else {
        tracing::info!("Expo push delivery disabled, notifications will only be logged");
        Arc::new(LogPushSender)
    };

    let verifier = Arc::new(JwtVerifier::new(
        &config.jwt_secret,
        config.jwt_audience.as_deref(),
    ));

    // 设置应用状态
    let state = AppState::new(store.clone(), verifier, push, config.fanout_concurrency);

    if let Some(interval) = config.reconcile_interval() {
        tracing::info!(interval_secs = interval.as_secs(), "Starting creator membership reconciliation");
        tokio::spawn(reconcile_creator_memberships(store, interval));
    }

    let router = routes::app(state);

    // 开发环境允许所有来源
    let app = if config.is_development() {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    // 启动服务器
    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to 0.0.0.0");
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Failed to start server");

    tracing::info!("Server exited");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down gracefully");
}
