use std::path::Path;

use anyhow::{Context, Result};
use offramp_config::AppConfig;
use offramp_runtime::{serve, BackendServices};
use sqlx::Row;
use tempfile::TempDir;
use tokio::net::TcpListener;

fn sqlite_url(path: &Path) -> String {
    format!("sqlite://{}", path.to_string_lossy())
}

fn build_config(database_url: String, max_connections: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.database.url = database_url;
    config.database.max_connections = max_connections;
    config
}

async fn initialise(config: &AppConfig) -> Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

#[tokio::test(flavor = "multi_thread")]
async fn initialise_runs_migrations() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/init.db");
    let config = build_config(sqlite_url(&db_path), 4);

    let services = initialise(&config).await?;
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
    )
    .fetch_all(&services.db_pool)
    .await?;

    for table in ["users", "user_preferences", "weekly_plans", "user_swaps", "user_progress"] {
        assert!(tables.iter().any(|name| name == table), "missing table {table}");
    }
    assert!(!services.state.catalog.dishes().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn auth_is_configured_only_with_a_secret() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = build_config(sqlite_url(&temp_dir.path().join("auth.db")), 1);

    let services = initialise(&config).await?;
    assert!(!services.state.auth_service.is_configured());

    config.database.url = sqlite_url(&temp_dir.path().join("auth-configured.db"));
    config.auth.secret = Some("runtime-secret".to_string());
    let services = initialise(&config).await?;
    assert!(services.state.auth_service.is_configured());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_creates_sqlite_directory_if_missing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_dir = temp_dir.path().join("nested");
    let db_path = db_dir.join("prepared.db");
    let config = build_config(sqlite_url(&db_path), 2);

    assert!(!db_dir.exists());

    let _services = initialise(&config).await?;
    assert!(db_dir.exists(), "database directory should be created");
    assert!(db_path.exists(), "sqlite database file should be created");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_enables_sqlite_foreign_keys() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/foreign_keys.db");
    let config = build_config(sqlite_url(&db_path), 2);

    let services = initialise(&config).await?;

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(&services.db_pool)
        .await?;
    assert_eq!(1, enabled, "foreign key enforcement must be enabled");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn prepare_database_applies_max_connections_setting() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("runtime/max_conn.db");
    let max_connections = 3;
    let config = build_config(sqlite_url(&db_path), max_connections);

    let services = initialise(&config).await?;
    assert_eq!(
        max_connections,
        services.db_pool.options().get_max_connections()
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn memory_database_creates_no_files() -> Result<()> {
    let config = build_config("sqlite::memory:".into(), 4);
    let services = initialise(&config).await?;

    assert_eq!(1, services.db_pool.options().get_max_connections());

    let databases = sqlx::query("PRAGMA database_list")
        .fetch_all(&services.db_pool)
        .await?;
    let main_db = databases
        .into_iter()
        .find(|row| {
            row.try_get::<String, _>("name")
                .map(|name| name == "main")
                .unwrap_or(false)
        })
        .context("expected main in PRAGMA database_list")?;
    let file: String = main_db.try_get("file")?;
    assert!(
        file.is_empty(),
        "in-memory sqlite database should not create filesystem entries"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn serve_reports_bind_failures() -> Result<()> {
    let occupied = TcpListener::bind("127.0.0.1:0").await?;
    let port = occupied.local_addr()?.port();

    let mut config = build_config("sqlite::memory:".into(), 1);
    config.http.address = "127.0.0.1".to_string();
    config.http.port = port;

    let services = initialise(&config).await?;
    let error = serve(&config, services)
        .await
        .expect_err("port is already taken");
    assert!(
        format!("{error:#}").contains("failed to bind http listener"),
        "unexpected error {error:#}"
    );
    Ok(())
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_signal_resolves_on_sigterm() -> Result<()> {
    use std::time::Duration;
    use tokio::signal::unix::{signal, SignalKind};

    // Registering first keeps the default SIGTERM action from ending the test process.
    let mut guard = signal(SignalKind::terminate())?;

    let waiter = tokio::spawn(offramp_runtime::shutdown_signal());
    tokio::time::sleep(Duration::from_millis(200)).await;

    let status = std::process::Command::new("kill")
        .args(["-TERM", &std::process::id().to_string()])
        .status()?;
    assert!(status.success());

    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .context("shutdown_signal did not resolve on SIGTERM")??;
    guard.recv().await;
    Ok(())
}
