use anyhow::{Context, Result, anyhow};
use std::fmt::Write as _;
use thesis::domain::config::ApiConfig;
use thesis_database::{Database, MigrationReport};
use tracing::info;

const MASK: &str = "********";

async fn connect(cfg: &ApiConfig, migrate: bool) -> Result<Database> {
    let db_cfg = &cfg.database;
    let mut builder = Database::builder()
        .url(&db_cfg.url)
        .session(&db_cfg.namespace, &db_cfg.database)
        .skip_migrations(!migrate);

    if let Some(creds) = &db_cfg.credentials {
        builder = builder.auth(&creds.username, &creds.password);
    }

    builder.init().await.context("Failed to establish database connection")
}

/// Mints a token for the active account registered under `email`.
pub(crate) async fn issue_token(cfg: &ApiConfig, email: &str) -> Result<String> {
    let db = connect(cfg, true).await?;
    let identity = thesis::features::identity::init(cfg, &db)
        .await
        .map_err(|e| anyhow!("Identity initialization failed: {e}"))?;

    let user = identity
        .users
        .find_by_email(email)
        .await
        .map_err(|e| anyhow!("{e}"))?
        .ok_or_else(|| anyhow!("No active account for {email}"))?;

    let token = identity.tokens.issue(&user.uid, user.role).map_err(|e| anyhow!("{e}"))?;
    info!(user = %user.uid, role = %user.role, "Token issued");
    Ok(token)
}

pub(crate) async fn migrate(cfg: &ApiConfig) -> Result<MigrationReport> {
    let db = connect(cfg, false).await?;
    db.migrate().await.context("Migration failed")
}

pub(crate) fn migration_summary(report: &MigrationReport) -> String {
    let mut out = format!("applied: {}, up to date: {}", report.applied.len(), report.skipped.len());
    for applied in &report.applied {
        let _ = write!(out, "\n  + {}/{}", applied.slice, applied.version);
    }
    out
}

/// Human-readable dump of the effective configuration. Secrets and
/// credentials never leave the process.
pub(crate) fn describe(cfg: &ApiConfig) -> String {
    let mut out = String::new();
    let server = &cfg.server;
    let _ = writeln!(out, "[server]\naddress = {}\nport = {}", server.address, server.port);
    let _ = writeln!(out, "tls = {}", server.ssl.is_some());

    let db = &cfg.database;
    let _ = writeln!(out, "\n[database]\nurl = {}\nnamespace = {}", db.url, db.namespace);
    let _ = writeln!(out, "database = {}", db.database);
    let _ = writeln!(
        out,
        "credentials = {}",
        db.credentials.as_ref().map_or("none".to_owned(), |c| format!("{} / {MASK}", c.username))
    );

    let jwt = &cfg.security.jwt;
    let _ = writeln!(out, "\n[security.jwt]\nsecret = {MASK}\nissuer = {}", jwt.issuer);
    let _ = writeln!(out, "ttl_seconds = {}", jwt.ttl_seconds);

    let mail = &cfg.mail;
    let _ = writeln!(out, "\n[mail]\nenabled = {}\nfrom = {}", mail.enabled, mail.from);

    let settings = &cfg.settings;
    let _ = writeln!(
        out,
        "\n[settings]\ncache_ttl_seconds = {}\ncache_capacity = {}",
        settings.cache_ttl_seconds, settings.cache_capacity
    );
    let _ = write!(out, "\n[logging]\nlevel = {}", cfg.logging.level);
    out
}
