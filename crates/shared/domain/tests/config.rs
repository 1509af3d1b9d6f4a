use serde_json::json;
use thesis_domain::config::{ApiConfig, DatabaseConfig, MailConfig, ServerConfig};

#[test]
fn config_defaults_are_sane() {
    let server = ServerConfig::default();
    assert_eq!(server.port, 4583);
    assert!(server.ssl.is_none());

    let db = DatabaseConfig::default();
    assert_eq!(db.url, "mem://");
    assert_eq!(db.namespace, "thesis");
    assert!(db.credentials.is_none());

    assert!(!MailConfig::default().enabled);
}

#[test]
fn api_config_deserializes_partial_sections() {
    let raw = json!({
        "server": { "address": "::", "port": 8080 },
        "database": { "url": "ws://db:8000", "namespace": "n", "database": "d" },
        "security": { "jwt": { "secret": "s3cret", "issuer": "uni" } },
        "settings": { "cache_ttl_seconds": 10 }
    });

    let cfg: ApiConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.server.port, 8080);
    assert_eq!(cfg.database.url, "ws://db:8000");
    assert_eq!(cfg.security.jwt.issuer, "uni");
    assert_eq!(cfg.security.jwt.ttl_seconds, 3600);
    assert_eq!(cfg.settings.cache_ttl_seconds, 10);
    assert_eq!(cfg.settings.cache_capacity, 64);
    assert_eq!(cfg.logging.level, "info");
}

#[test]
fn api_config_clones_share_until_mutated() {
    let base = ApiConfig::default();
    let mut changed = base.clone();
    changed.server.port = 9000;
    assert_eq!(base.server.port, 4583);
    assert_eq!(changed.server.port, 9000);
}
