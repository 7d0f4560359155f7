use std::path::Path;

use rmcs::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let bind = std::env::var("RMCS_BIND").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    // RMCS_CONFIG names a JSON file; RMCS_SEED overrides its seed.
    let mut config = match std::env::var("RMCS_CONFIG") {
        Ok(path) => load_engine_config(Path::new(&path))?,
        Err(_) => EngineConfig::default(),
    };
    if let Ok(raw) = std::env::var("RMCS_SEED") {
        config.seed = Some(raw.parse::<u64>()?);
    }

    let server = Server::builder()
        .bind(&bind)
        .engine_config(config)
        .build()
        .await?;
    tracing::info!(addr = %server.local_addr()?, "raja-mantri-chor-sipahi server listening");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "could not listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        })
        .await?;
    Ok(())
}

/// Reads an [`EngineConfig`] from a JSON file. Keys left out keep their
/// defaults.
fn load_engine_config(path: &Path) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let config: EngineConfig = serde_json::from_str(&raw)?;
    tracing::info!(path = %path.display(), ?config, "engine config loaded");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rmcs-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_engine_config_reads_json() {
        let path = write_temp("full.json", r#"{"room_code_len": 8, "seed": 42}"#);
        let config = load_engine_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(
            config,
            EngineConfig {
                room_code_len: 8,
                seed: Some(42),
            }
        );
    }

    #[test]
    fn test_load_engine_config_defaults_missing_keys() {
        let path = write_temp("partial.json", "{}");
        let config = load_engine_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_load_engine_config_rejects_bad_json() {
        let path = write_temp("bad.json", "room_code_len = 8");
        let result = load_engine_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn test_load_engine_config_missing_file() {
        let path = std::env::temp_dir().join("rmcs-no-such-config.json");
        assert!(load_engine_config(&path).is_err());
    }
}
