// Command line / environment configuration for cutout-server.

use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024; // 16MB

/// Command line arguments for cutout-server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Hostname/IP to bind the server to.
    /// Use "*" to listen on all interfaces over IPv6 and IPv4 (dual-stack).
    #[arg(long, env = "CUTOUT_SERVER_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to listen on.
    #[arg(short, long, env = "CUTOUT_SERVER_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "CUTOUT_SERVER_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    /// Directory served under /static.
    #[arg(long, env = "CUTOUT_SERVER_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Directory holding index.html.
    #[arg(long, env = "CUTOUT_SERVER_TEMPLATES_DIR", default_value = "templates")]
    pub templates_dir: PathBuf,

    /// Path to the U2-Net ONNX model.
    /// Defaults to ~/.u2net/u2net.onnx.
    #[arg(long, env = "CUTOUT_SERVER_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Maximum log level (trace, debug, info, warn, error).
    #[arg(long, env = "CUTOUT_SERVER_LOG_LEVEL", default_value = "info")]
    pub log_level: Level,
}

impl AppConfig {
    pub fn model_path(&self) -> PathBuf {
        self.model_path.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|home| home.join(".u2net").join("u2net.onnx"))
                .unwrap_or_else(|| PathBuf::from("models").join("u2net.onnx"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::try_parse_from(["cutout-server"]).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.static_dir, PathBuf::from("static"));
        assert_eq!(config.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.log_level, Level::INFO);
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = AppConfig::try_parse_from([
            "cutout-server",
            "--host",
            "*",
            "-p",
            "8080",
            "--max-upload-bytes",
            "1024",
            "--model-path",
            "/opt/models/u2netp.onnx",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(config.host, "*");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(
            config.model_path(),
            PathBuf::from("/opt/models/u2netp.onnx")
        );
        assert_eq!(config.log_level, Level::DEBUG);
    }

    #[test]
    fn test_default_model_path_is_u2net() {
        let config = AppConfig::try_parse_from(["cutout-server"]).unwrap();
        if config.model_path.is_none() {
            assert!(config.model_path().ends_with("u2net.onnx"));
        }
    }

    #[test]
    fn test_rejects_invalid_port() {
        assert!(AppConfig::try_parse_from(["cutout-server", "--port", "70000"]).is_err());
    }
}
