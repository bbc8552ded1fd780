use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Server settings. Every flag can also come from the environment.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "chess_session_server", about = "Two-player chess sessions over line-delimited TCP")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CHESS_BIND", default_value = DEFAULT_BIND)]
    pub bind: String,

    /// Directory for completed-game JSON files; games stay in memory when unset
    #[arg(long, env = "CHESS_ARCHIVE_DIR")]
    pub archive_dir: Option<PathBuf>,

    /// Longest accepted inbound line in bytes
    #[arg(long, env = "CHESS_MAX_LINE", default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    pub max_line_length: usize,

    /// Default log filter, `RUST_LOG` takes precedence
    #[arg(long, env = "CHESS_LOG", default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: DEFAULT_BIND.to_string(),
            archive_dir: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}
