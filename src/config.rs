// Server configuration: command-line flags with environment fallbacks.

use crate::inventory::OverflowPolicy;
use clap::Parser;
use std::net::SocketAddr;

#[derive(Debug, Clone, Parser)]
#[command(name = "warehouse-server", about = "Warehouse inventory tracker - web server")]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "WAREHOUSE_ADDR", default_value = "0.0.0.0:3000")]
    pub addr: SocketAddr,

    /// How to treat amounts that do not fit: clamp or pass-through
    #[arg(long, env = "WAREHOUSE_POLICY", default_value = "clamp")]
    pub policy: OverflowPolicy,

    /// Tracing filter directive
    #[arg(long = "log", env = "RUST_LOG", default_value = "info")]
    pub log_filter: String,

    /// Start with the demo storages already registered
    #[arg(long)]
    pub seed_demo: bool,
}

impl ServerConfig {
    /// Parse from the process arguments and environment
    pub fn load() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["warehouse-server"]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.policy, OverflowPolicy::Clamp);
        assert!(!config.seed_demo);
    }

    #[test]
    fn test_flags() {
        let config = ServerConfig::try_parse_from([
            "warehouse-server",
            "--addr",
            "127.0.0.1:8080",
            "--policy",
            "pass-through",
            "--seed-demo",
        ])
        .unwrap();

        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.policy, OverflowPolicy::PassThrough);
        assert!(config.seed_demo);
    }

    #[test]
    fn test_bad_policy_rejected() {
        assert!(ServerConfig::try_parse_from(["warehouse-server", "--policy", "maybe"]).is_err());
    }
}
