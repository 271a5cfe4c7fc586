/// Configuration management for AutoFlow Hub
/// 
/// Handles server configuration, catalog database location, and the workflow library directory.

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration  
    pub database: DatabaseConfig,
    /// Workflow library used by the importer
    pub library: LibraryConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
    /// Storefront origin allowed by CORS (e.g., "http://localhost:3000")
    pub cors_origin: String,
}

/// Catalog database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]  
pub struct DatabaseConfig {
    /// SQLite file holding the workflows and purchases tables (default: "data/autoflow.db")
    pub path: String,
}

/// Workflow library configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Directory scanned for n8n workflow exports (*.json)
    pub dir: String,
}

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("AUTOFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("AUTOFLOW_PORT")
                    .unwrap_or_else(|_| "3001".to_string())
                    .parse()
                    .unwrap_or(3001),
                cors_origin: std::env::var("AUTOFLOW_CORS_ORIGIN")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            },
            database: DatabaseConfig {
                path: std::env::var("AUTOFLOW_DB_PATH")
                    .unwrap_or_else(|_| "data/autoflow.db".to_string()),
            },
            library: LibraryConfig {
                dir: std::env::var("AUTOFLOW_LIBRARY_DIR")
                    .unwrap_or_else(|_| "workflows-library".to_string()),
            },
        }
    }
}

impl Config {
    /// Bind address in `host:port` form
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
