use std::net::SocketAddr;
use std::path::PathBuf;

use crate::LocationSet;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// CSV file the store is seeded from at startup.
    pub data_path: PathBuf,
    /// Replacement polarity lexicon; `None` uses the built-in one.
    pub lexicon_path: Option<PathBuf>,
    pub allowed_locations: LocationSet,
}
