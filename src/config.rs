use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model_dir: PathBuf,
    pub bind: SocketAddr,
    /// Log every assembled and scaled feature row at info level.
    pub log_vectors: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let ip: IpAddr = env::var("BIND_ADDR")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        Self {
            model_dir: env::var_os("PRICE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(resolve_model_dir),
            bind: SocketAddr::new(ip, port),
            log_vectors: env::var("LOG_PRED").ok().as_deref() == Some("1"),
        }
    }
}

/// Find `models/` next to the binary, one level up, or in the working directory.
fn resolve_model_dir() -> PathBuf {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    let candidates = [
        exe_dir.join("models"),
        exe_dir.join("..").join("models"),
        PathBuf::from("models"),
    ];

    for c in &candidates {
        if c.is_dir() {
            return c.clone();
        }
    }

    // Fallback; Artifacts::load reports the missing files
    PathBuf::from("models")
}
