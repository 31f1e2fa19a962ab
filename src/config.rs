use std::{env, net::SocketAddr, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

/// Runtime settings read from `PORT` and `APP_DATA_PATH`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_values(env::var("PORT").ok(), env::var("APP_DATA_PATH").ok())
    }

    fn from_values(port: Option<String>, data_path: Option<String>) -> Self {
        let port = port
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = data_path
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        Self { port, data_path }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
