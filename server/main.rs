use actix_files::Files;
use actix_web::{App, HttpServer, middleware};
use std::env;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "./dist";
const DEFAULT_DATA_DIR: &str = "./data";

/// Where to listen and which directories to serve
#[derive(Debug, Clone, PartialEq)]
struct ServerConfig {
    port: u16,
    dist_dir: String,
    data_dir: String,
}

impl ServerConfig {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: var("PORT")
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            dist_dir: var("DIST_DIR").unwrap_or_else(|| DEFAULT_DIST_DIR.to_string()),
            data_dir: var("DATA_DIR").unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = ServerConfig::from_vars(|key| env::var(key).ok());
    log::info!(
        "Serving {} at / and {} at /data on 0.0.0.0:{}",
        config.dist_dir,
        config.data_dir,
        config.port
    );

    let port = config.port;
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            // /data goes before the catch-all
            .service(Files::new("/data", &config.data_dir))
            .service(Files::new("/", &config.dist_dir).index_file("index.html"))
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(|_| None);
        assert_eq!(config.port, 8080);
        assert_eq!(config.dist_dir, "./dist");
        assert_eq!(config.data_dir, "./data");
    }

    #[test]
    fn test_overrides_and_bad_port() {
        let config = ServerConfig::from_vars(|key| match key {
            "PORT" => Some("not-a-port".to_string()),
            "DATA_DIR" => Some("/srv/rail".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, "/srv/rail");
    }
}
