use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_name: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("MONGODB_URI")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .context("MONGODB_URI is not set")?;
        let database_name =
            std::env::var("MONGODB_DATABASE").unwrap_or_else(|_| "bandfinder".into());
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("PORT") {
            Ok(v) if !v.is_empty() => v
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value {v:?}"))?,
            _ => 8080,
        };
        Ok(Self {
            database_url,
            database_name,
            host,
            port,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
