use crate::db::Result;
use dotenv::dotenv;
use std::env;

pub const DEFAULT_POOL_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub pool_size: u32,
}

impl Config {
    /// Reads `DATABASE_URL` (required) and `DATABASE_POOL_SIZE`, after
    /// loading `.env` if there is one.
    pub fn from_env() -> Result<Config> {
        dotenv().ok();
        let database_url = env::var("DATABASE_URL")?;
        let pool_size = pool_size(env::var("DATABASE_POOL_SIZE").ok())?;
        Ok(Config {
            database_url,
            pool_size,
        })
    }
}

fn pool_size(raw: Option<String>) -> Result<u32> {
    match raw {
        Some(raw) => Ok(raw.trim().parse()?),
        None => Ok(DEFAULT_POOL_SIZE),
    }
}
