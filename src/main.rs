use news::config::Config;
use news::db;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let config = Config::from_env().expect("Failed to read configuration");
    let pool = db::init_pool(&config).expect("Failed to create database pool");
    news::rocket(pool).launch().await?;
    Ok(())
}
