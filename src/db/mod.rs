use crate::config::Config;
use crate::types::ApiError;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection};
use diesel::sqlite::SqliteConnection;
use diesel::QueryResult;
use rocket::http::Status;
use rocket::request::{self, FromRequest, Outcome, Request};
use rocket::State;
use tokio::task;

pub mod lookup;
pub mod schema;

// An alias to the type for a pool of Diesel SQLite connections.
pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// Each connection to `:memory:` opens its own empty database.
pub const MEMORY: &str = ":memory:";

static CREATE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS topics (
    slug TEXT PRIMARY KEY NOT NULL,
    description TEXT NOT NULL,
    img_url TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    avatar_url TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS articles (
    article_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    title TEXT NOT NULL,
    topic TEXT NOT NULL REFERENCES topics(slug) ON DELETE CASCADE,
    author TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    body TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    votes INTEGER NOT NULL DEFAULT 0,
    article_img_url TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    article_id INTEGER NOT NULL REFERENCES articles(article_id) ON DELETE CASCADE,
    body TEXT NOT NULL,
    votes INTEGER NOT NULL DEFAULT 0,
    author TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS comments_article_id_idx ON comments (article_id);
";

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        Parse(::std::num::ParseIntError);
        R2D2(::r2d2::Error);
        Diesel(::diesel::result::Error);
    }
}

/// SQLite leaves foreign keys off per connection; cascades depend on them.
#[derive(Debug)]
struct ForeignKeys;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ForeignKeys {
    fn on_acquire(
        &self,
        conn: &mut SqliteConnection,
    ) -> ::std::result::Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn build_pool(database_url: &str, size: u32) -> Result<Pool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let mut builder = Pool::builder()
        .max_size(size)
        .connection_customizer(Box::new(ForeignKeys));
    if database_url == MEMORY {
        builder = builder.max_size(1).idle_timeout(None).max_lifetime(None);
    }
    Ok(builder.build(manager)?)
}

/// Builds the pool and makes sure the tables exist.
pub fn init_pool(config: &Config) -> Result<Pool> {
    let pool = build_pool(&config.database_url, config.pool_size)?;
    let mut conn = pool.get()?;
    create_schema(&mut conn)?;
    log::info!(
        "database pool ready: {} ({} connections)",
        config.database_url,
        pool.max_size()
    );
    drop(conn);
    Ok(pool)
}

pub fn create_schema(conn: &mut SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(CREATE_SCHEMA)
}

/// Handle to the managed pool. Diesel is synchronous, so every statement
/// runs on the blocking thread pool with its own pooled connection.
#[derive(Clone)]
pub struct Db(Pool);

impl Db {
    pub fn new(pool: Pool) -> Db {
        Db(pool)
    }

    pub async fn run<F, T>(&self, f: F) -> ::std::result::Result<T, ApiError>
    where
        F: FnOnce(&mut SqliteConnection) -> ::std::result::Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.0.clone();
        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut *conn)
        })
        .await?
    }
}

/// Retrieves the pool managed by Rocket. If no pool is managed, fails with
/// an `InternalServerError` status.
#[rocket::async_trait]
impl<'r> FromRequest<'r> for Db {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Db, ()> {
        match request.guard::<&State<Pool>>().await {
            Outcome::Success(pool) => Outcome::Success(Db(pool.inner().clone())),
            _ => Outcome::Error((Status::InternalServerError, ())),
        }
    }
}
