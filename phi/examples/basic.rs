//! Run with `RUST_LOG=phi_container=trace cargo run -p phi --example basic`.

use std::sync::Arc;

use phi::prelude::*;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

struct Config {
    url: String,
}

struct Database {
    config: Arc<Config>,
}

struct UserRepository {
    db: Arc<Database>,
    table: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let container = Container::builder()
        .register_type(
            TypeDescriptor::new("Config")
                .param("url")
                .constructor(|v| Ok(Config { url: v.str(0)?.to_string() })),
        )
        .register_type(
            TypeDescriptor::new("Database")
                .param_typed("config", "Config")
                .constructor(|v| Ok(Database { config: v.object(0)? })),
        )
        .register_type(
            TypeDescriptor::new("UserRepository")
                .param_typed("db", "Database")
                .param("table")
                .constructor(|v| {
                    Ok(UserRepository {
                        db: v.object(0)?,
                        table: v.str(1)?.to_string(),
                    })
                }),
        )
        .build();

    let config = container.make("Config", Arguments::new().with("postgres://localhost/app"))?;
    container.bind("Config", config);
    container.bind("db", "Database");

    let users: Arc<UserRepository> =
        container.make_as("UserRepository", Arguments::new().with_named("table", "users"))?;
    info!(table = %users.table, url = %users.db.config.url, "Repository ready");

    if let Err(err) = container.resolve("UserRepo") {
        warn!("{err}");
    }

    Ok(())
}
