//! Chapter & Verse catalog server
//!
//! Storefront backend: catalog queries (filter, rank, suppress,
//! paginate), single-book lookups, availability checks, and a locally
//! persisted cart with theme preference.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod db;
pub mod logger;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::Server;
pub use state::ServerState;

/// Load environment, prepare the work directory and initialize logging
pub fn setup_environment() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(&config.work_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    logger::init_logger_with_file(log_level.as_deref(), config.log_dir.as_deref());
    Ok(())
}
