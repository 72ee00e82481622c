//! Brigade server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, seeds the bootstrap admin account if configured,
//! and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To print the argon2 PHC string for a password entered on stdin:
//!
//! ```
//! cargo run -p brigade-api --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use brigade_api::{
  AppState, ServerConfig,
  auth::{Argon2Encoder, AuthKeys},
};
use brigade_core::{
  mapper::PasswordEncoder,
  store::SchoolStore,
  user::{Role, UserDraft},
};
use brigade_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Brigade cooking-school server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let encoder: Arc<dyn PasswordEncoder> = Arc::new(Argon2Encoder);

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let hash = encoder
      .encode(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BRIGADE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let store = Arc::new(store);

  seed_bootstrap_admin(&server_cfg, store.as_ref(), encoder.as_ref()).await?;

  let state = AppState::new(
    Arc::clone(&store),
    encoder,
    AuthKeys::new(&server_cfg.jwt_secret, server_cfg.token_ttl_secs),
  );

  let app = brigade_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Create the configured admin account unless the username is already taken.
async fn seed_bootstrap_admin(
  cfg: &ServerConfig,
  store: &SqliteStore,
  encoder: &dyn PasswordEncoder,
) -> anyhow::Result<()> {
  let Some(admin) = &cfg.bootstrap_admin else { return Ok(()) };

  let existing = store
    .find_user_by_username(&admin.username)
    .await
    .context("bootstrap admin lookup failed")?;
  if existing.is_some() {
    return Ok(());
  }

  let password_hash = encoder
    .encode(&admin.password)
    .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
  store
    .insert_user(UserDraft {
      is_active: true,
      username: admin.username.clone(),
      password_hash,
      role: Role::Admin,
      vat: admin.vat.clone(),
    })
    .await
    .context("bootstrap admin insert failed")?;

  tracing::info!(username = %admin.username, "bootstrap admin created");
  Ok(())
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
