//! # echoserver - Socle HTTP d'EchoWave
//!
//! - [`server`] : [`Server`] et son [`ServerBuilder`], qui assemblent les
//!   routers axum, publient les documents OpenAPI et gèrent l'arrêt sur Ctrl+C
//! - [`logs`] : subscriber `tracing` global, buffer de logs consultable en
//!   JSON ou en SSE, niveau réglable à chaud
//!
//! ```rust,no_run
//! use echoserver::{LoggingOptions, ServerBuilder};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut server = ServerBuilder::new("EchoWave", "localhost", 8080).build();
//!     server.init_logging(LoggingOptions::default()).await;
//!     server
//!         .add_route("/status", || async { serde_json::json!({"status": "ok"}) })
//!         .await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use logs::{LogState, LoggingOptions, SseLayer, log_dump, log_sse};
pub use server::{Server, ServerBuilder, ServerInfo};
