//! # Sansay Exporter
//!
//! A Prometheus metrics exporter for Sansay VSXi softswitches.
//!
//! ## Overview
//!
//! Each scrape fetches the switch's XML status dump, parses its
//! `mysqldump`-shaped table structure and republishes:
//!
//! - every numeric field of `system_stat` as `sansay_<field>`
//! - eight counters per trunk group of `XBResourceRealTimeStatList` as
//!   `sansay_trunk_<counter>{trunkgroup, alias}`
//! - the duration of the scrape as `sansay_scrape_duration_seconds`
//!
//! A value that cannot be read only costs that value; the rest of the scrape
//! goes on.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sansay_exporter::{client::SansayClient, config::Settings, server::start_server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = Settings::load(Some("config/default.toml"))?;
//!     let client = SansayClient::new(settings.sansay)?;
//!
//!     start_server(&settings.exporter.listen_address, std::sync::Arc::new(client)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`client`] - HTTP fetch of the status document
//! - [`document`] - XML parsing into databases, tables, rows and fields
//! - [`record`] - by-name access to trunk records
//! - [`projector`] - mapping of tables onto samples
//! - [`collector`] - one scrape cycle end to end
//! - [`metrics`] - samples and their Prometheus text rendering
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`server`] - HTTP server for exposing metrics

pub mod client;
pub mod collector;
pub mod config;
pub mod document;
pub mod error;
pub mod metrics;
pub mod projector;
pub mod record;
pub mod server;

pub use error::{Result, SansayError};
