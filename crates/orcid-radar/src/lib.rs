//! orcid-radar
//!
//! Finds publications likely authored by a researcher but not yet linked to
//! their ORCID. Queries the Europe PMC search service, seeds a collaboration
//! profile from the ORCID's confirmed papers, then iterates over the
//! unlabeled candidate pool with two alternating passes (identifier
//! propagation and scored attribution) until no further papers can be
//! confidently attributed.
//!
//! Attribution is best-effort, not ground truth: name collisions are an
//! accepted source of false positives and negatives.
//!
//! # Example
//!
//! ```no_run
//! use orcid_radar::{EuropePmcClient, config::Config, engine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = EuropePmcClient::new(Config::from_env()?)?;
//!     let report = engine::run(&client, "0000-0002-1825-0097").await?;
//!     println!("{}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod normalize;
pub mod report;

pub use client::EuropePmcClient;
pub use config::Config;
pub use error::{ClientError, EngineError};
pub use report::AttributionReport;
