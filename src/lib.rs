//! Client-side catalog browser engine.
//!
//! Fetches app repository catalogs described in externally hosted JSON
//! documents, normalizes their heterogeneous shapes into a canonical item
//! list, and exposes searchable session state over both the source list and
//! the items of the currently open source.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use shopfront::{CatalogSession, Config, ResilientFetcher};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let sources = shopfront::registry::load_sources(&config.registry_path).await?;
//! let fetcher = Arc::new(ResilientFetcher::new(&config.proxy_base, config.timeout())?);
//!
//! let session = CatalogSession::new(sources, fetcher);
//! session.open_source(0).await?;
//! for item in session.filter_items("clock") {
//!     println!("{}", item.display_name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod fetch;
pub mod handoff;
pub mod normalize;
pub mod probe;
pub mod registry;
pub mod session;
pub mod types;
pub mod util;

pub use config::Config;
pub use error::{FetchError, LoadError, StrategyFailure};
pub use fetch::{CatalogFetcher, ResilientFetcher};
pub use handoff::{HelpTopic, InstallRequest};
pub use normalize::{normalize, DocumentShape};
pub use probe::AvailabilityProber;
pub use session::{CatalogSession, CatalogView, OpenOutcome, SessionError};
pub use types::{AvailabilityStatus, Item, Source};
