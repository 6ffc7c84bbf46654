// dpiscope-api: Async client for the UniFi controller's legacy API,
// plus extraction of the DPI category/application name maps the
// controller only ships inside its web console assets.

pub mod config;
pub mod dpimap;
pub mod enrich;
pub mod error;
pub mod session;
pub mod transport;

pub use config::ControllerConfig;
pub use dpimap::{TrafficMap, TrafficMapExtractor, UNLISTED};
pub use enrich::enrich_dpi_stats;
pub use error::{Error, ExtractionError};
pub use session::{DpiGroupBy, ElementType, Interval, SessionClient, StatRequest};
pub use transport::{TlsMode, TransportConfig};
