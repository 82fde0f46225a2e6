//! # facecheck
//!
//! Client side of a face-recognition attendance kiosk. Captures camera
//! frames, posts them to a recognition API, and renders, filters and
//! exports the attendance records that API returns.
//!
//! ## Modules
//!
//! - [`camera`]: frame sources and JPEG/base64 capture
//! - [`client`]: HTTP client for the recognition endpoint
//! - [`records`]: record collections, filters, stats and CSV export
//! - [`settings`]: persisted kiosk preferences
//! - [`presenter`]: status line, loading overlay and recent activity
//! - [`sound`]: outcome tones
//! - [`kiosk`]: action wiring, validation, keyboard shortcuts and clock
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use facecheck::{AttendanceClient, Config, FileSource, FileStore, Kiosk};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let client = Arc::new(AttendanceClient::new(&config.api)?);
//!     let store = Box::new(FileStore::open(&config.settings.path)?);
//!     let device = config.camera.device.clone();
//!
//!     let mut kiosk = Kiosk::new(config, client, store, None);
//!     kiosk.attach_camera(Box::new(FileSource::new(device)));
//!
//!     kiosk.capture_attendance().await;
//!     println!("{}", kiosk.presenter().current().message);
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod client;
pub mod config;
pub mod kiosk;
pub mod presenter;
pub mod records;
pub mod session;
pub mod settings;
pub mod sound;

pub use camera::{Camera, CameraError, Constraints, FileSource, FrameSource, StaticSource};

pub use client::{
    AttendanceApi, AttendanceClient, CaptureResponse, ClientError, RecordsResponse,
    RegistrationRequest, RegistrationResponse,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use kiosk::{Action, Clock, Focus, KeyEvent, KeyOutcome, Kiosk, Modal};

pub use presenter::{LoadingOverlay, RecentActivity, Status, StatusKind, StatusPresenter};

pub use records::{
    Admin, AttendanceRecord, DateFilter, Personal, Provenance, RecordCollection, RecordsError,
};

pub use session::{ProcessingGuard, SessionState};

pub use settings::{Appearance, CameraQuality, FileStore, MemoryStore, PreferenceStore, Settings};

pub use sound::{AudioOutput, Notifier, Outcome, Silent, TerminalBell, Tone};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`. `logging.format = "json"` switches
/// to JSON lines; anything else is the human-readable format.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("facecheck={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
