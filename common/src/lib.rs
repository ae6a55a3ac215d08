//! PawMatch Common Library
//!
//! CLIとWeb(WASM)で共有される型とロジック

pub mod types;
pub mod error;
pub mod config;
pub mod parser;
pub mod webhook;
pub mod form;
pub mod geolocation;
pub mod map;
pub mod presentation;
pub mod notice;
pub mod page;

pub use types::{is_image_content_type, Coordinates, DogStatus, MatchRecord, Photo, Report, SubmissionResult};
pub use error::{Error, Result};
pub use config::BackendConfig;
pub use parser::{extract_message, parse_message, parse_response};
pub use webhook::{FormField, PhotoTransport, WebhookForm};
pub use form::{ReportDraft, ValidationError};
pub use geolocation::{GeoErrorKind, GeolocationState, PermissionState, POSITION_OPTIONS};
pub use map::{MapEvent, MarkerController};
pub use presentation::MatchCard;
pub use notice::{Notice, NoticeVariant};
pub use page::{PageState, Stage};
