#![forbid(unsafe_code)]

pub mod capture;
pub mod config;
pub mod content;
pub mod foundation;
pub mod history;
pub mod logging;
pub mod model;
pub mod naming;
pub mod render;
pub mod studio;

pub use capture::{CaptureEngine, CaptureState, ContainerFormat, RecordingOutcome, VideoArtifact};
pub use config::AppConfig;
pub use content::{ContentProvider, FixedProvider, GeminiProvider};
pub use foundation::core::{Fps, Frame, Size};
pub use foundation::error::{CardError, CardResult};
pub use history::{History, HistoryItem, HistoryRepository, JsonFileRepository};
pub use model::card::{CardData, Field, TraitSection, UserInput};
pub use model::category::{Animal, BloodType, Mbti, Style, Zodiac};
pub use naming::{export_file_name, export_stem};
pub use render::{CaptureSurface, CardRenderer, CardSurface, LayerKind, RasterizeOpts};
pub use studio::{GenerationState, Studio};
