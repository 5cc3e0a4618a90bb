pub mod assemble;
pub mod config;
pub mod detection;
pub mod error;
pub mod history;
pub mod models;
pub mod overlay;
pub mod pipeline;
pub mod reconcile;

pub use assemble::{assemble, DigitString};
pub use config::{AnalogProfile, EnhanceProfile, MeterConfig, PostprocessingConfig};
pub use detection::{DialReader, DigitReader, OcrsRecognizer, Recognizer};
pub use error::{ReadError, Result};
pub use models::{DialColor, DialReading, DialRegion, Reading, RecognitionCandidate, Region};
pub use overlay::Overlay;
pub use pipeline::{load_image, DebugConfig, MeterReader, ReadOutcome, Stage};
pub use reconcile::reconcile;
