mod fixtures;
pub use fixtures::*;

#[allow(unused_imports)]
// Re-export commonly used types from meter_reader for tests
pub use meter_reader::{
    DialColor, DialRegion, EnhanceProfile, MeterConfig, MeterReader, Overlay, ReadError,
    RecognitionCandidate, Recognizer, Region,
};
