//! Heuristic segmentation of extracted text into document structure.

mod classify;
mod options;
mod segmenter;
mod tables;

pub use classify::{classify, LineClass, LineContext};
pub use options::SegmentOptions;
pub use segmenter::Segmenter;
pub use tables::{DetectedTable, TableDetector, TableDetectorConfig};
