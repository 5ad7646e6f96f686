//! Episode driving, training and evaluation pipelines

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{EpisodeConfig, EpisodeResult, run_episode};
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver, SharedObserver};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};
