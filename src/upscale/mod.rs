//! Batch front-end for the Real-ESRGAN ncnn command-line upscaler

pub mod batch;
pub mod collect;
pub mod job;
pub mod probe;
pub mod run_log;
pub mod runner;

pub use batch::run_batch;
pub use collect::{collect_images, IMAGE_EXTENSIONS};
pub use job::{Scale, UpscaleJob, ValidatedJob, MODELS, SCALE_LABELS};
pub use probe::supports_scale_arg;
pub use run_log::RunLog;
pub use runner::{Invocation, ProcessRunner, ToolRunner};
