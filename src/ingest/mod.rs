mod id;
mod pipeline;

pub use pipeline::{Pipeline, RunPipeline, RunStats};
