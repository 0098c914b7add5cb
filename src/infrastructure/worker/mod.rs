//! Worker Layer - 顺序批处理
//!
//! 实现 BatchWorker 及各子命令的批处理任务

mod batch_worker;
mod jobs;

pub use batch_worker::{
    BatchFailure, BatchJob, BatchSummary, BatchWorker, BatchWorkerConfig,
};
pub use jobs::{ConvertJob, FetchJob, MixJob};
