//! Batch Worker - 顺序批处理
//!
//! 逐项处理文章（或配音文件），项目之间、批次之间按配置停顿。
//! 单项失败只记录，不中断整批。

use async_trait::async_trait;
use std::fmt;
use std::time::{Duration, Instant};

use crate::application::error::ApplicationError;
use crate::domain::article::{ArticleRow, FailedArticle};

/// Worker 配置
#[derive(Debug, Clone)]
pub struct BatchWorkerConfig {
    /// 每批项目数
    pub batch_size: usize,
    /// 项目之间的停顿
    pub delay_between_items: Duration,
    /// 批次之间的停顿（取代该处的项目停顿）
    pub delay_between_batches: Duration,
}

impl Default for BatchWorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            delay_between_items: Duration::from_secs(5),
            delay_between_batches: Duration::from_secs(30),
        }
    }
}

/// 批处理中的单项任务
#[async_trait]
pub trait BatchJob<T: Send + Sync>: Send + Sync {
    /// 日志中显示的项目描述
    fn describe(&self, item: &T) -> String;

    async fn process(&self, item: &T) -> Result<(), ApplicationError>;
}

/// 失败项
#[derive(Debug)]
pub struct BatchFailure<T> {
    pub item: T,
    pub error: ApplicationError,
}

/// 批处理汇总
#[derive(Debug)]
pub struct BatchSummary<T> {
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<BatchFailure<T>>,
    pub elapsed: Duration,
}

impl<T> BatchSummary<T> {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// 成功率（百分比），空批次为 0
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 * 100.0 / self.total as f64
        }
    }

    pub fn log(&self, name: &str) {
        tracing::info!(
            job = name,
            total = self.total,
            succeeded = self.succeeded,
            failed = self.failed(),
            success_rate = %format!("{:.1}%", self.success_rate()),
            elapsed_secs = self.elapsed.as_secs(),
            "Batch finished"
        );
    }
}

impl BatchSummary<ArticleRow> {
    /// 失败文章清单
    pub fn failed_articles(&self) -> Vec<FailedArticle> {
        self.failures
            .iter()
            .map(|f| FailedArticle {
                row: f.item.clone(),
                reason: f.error.to_string(),
            })
            .collect()
    }
}

impl<T> fmt::Display for BatchSummary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} succeeded ({:.1}%), {} failed, {}s",
            self.succeeded,
            self.total,
            self.success_rate(),
            self.failed(),
            self.elapsed.as_secs()
        )
    }
}

/// 顺序批处理 Worker
pub struct BatchWorker {
    config: BatchWorkerConfig,
}

impl BatchWorker {
    pub fn new(config: BatchWorkerConfig) -> Self {
        Self { config }
    }

    /// 依次处理所有项目
    pub async fn run<T, J>(&self, items: &[T], job: &J) -> BatchSummary<T>
    where
        T: Clone + Send + Sync,
        J: BatchJob<T> + ?Sized,
    {
        let started = Instant::now();
        let total = items.len();
        let mut succeeded = 0;
        let mut failures = Vec::new();

        tracing::info!(
            total,
            batch_size = self.config.batch_size,
            "Batch started"
        );

        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.pause(i).await;
            }

            let label = job.describe(item);
            tracing::info!(progress = %format!("{}/{}", i + 1, total), item = %label, "Processing");

            match job.process(item).await {
                Ok(()) => succeeded += 1,
                Err(error) => {
                    tracing::warn!(item = %label, kind = error.kind(), error = %error, "Item failed");
                    failures.push(BatchFailure {
                        item: item.clone(),
                        error,
                    });
                }
            }
        }

        BatchSummary {
            total,
            succeeded,
            failures,
            elapsed: started.elapsed(),
        }
    }

    /// 第 `done` 项处理完后的停顿
    async fn pause(&self, done: usize) {
        let batch_size = self.config.batch_size.max(1);
        let delay = if done % batch_size == 0 {
            tracing::info!(
                batch = done / batch_size,
                delay_secs = self.config.delay_between_batches.as_secs(),
                "Batch complete, pausing"
            );
            self.config.delay_between_batches
        } else {
            self.config.delay_between_items
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
