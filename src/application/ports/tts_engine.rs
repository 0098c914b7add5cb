//! TTS Engine Port - 语音合成引擎抽象
//!
//! 定义 TTS 合成的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// TTS 错误
#[derive(Debug, Error)]
pub enum TtsError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// TTS 合成请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferRequest {
    /// 要合成的文本片段
    pub text: String,
    /// 语音名称（如 zh-CN-XiaoxiaoNeural）
    pub voice: String,
}

/// TTS 合成响应
#[derive(Debug, Clone)]
pub struct InferResponse {
    /// TTS 服务会话 ID（用于追踪）
    pub session_id: String,
    /// 编码后的音频数据（MP3）
    pub audio_data: Vec<u8>,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
}

/// TTS Engine Port
///
/// 外部 TTS 服务的抽象接口。每个片段独立调用，调用顺序由调用方保证。
#[async_trait]
pub trait TtsEnginePort: Send + Sync {
    /// 合成一段文本
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError>;

    /// 检查 TTS 服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
