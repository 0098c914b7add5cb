//! Fake TTS Client - 用于测试的 TTS 客户端
//!
//! 不调用 TTS 服务，把文本本身当作音频数据返回，并记录收到的请求

use async_trait::async_trait;
use std::sync::Mutex;

use crate::application::ports::{InferRequest, InferResponse, TtsEnginePort, TtsError};

/// Fake TTS Client 配置
#[derive(Debug, Clone, Default)]
pub struct FakeTtsClientConfig {
    /// 模拟推理延迟（毫秒）
    pub latency_ms: u64,
    /// 文本包含该子串时返回服务错误
    pub fail_on: Option<String>,
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
    requests: Mutex<Vec<InferRequest>>,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(
            latency_ms = config.latency_ms,
            fail_on = ?config.fail_on,
            "FakeTtsClient initialized"
        );
        Self {
            config,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 使用默认配置创建
    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    /// 已收到的请求（按调用顺序）
    pub fn requests(&self) -> Vec<InferRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// 与 `infer` 返回的音频数据一致
    pub fn audio_for(text: &str) -> Vec<u8> {
        format!("[{}]", text).into_bytes()
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn infer(&self, request: InferRequest) -> Result<InferResponse, TtsError> {
        tracing::debug!(
            text_chars = request.text.chars().count(),
            voice = %request.voice,
            "FakeTtsClient: echoing text as audio"
        );

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        if let Some(needle) = &self.config.fail_on {
            if request.text.contains(needle.as_str()) {
                return Err(TtsError::ServiceError(format!("HTTP 500: refused {:?}", needle)));
            }
        }

        Ok(InferResponse {
            session_id: format!("fake-{}", uuid::Uuid::new_v4()),
            audio_data: Self::audio_for(&request.text),
            duration_ms: Some(request.text.chars().count() as u64 * 200),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str) -> InferRequest {
        InferRequest {
            text: text.to_string(),
            voice: "zh-CN-XiaoxiaoNeural".to_string(),
        }
    }

    #[tokio::test]
    async fn test_echoes_text_and_records_requests() {
        let client = FakeTtsClient::with_defaults();

        let response = client.infer(request("你好。")).await.unwrap();
        assert_eq!(response.audio_data, FakeTtsClient::audio_for("你好。"));
        assert!(response.session_id.starts_with("fake-"));

        client.infer(request("再见。")).await.unwrap();
        let texts: Vec<_> = client.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["你好。", "再见。"]);
        assert!(client.health_check().await);
    }

    #[tokio::test]
    async fn test_fail_on_substring() {
        let client = FakeTtsClient::new(FakeTtsClientConfig {
            fail_on: Some("坏".to_string()),
            ..Default::default()
        });

        assert!(client.infer(request("好的。")).await.is_ok());
        assert!(matches!(
            client.infer(request("坏的。")).await,
            Err(TtsError::ServiceError(_))
        ));
    }
}
