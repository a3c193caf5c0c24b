//! # 摄取流水线
//!
//! ## 设计思路
//!
//! `IngestPipeline` 持有全部界面状态（加载中、复制确认中、当前输出），
//! 每个用户动作对应一个显式的状态转移方法，由单线程调度器按顺序调用。
//!
//! 文件读取是唯一的长耗时步骤，拆成两段：
//! 1. `submit_file`：校验并进入加载态，发放 `ReadTicket`
//! 2. `complete_read`：读取结束后交回凭据与结果，退出加载态
//!
//! 中间的异步读取由调用方执行（调度器把它放到独立任务里），
//! 因此流水线本身不持有任何 future，也不需要锁。
//!
//! ## 不变式
//!
//! - 加载中拒绝一切新提交，同一时刻最多一个读取在进行。
//! - `output` 只会被下一次成功摄取整体替换；任何失败都不清空它。
//! - 复制确认的回退时间点只有一个，重复复制会覆盖而不是叠加。
//! - 文本摄取是同步的，从不改变加载态。

use std::time::Instant;

use serde::Serialize;

use super::clipboard_writer::ClipboardSink;
use super::encoder::encode_text;
use super::source::{EncodedOutput, FileSource, IngestionRequest, ReadTicket, SourceKind};
use super::{IngestConfig, IngestError};

/// 提供给展示层的状态快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    pub is_loading: bool,
    pub is_confirming_copy: bool,
    pub output: Option<EncodedOutput>,
    /// 输出长度是否达到警告阈值，仅用于展示。
    pub is_output_large: bool,
}

impl PipelineState {
    /// 是否接受新的文件或粘贴，加载中时界面应禁用所有输入入口。
    pub fn accepts_input(&self) -> bool {
        !self.is_loading
    }
}

/// 摄取流水线。
#[derive(Debug)]
pub struct IngestPipeline {
    config: IngestConfig,
    output: Option<EncodedOutput>,
    in_flight: Option<InFlightRead>,
    next_ticket_id: u64,
    copy_revert_at: Option<Instant>,
}

#[derive(Debug)]
struct InFlightRead {
    ticket_id: u64,
    started_at: Instant,
}

impl IngestPipeline {
    pub fn new(config: IngestConfig) -> Self {
        Self {
            config,
            output: None,
            in_flight: None,
            next_ticket_id: 1,
            copy_revert_at: None,
        }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// 替换配置。已发放的读取凭据不受影响。
    pub fn set_config(&mut self, config: IngestConfig) {
        self.config = config;
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_confirming_copy(&self) -> bool {
        self.copy_revert_at.is_some()
    }

    pub fn output(&self) -> Option<&EncodedOutput> {
        self.output.as_ref()
    }

    pub fn state(&self) -> PipelineState {
        PipelineState {
            is_loading: self.is_loading(),
            is_confirming_copy: self.is_confirming_copy(),
            is_output_large: self
                .output
                .as_ref()
                .is_some_and(|o| self.config.is_output_large(o.encoded_len())),
            output: self.output.clone(),
        }
    }

    /// 校验文件并进入加载态。
    ///
    /// 体积超限时直接返回错误，不进入加载态，也不触碰输出。
    pub fn submit_file(&mut self, file: &dyn FileSource) -> Result<ReadTicket, IngestError> {
        if self.is_loading() {
            log::debug!("⏳ 读取进行中，忽略新文件 {}", file.name());
            return Err(IngestError::Busy);
        }

        if let Err(err) = self.config.check_file_size(file.size()) {
            log::warn!("🚫 文件体积超限 - {}（{} 字节）", file.name(), file.size());
            return Err(err);
        }

        let ticket = ReadTicket {
            id: self.next_ticket_id,
            name: file.name().to_string(),
            mime_type: file.mime_type().to_string(),
            size: file.size(),
        };
        self.next_ticket_id += 1;
        self.in_flight = Some(InFlightRead {
            ticket_id: ticket.id,
            started_at: Instant::now(),
        });

        log::debug!(
            "📁 开始读取 - {}（{} 字节，{}）",
            ticket.name,
            ticket.size,
            ticket.mime_type
        );
        Ok(ticket)
    }

    /// 交回读取结果并退出加载态。
    ///
    /// 成功时整体替换输出；失败时保留原输出并返回读取错误。
    pub fn complete_read(
        &mut self,
        ticket: ReadTicket,
        result: Result<String, IngestError>,
    ) -> Result<&EncodedOutput, IngestError> {
        let in_flight = match self.in_flight.take() {
            Some(in_flight) if in_flight.ticket_id == ticket.id => in_flight,
            other => {
                self.in_flight = other;
                log::warn!("⚠️ 收到过期的读取结果 - {}（#{}）", ticket.name, ticket.id);
                return Err(IngestError::StaleRead(ticket.id));
            }
        };

        match result {
            Ok(uri) => {
                log::info!(
                    "✅ 文件编码完成 - {}（{} 字节 → {} 字符，{}ms）",
                    ticket.name,
                    ticket.size,
                    uri.len(),
                    in_flight.started_at.elapsed().as_millis()
                );
                let kind = SourceKind::from_mime(&ticket.mime_type);
                Ok(&*self.output.insert(EncodedOutput::new(uri, kind, ticket.size)))
            }
            Err(err) => {
                log::error!("❌ 文件读取失败 - {}：{}", ticket.name, err);
                Err(match err {
                    IngestError::Read(message) => IngestError::Read(message),
                    other => IngestError::Read(other.to_string()),
                })
            }
        }
    }

    /// 在当前任务内完成一次文件摄取：校验、读取、写回。
    pub async fn ingest_file(&mut self, file: &dyn FileSource) -> Result<&EncodedOutput, IngestError> {
        let ticket = self.submit_file(file)?;
        let result = file.read_as_data_url().await;
        self.complete_read(ticket, result)
    }

    /// 同步摄取粘贴文本。
    pub fn submit_text(&mut self, text: &str) -> Result<&EncodedOutput, IngestError> {
        if self.is_loading() {
            log::debug!("⏳ 读取进行中，忽略粘贴文本");
            return Err(IngestError::Busy);
        }

        let (uri, kind, byte_length) = encode_text(text).inspect_err(|err| {
            log::warn!("🚫 文本编码失败：{}", err);
        })?;

        log::info!(
            "✅ 文本编码完成 - {} 字节 → {} 字符（{:?}）",
            byte_length,
            uri.len(),
            kind
        );
        Ok(&*self.output.insert(EncodedOutput::new(uri, kind, byte_length)))
    }

    /// 按请求类型分发。文件请求走同一任务内的完整读取。
    pub async fn ingest(&mut self, request: IngestionRequest) -> Result<&EncodedOutput, IngestError> {
        match request {
            IngestionRequest::File(file) => self.ingest_file(file.as_ref()).await,
            IngestionRequest::Text(text) => self.submit_text(&text),
        }
    }

    /// 取出待复制的 Data URL，无输出时返回 `None`。
    pub fn copy_payload(&self) -> Option<String> {
        self.output.as_ref().map(|o| o.uri().to_string())
    }

    /// 复制成功后进入确认态，覆盖任何尚未到期的回退时间点。
    pub fn confirm_copy(&mut self, now: Instant) {
        let revert_at = now + self.config.copy_confirm_duration;
        if self.copy_revert_at.replace(revert_at).is_some() {
            log::debug!("🔁 复制确认计时重新开始");
        }
    }

    /// 写入剪贴板并进入确认态。无输出时返回 `Ok(false)`。
    pub async fn copy_to_clipboard(&mut self, clipboard: &dyn ClipboardSink) -> Result<bool, IngestError> {
        let Some(payload) = self.copy_payload() else {
            return Ok(false);
        };

        clipboard.write_text(payload).await?;
        self.confirm_copy(tokio::time::Instant::now().into_std());
        Ok(true)
    }

    /// 最近一个待触发的时间点。
    pub fn next_deadline(&self) -> Option<Instant> {
        self.copy_revert_at
    }

    /// 触发已到期的计时器，返回状态是否变化。
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        match self.copy_revert_at {
            Some(revert_at) if revert_at <= now => {
                self.copy_revert_at = None;
                log::debug!("复制确认结束");
                true
            }
            _ => false,
        }
    }
}

impl Default for IngestPipeline {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{MemoryFile, ValidationError, decode_data_url};
    use std::time::Duration;

    #[test]
    fn oversized_file_never_enters_loading() {
        let mut pipeline = IngestPipeline::default();
        let file = MemoryFile::new("big.bin", "application/octet-stream", vec![0u8; 3 * 1024 * 1024]);

        let result = pipeline.submit_file(&file);

        assert!(matches!(
            result,
            Err(IngestError::Validation(ValidationError::FileTooLarge { .. }))
        ));
        assert!(!pipeline.is_loading());
        assert!(pipeline.output().is_none());
    }

    #[test]
    fn second_submission_is_rejected_while_loading() {
        let mut pipeline = IngestPipeline::default();
        let first = MemoryFile::new("a.txt", "text/plain", "aaa");
        let second = MemoryFile::new("b.txt", "text/plain", "bbb");

        let ticket = pipeline.submit_file(&first).expect("first submit");
        assert!(pipeline.is_loading());
        assert_eq!(pipeline.submit_file(&second), Err(IngestError::Busy));
        assert_eq!(pipeline.submit_text("hello").map(|_| ()), Err(IngestError::Busy));

        pipeline
            .complete_read(ticket, Ok("data:text/plain;base64,YWFh".to_string()))
            .expect("complete");
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn read_failure_keeps_previous_output() {
        let mut pipeline = IngestPipeline::default();
        pipeline.submit_text("first").expect("text");
        let before = pipeline.output().cloned();

        let file = MemoryFile::new("a.png", "image/png", vec![1u8, 2, 3]);
        let ticket = pipeline.submit_file(&file).expect("submit");
        let result = pipeline.complete_read(ticket, Err(IngestError::Read("boom".to_string())));

        assert_eq!(result.map(|_| ()), Err(IngestError::Read("boom".to_string())));
        assert!(!pipeline.is_loading());
        assert_eq!(pipeline.output().cloned(), before);
    }

    #[test]
    fn stale_ticket_does_not_clear_loading() {
        let mut pipeline = IngestPipeline::default();
        let file = MemoryFile::new("a.txt", "text/plain", "a");
        let ticket = pipeline.submit_file(&file).expect("submit");

        let stale = ReadTicket {
            id: ticket.id + 100,
            ..ticket.clone()
        };
        let result = pipeline.complete_read(stale, Ok("data:text/plain;base64,YQ==".into()));
        assert_eq!(result.map(|_| ()), Err(IngestError::StaleRead(ticket.id + 100)));
        assert!(pipeline.is_loading());

        pipeline
            .complete_read(ticket, Ok("data:text/plain;base64,YQ==".into()))
            .expect("complete");
        assert!(!pipeline.is_loading());
    }

    #[test]
    fn text_encoding_error_leaves_output_untouched() {
        let mut pipeline = IngestPipeline::default();
        pipeline.submit_text("<svg><rect/></svg>").expect("svg");

        let result = pipeline.submit_text("emoji 😀");
        assert!(matches!(result, Err(IngestError::Encoding(_))));
        assert_eq!(pipeline.output().map(|o| o.mime_type()), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn ingest_file_round_trips_bytes() {
        let mut pipeline = IngestPipeline::default();
        let data: Vec<u8> = (0u8..=255).collect();
        let file = MemoryFile::new("all.bin", "application/octet-stream", data.clone());

        let output = pipeline.ingest_file(&file).await.expect("ingest");
        let (mime, bytes) = decode_data_url(output.uri()).expect("decode");

        assert_eq!(mime, "application/octet-stream");
        assert_eq!(bytes, data);
        assert_eq!(output.byte_length(), 256);
    }

    #[test]
    fn copy_confirmation_restarts_instead_of_stacking() {
        let mut pipeline = IngestPipeline::default();
        pipeline.submit_text("hello").expect("text");
        let t0 = Instant::now();

        pipeline.confirm_copy(t0);
        pipeline.confirm_copy(t0 + Duration::from_millis(1000));

        assert!(!pipeline.poll_timers(t0 + Duration::from_millis(1500)));
        assert!(pipeline.is_confirming_copy());
        assert!(pipeline.poll_timers(t0 + Duration::from_millis(2500)));
        assert!(!pipeline.is_confirming_copy());
        assert!(!pipeline.poll_timers(t0 + Duration::from_millis(5000)));
    }

    #[test]
    fn new_config_applies_to_next_submission() {
        let mut pipeline = IngestPipeline::default();
        pipeline.set_config(IngestConfig {
            max_file_size: 4,
            ..IngestConfig::default()
        });
        assert_eq!(pipeline.config().max_file_size, 4);

        let file = MemoryFile::new("a.txt", "text/plain", "12345");
        assert!(matches!(
            pipeline.submit_file(&file),
            Err(IngestError::Validation(ValidationError::FileTooLarge { size: 5, limit: 4 }))
        ));
    }

    #[test]
    fn state_rejects_input_only_while_loading() {
        let mut pipeline = IngestPipeline::default();
        assert!(pipeline.state().accepts_input());

        let file = MemoryFile::new("a.txt", "text/plain", "a");
        let ticket = pipeline.submit_file(&file).expect("submit");
        assert!(!pipeline.state().accepts_input());

        pipeline
            .complete_read(ticket, Ok("data:text/plain;base64,YQ==".into()))
            .expect("complete");
        assert!(pipeline.state().accepts_input());
    }

    #[test]
    fn large_output_flag_uses_encoded_length() {
        let mut pipeline = IngestPipeline::new(IngestConfig {
            warn_output_len: 32,
            ..IngestConfig::default()
        });
        pipeline.submit_text("short").expect("text");
        assert!(!pipeline.state().is_output_large);

        pipeline.submit_text(&"x".repeat(64)).expect("text");
        assert!(pipeline.state().is_output_large);
    }
}
