//! # 摄取模块（ingest）
//!
//! ## 设计思路
//!
//! 把“输入获取 → 校验 → 异步读取 → Base64 编码 → 类型判定 → 状态更新”
//! 按职责拆分为多个子模块：
//!
//! - `pipeline`：状态持有者与状态转移（加载态、复制确认、当前输出）
//! - `source`：`FileSource` 能力接口、`EncodedOutput`、`IngestionRequest`
//! - `loader`：磁盘文件与内存文件两种 `FileSource` 实现
//! - `encoder`：Data URL 编解码与粘贴文本分类
//! - `clipboard_writer`：系统剪贴板写入
//! - `config/error`：阈值配置与错误模型
//!
//! ## 调用链
//!
//! ```text
//! Dispatcher（单线程事件循环）
//!    ↓
//! pipeline.rs  submit_file ──▶ ReadTicket
//!    │                           ↓
//!    │        loader.rs（独立任务中 read_as_data_url）
//!    │                           ↓
//!    └────── complete_read ◀── 读取结果事件
//! ```

mod clipboard_writer;
mod config;
mod encoder;
mod error;
mod loader;
mod pipeline;
mod source;

pub use clipboard_writer::{ArboardClipboard, ClipboardSink};
pub use config::{
    DEFAULT_COPY_CONFIRM_DURATION, DEFAULT_MAX_FILE_SIZE, DEFAULT_WARN_OUTPUT_LEN, IngestConfig,
};
pub use encoder::{
    MIME_OCTET_STREAM, MIME_SVG, MIME_TEXT_HTML, MIME_TEXT_PLAIN, classify_text, decode_data_url,
    encode_data_url, encode_text,
};
pub use error::{EncodingError, IngestError, ValidationError};
pub use loader::{LocalFile, MemoryFile, resolve_mime_type};
pub use pipeline::{IngestPipeline, PipelineState};
pub use source::{EncodedOutput, FileSource, IngestionRequest, ReadTicket, SourceKind};
