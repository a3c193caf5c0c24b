//! 集成测试公用的内存实现：记录状态、提示与剪贴板写入。
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use data_url_drop::dispatcher::{Dispatcher, MountedApp, StateObserver};
use data_url_drop::drop_target::{DropEffect, DropTargetConfig, DropTargetState};
use data_url_drop::ingest::{
    ClipboardSink, FileSource, IngestConfig, IngestError, PipelineState,
};
use data_url_drop::notify::{Notice, Notifier};

#[derive(Debug, Default)]
pub struct Recorded {
    pub pipeline: Vec<PipelineState>,
    pub drop_target: Vec<DropTargetState>,
    pub effects: Vec<DropEffect>,
    pub notices: Vec<Notice>,
    pub copied: Vec<String>,
}

impl Recorded {
    pub fn last_pipeline(&self) -> &PipelineState {
        self.pipeline.last().expect("至少发布过一次流水线状态")
    }

    /// 某个布尔字段从 true 变为 false 的次数。
    pub fn falling_edges(&self, field: impl Fn(&PipelineState) -> bool) -> usize {
        self.pipeline
            .windows(2)
            .filter(|w| field(&w[0]) && !field(&w[1]))
            .count()
    }

    pub fn active_changes(&self) -> Vec<bool> {
        self.drop_target.iter().map(|s| s.is_active).collect()
    }
}

/// 同时充当观察者、提示出口与剪贴板的记录器。
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    inner: Arc<Mutex<Recorded>>,
    fail_clipboard: bool,
}

impl Recorder {
    pub fn failing_clipboard() -> Self {
        Self {
            fail_clipboard: true,
            ..Self::default()
        }
    }

    pub fn get(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().expect("记录器锁")
    }

    pub fn mount(&self) -> MountedApp {
        self.mount_with(IngestConfig::default(), DropTargetConfig::default())
    }

    pub fn mount_with(&self, ingest: IngestConfig, drop_target: DropTargetConfig) -> MountedApp {
        Dispatcher::mount(
            ingest,
            drop_target,
            Arc::new(self.clone()),
            Box::new(self.clone()),
            Box::new(self.clone()),
        )
    }

    /// 让调度器把已投递的事件处理完。
    pub async fn settle(&self) {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
    }

    /// 只靠让出执行权推进调度器，不触碰（暂停的）时钟。
    pub async fn settle_until(&self, cond: impl Fn(&Recorded) -> bool) {
        for _ in 0..1_000 {
            {
                let recorded = self.get();
                if !recorded.pipeline.is_empty() && cond(&recorded) {
                    return;
                }
            }
            tokio::task::yield_now().await;
        }
        panic!("条件未满足：{:?}", self.get());
    }

    /// 真实时钟下等待，适用于需要磁盘读取的场景。
    pub async fn wait_until(&self, cond: impl Fn(&Recorded) -> bool) {
        for _ in 0..400 {
            {
                let recorded = self.get();
                if !recorded.pipeline.is_empty() && cond(&recorded) {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("等待超时：{:?}", self.get());
    }
}

impl StateObserver for Recorder {
    fn on_pipeline_state(&self, state: &PipelineState) {
        self.get().pipeline.push(state.clone());
    }

    fn on_drop_target_state(&self, state: DropTargetState) {
        self.get().drop_target.push(state);
    }

    fn on_drop_effect(&self, effect: DropEffect) {
        self.get().effects.push(effect);
    }
}

impl Notifier for Recorder {
    fn notify(&self, notice: Notice) {
        self.get().notices.push(notice);
    }
}

#[async_trait]
impl ClipboardSink for Recorder {
    async fn write_text(&self, text: String) -> Result<(), IngestError> {
        if self.fail_clipboard {
            return Err(IngestError::Clipboard("剪贴板被占用".to_string()));
        }
        self.get().copied.push(text);
        Ok(())
    }
}

/// 读取耗时固定的内存文件，用于观察加载中的行为。
pub struct SlowFile {
    pub name: &'static str,
    pub data: &'static [u8],
    pub delay: Duration,
}

#[async_trait]
impl FileSource for SlowFile {
    fn name(&self) -> &str {
        self.name
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn mime_type(&self) -> &str {
        "text/plain"
    }

    async fn read_bytes(&self) -> Result<Bytes, IngestError> {
        tokio::time::sleep(self.delay).await;
        Ok(Bytes::from_static(self.data))
    }
}
