//! # 事件调度模块
//!
//! ## 设计思路
//!
//! 拖放、粘贴、文件选择、复制按钮以及异步读取/写入的完成通知，
//! 全部变成 `AppEvent` 投递到同一个收件箱，由单个任务按到达顺序处理。
//! 拖放区与流水线的状态只在这个任务里被修改，因此不需要任何锁。
//!
//! ## 实现思路
//!
//! - 长耗时操作（文件读取、剪贴板写入）放到独立任务执行，完成后以事件回投。
//! - 计时器不单独起任务：循环每轮取拖放区与流水线中最早的到期时间点，
//!   与收件箱一起 `select!`，到期后调用各自的 `poll_timers`。
//! - `Dispatcher::mount` 启动循环并返回 `MountedApp`，监听在此刻安装一次；
//!   `MountedApp` 被 drop 或调用 `unmount` 时投递 `Shutdown`，循环退出后监听随之释放。
//! - 加载中时拖放区自动禁用，加载结束后恢复。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::drop_target::{
    DragPayload, DropEffect, DropHandler, DropTarget, DropTargetConfig, DropTargetState,
};
use crate::ingest::{
    ClipboardSink, FileSource, IngestConfig, IngestError, IngestPipeline, LocalFile,
    PipelineState, ReadTicket, ValidationError,
};
use crate::notify::{Notice, Notifier};

/// 粘贴内容：文件优先，其次文本。
pub enum PasteData {
    Files(Vec<Box<dyn FileSource>>),
    Text(String),
}

/// 投递给调度器的事件。
pub enum AppEvent {
    DragEnter(DragPayload),
    DragOver(DragPayload),
    DragLeave,
    /// 放下的文件路径。
    Drop(Vec<PathBuf>),
    Paste(PasteData),
    /// 文件选择器结果，只取第一个。
    FilePicked(Vec<PathBuf>),
    CopyRequested,
    ReadFinished {
        ticket: ReadTicket,
        result: Result<String, IngestError>,
    },
    CopyFinished(Result<(), IngestError>),
    Reconfigure {
        ingest: IngestConfig,
        drop_target: DropTargetConfig,
    },
    Shutdown,
}

impl AppEvent {
    fn label(&self) -> &'static str {
        match self {
            Self::DragEnter(_) => "drag-enter",
            Self::DragOver(_) => "drag-over",
            Self::DragLeave => "drag-leave",
            Self::Drop(_) => "drop",
            Self::Paste(_) => "paste",
            Self::FilePicked(_) => "file-picked",
            Self::CopyRequested => "copy-requested",
            Self::ReadFinished { .. } => "read-finished",
            Self::CopyFinished(_) => "copy-finished",
            Self::Reconfigure { .. } => "reconfigure",
            Self::Shutdown => "shutdown",
        }
    }
}

/// 展示层回调。
pub trait StateObserver: Send {
    fn on_pipeline_state(&self, state: &PipelineState);

    fn on_drop_target_state(&self, state: DropTargetState);

    fn on_drop_effect(&self, _effect: DropEffect) {}
}

/// 事件投递端，可在任意线程克隆使用。
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::UnboundedSender<AppEvent>,
}

impl EventSender {
    /// 投递事件；调度器已卸载时返回 `false`。
    pub fn send(&self, event: AppEvent) -> bool {
        let label = event.label();
        match self.inner.send(event) {
            Ok(()) => true,
            Err(_) => {
                log::debug!("调度器已卸载，丢弃事件 {}", label);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

/// 已挂载的调度器句柄。
pub struct MountedApp {
    sender: EventSender,
    task: Option<JoinHandle<()>>,
}

impl MountedApp {
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    pub fn send(&self, event: AppEvent) -> bool {
        self.sender.send(event)
    }

    /// 卸载并等待事件循环退出。
    pub async fn unmount(mut self) {
        self.sender.send(AppEvent::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                log::warn!("事件循环异常退出：{}", err);
            }
        }
    }
}

impl Drop for MountedApp {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.sender.send(AppEvent::Shutdown);
        }
    }
}

enum Step {
    Event(Option<AppEvent>),
    Timer,
}

fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// 单线程事件调度器。
pub struct Dispatcher {
    drop_target: DropTarget,
    pipeline: IngestPipeline,
    /// 配置层面的禁用，与加载态叠加。
    drop_target_disabled: bool,
    clipboard: Arc<dyn ClipboardSink>,
    notifier: Box<dyn Notifier>,
    observer: Box<dyn StateObserver>,
    inbox: mpsc::UnboundedReceiver<AppEvent>,
    outbox: EventSender,
}

impl Dispatcher {
    /// 在当前 tokio 运行时上启动事件循环。
    pub fn mount(
        ingest: IngestConfig,
        drop_target: DropTargetConfig,
        clipboard: Arc<dyn ClipboardSink>,
        notifier: Box<dyn Notifier>,
        observer: Box<dyn StateObserver>,
    ) -> MountedApp {
        let (tx, rx) = mpsc::unbounded_channel();
        let sender = EventSender { inner: tx };

        let dispatcher = Self {
            drop_target_disabled: drop_target.disabled,
            drop_target: DropTarget::new(drop_target),
            pipeline: IngestPipeline::new(ingest),
            clipboard,
            notifier,
            observer,
            inbox: rx,
            outbox: sender.clone(),
        };

        let task = tokio::spawn(dispatcher.run());
        log::info!("🧩 调度器已挂载");

        MountedApp {
            sender,
            task: Some(task),
        }
    }

    async fn run(mut self) {
        self.publish_pipeline();
        self.publish_drop_target();

        loop {
            let deadline = earliest(self.drop_target.next_deadline(), self.pipeline.next_deadline());

            let step = match deadline {
                Some(deadline) => {
                    tokio::select! {
                        event = self.inbox.recv() => Step::Event(event),
                        _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => Step::Timer,
                    }
                }
                None => Step::Event(self.inbox.recv().await),
            };

            match step {
                Step::Timer => self.fire_timers(now()),
                Step::Event(None) | Step::Event(Some(AppEvent::Shutdown)) => break,
                Step::Event(Some(event)) => self.handle(event),
            }
        }

        self.inbox.close();
        log::info!("🧩 调度器已卸载");
    }

    fn handle(&mut self, event: AppEvent) {
        log::trace!("事件 {}", event.label());

        match event {
            AppEvent::DragEnter(payload) => {
                if self.drop_target.drag_enter(&payload) {
                    self.publish_drop_target();
                }
            }
            AppEvent::DragOver(payload) => {
                let effect = self.drop_target.drag_over(&payload);
                self.observer.on_drop_effect(effect);
            }
            AppEvent::DragLeave => self.drop_target.drag_leave(now()),
            AppEvent::Drop(paths) => {
                let was_active = self.drop_target.is_active();
                let outcome = self.drop_target.drop(paths);
                if was_active != self.drop_target.is_active() {
                    self.publish_drop_target();
                }
                outcome.dispatch(self);
            }
            AppEvent::Paste(data) => self.handle_paste(data),
            AppEvent::FilePicked(paths) => {
                if let Some(path) = paths.into_iter().next() {
                    self.open_and_read(path);
                }
            }
            AppEvent::CopyRequested => self.start_copy(),
            AppEvent::ReadFinished { ticket, result } => {
                let outcome = self.pipeline.complete_read(ticket, result).map(|_| ());
                self.sync_disabled();
                self.publish_pipeline();
                if let Err(err) = outcome {
                    self.report(&err);
                }
            }
            AppEvent::CopyFinished(Ok(())) => {
                self.pipeline.confirm_copy(now());
                self.publish_pipeline();
            }
            AppEvent::CopyFinished(Err(err)) => self.report(&err),
            AppEvent::Reconfigure { ingest, drop_target } => {
                log::info!("⚙️ 应用新配置（max_file_size={}）", ingest.max_file_size);
                self.pipeline.set_config(ingest);
                self.drop_target_disabled = drop_target.disabled;
                self.drop_target.set_config(drop_target);
                self.sync_disabled();
                self.publish_pipeline();
            }
            AppEvent::Shutdown => {}
        }
    }

    fn handle_paste(&mut self, data: PasteData) {
        if self.pipeline.is_loading() {
            log::debug!("⏳ 读取进行中，忽略粘贴");
            return;
        }

        match data {
            PasteData::Files(files) => {
                if let Some(file) = files.into_iter().next() {
                    self.start_read(file);
                }
            }
            PasteData::Text(text) => {
                let outcome = self.pipeline.submit_text(&text).map(|_| ());
                match outcome {
                    Ok(()) => self.publish_pipeline(),
                    Err(err) => self.report(&err),
                }
            }
        }
    }

    fn open_and_read(&mut self, path: PathBuf) {
        if self.pipeline.is_loading() {
            log::debug!("⏳ 读取进行中，忽略 {}", path.display());
            return;
        }

        match LocalFile::open(&path) {
            Ok(file) => self.start_read(Box::new(file)),
            Err(err) => self.report(&err),
        }
    }

    fn start_read(&mut self, file: Box<dyn FileSource>) {
        let ticket = match self.pipeline.submit_file(file.as_ref()) {
            Ok(ticket) => ticket,
            Err(err) => {
                self.report(&err);
                return;
            }
        };

        self.sync_disabled();
        self.publish_pipeline();

        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = file.read_as_data_url().await;
            outbox.send(AppEvent::ReadFinished { ticket, result });
        });
    }

    fn start_copy(&mut self) {
        let Some(payload) = self.pipeline.copy_payload() else {
            log::debug!("没有可复制的输出");
            return;
        };

        let clipboard = Arc::clone(&self.clipboard);
        let outbox = self.outbox.clone();
        tokio::spawn(async move {
            let result = clipboard.write_text(payload).await;
            outbox.send(AppEvent::CopyFinished(result));
        });
    }

    fn fire_timers(&mut self, now: Instant) {
        if self.drop_target.poll_timers(now) {
            self.publish_drop_target();
        }
        if self.pipeline.poll_timers(now) {
            self.publish_pipeline();
        }
    }

    fn sync_disabled(&mut self) {
        let disabled = self.drop_target_disabled || self.pipeline.is_loading();
        if disabled != self.drop_target.is_disabled() {
            self.drop_target.set_disabled(disabled);
        }
    }

    fn report(&self, error: &IngestError) {
        if matches!(error, IngestError::Busy | IngestError::StaleRead(_)) {
            log::debug!("忽略提交：{}", error);
            return;
        }
        self.notifier.notify(Notice::from(error));
    }

    fn publish_pipeline(&self) {
        self.observer.on_pipeline_state(&self.pipeline.state());
    }

    fn publish_drop_target(&self) {
        self.observer.on_drop_target_state(self.drop_target.state());
    }
}

impl DropHandler<PathBuf> for Dispatcher {
    fn on_accept(&mut self, file: PathBuf) {
        self.open_and_read(file);
    }

    fn on_reject(&mut self, message: &str) {
        self.report(&ValidationError::InvalidFile(message.to_string()).into());
    }
}
