//! 拖放事件携带的数据与拖放结果。

use std::borrow::Cow;

use serde::Serialize;

/// 拖入数据中单个条目的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragItemKind {
    File,
    Text,
}

/// 拖入/悬停事件的数据概要。
///
/// 悬停阶段平台通常只给出条目种类，拿不到文件本身。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragPayload {
    items: Vec<DragItemKind>,
}

impl DragPayload {
    pub fn new(items: Vec<DragItemKind>) -> Self {
        Self { items }
    }

    /// `count` 个文件条目。
    pub fn files(count: usize) -> Self {
        Self::new(vec![DragItemKind::File; count])
    }

    /// 仅含文本、不含文件。
    pub fn text() -> Self {
        Self::new(vec![DragItemKind::Text])
    }

    pub fn has_file(&self) -> bool {
        self.items.contains(&DragItemKind::File)
    }
}

/// 悬停时向平台反馈的光标效果。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DropEffect {
    Copy,
    None,
}

/// 可被拖放区校验的文件。
///
/// 非 UTF-8 文件名按有损方式转换，与 `LocalFile` 的显示名一致。
pub trait DroppedFile {
    fn file_name(&self) -> Cow<'_, str>;
}

impl DroppedFile for std::path::PathBuf {
    fn file_name(&self) -> Cow<'_, str> {
        self.as_path()
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }
}

/// 一次放下的处理结果。
#[derive(Debug, PartialEq, Eq)]
pub enum DropOutcome<F> {
    /// 恰好一个文件且文件名匹配。
    Accepted(F),
    /// 文件数量不对或文件名不匹配，附带提示文案。
    Rejected(String),
    /// 拖放区已禁用，什么都不做。
    Ignored,
}

/// 拖放结果回调。
pub trait DropHandler<F> {
    fn on_accept(&mut self, file: F);
    fn on_reject(&mut self, message: &str);
}

impl<F> DropOutcome<F> {
    /// 把结果分发给回调，`Ignored` 不触发任何回调。
    pub fn dispatch<H: DropHandler<F> + ?Sized>(self, handler: &mut H) {
        match self {
            Self::Accepted(file) => handler.on_accept(file),
            Self::Rejected(message) => handler.on_reject(&message),
            Self::Ignored => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn payload_detects_file_items() {
        assert!(DragPayload::files(1).has_file());
        assert!(!DragPayload::files(0).has_file());
        assert!(!DragPayload::text().has_file());
        assert!(DragPayload::new(vec![DragItemKind::Text, DragItemKind::File]).has_file());
    }

    #[test]
    fn path_buf_uses_last_component() {
        let path = PathBuf::from("/tmp/pictures/cat.png");
        assert_eq!(DroppedFile::file_name(&path), "cat.png");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_name_is_converted_lossily() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from("/tmp").join(OsStr::from_bytes(b"caf\xe9.png"));
        assert_eq!(DroppedFile::file_name(&path), "caf\u{FFFD}.png");
        assert_eq!(
            DroppedFile::file_name(&path),
            path.as_path().file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );
    }
}
