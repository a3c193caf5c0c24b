//! 字节大小格式化
//!
//! 仅用于提示文案（体积超限、Data URL 过长），按 1024 进位，最多保留两位小数。

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 将字节数格式化为人类可读字符串，例如 `1.5 KB`、`2 MB`。
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
