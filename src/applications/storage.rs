use alloc::{format, string::{String, ToString}};

use crate::{
    filesystem::READ_CHUNK_SIZE,
    interface::{ApplicationFramework, StorageInterface},
    menu::Report,
};

use super::ActionContext;

/// How many of the most recent log lines "View Log" shows.
pub const VIEW_LOG_LINES: usize = 8;

/// How much of the end of the log "View Log" reads, which is plenty for `VIEW_LOG_LINES`.
pub const VIEW_LOG_TAIL_BYTES: u64 = 2 * READ_CHUNK_SIZE as u64;

pub fn info<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let handle = ctx.storage.handle();
    let mut report = Report::new("Storage Info");

    if handle.mounted {
        report.push("Status: Mounted");
        report.push(format!("Card type: {}", handle.card_type));
        report.push(format!("Total: {}", format_bytes(handle.total_bytes)));
        report.push(format!("Used: {}", format_bytes(handle.used_bytes)));
        report.push(format!("Free: {}", format_bytes(handle.free_bytes())));
    } else {
        report.push("Status: Not mounted");
    }

    if let Some(error) = &handle.last_error {
        report.push(format!("Last error: {}", error));
    }

    report
}

/// Lists everything on the card as a tree.
pub fn browse_files<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let mut report = Report::new("Browse Files");

    match ctx.storage.list_children("/", true) {
        Ok(entries) if entries.is_empty() => report.push("(empty)"),
        Ok(entries) => {
            for entry in entries {
                let indent = "  ".repeat(entry.depth);
                if entry.is_dir {
                    report.push(format!("{}{}/", indent, entry.name));
                } else {
                    report.push(format!("{}{} ({})", indent, entry.name, format_bytes(entry.size)));
                }
            }
        }
        Err(e) => {
            report.push("Cannot list files:");
            report.push(e.to_string());
        }
    }

    report
}

/// Shows the tail of the active log file.
pub fn view_log<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let mut report = Report::new("System Log");

    if !ctx.logger.is_open() {
        report.push("Log not available");
        return report;
    }

    let path = ctx.logger.config().active_path();
    let truncated = ctx.storage.size(path) > VIEW_LOG_TAIL_BYTES;
    match ctx.storage.read_tail(path, VIEW_LOG_TAIL_BYTES) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let mut lines = text.lines().collect::<alloc::vec::Vec<_>>();

            // Reading from the middle of the file, so the first line is probably cut off
            if truncated && !lines.is_empty() {
                lines.remove(0);
            }

            let skip = lines.len().saturating_sub(VIEW_LOG_LINES);
            for line in &lines[skip..] {
                report.push(*line);
            }
            if lines.is_empty() {
                report.push("(empty)");
            }
        }
        Err(e) => {
            report.push("Cannot read log:");
            report.push(e.to_string());
        }
    }

    report
}

pub fn rotate_log<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let mut report = Report::new("Rotate Log");
    let now = ctx.uptime();

    match ctx.logger.rotate(ctx.storage, now) {
        Ok(backup) => {
            ctx.info(&format!("Log rotated to {}", backup));
            report.push("Log rotated to:");
            report.push(backup);
        }
        Err(e) => {
            ctx.warning(&format!("Log rotation failed: {}", e));
            report.push("Rotation failed:");
            report.push(e.to_string());
        }
    }

    report
}

/// Formats a byte count in the largest unit that keeps it above 1.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{}.{} MB", bytes / MB, (bytes % MB) * 10 / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} B", bytes)
    }
}
