use alloc::format;

use crate::{
    interface::{ApplicationFramework, StorageInterface},
    menu::Report,
};

use super::ActionContext;

pub fn about<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let values = &ctx.settings.values;

    Report::new("About")
        .with_line(values.device_name.as_str())
        .with_line("")
        .with_line("Software version:")
        .with_line(format!("    {}", values.version))
        .with_line("")
        .with_line(format!("Storage: {}", if ctx.storage.is_ready() { "ready" } else { "not ready" }))
        .with_line(format!("Free memory: {} KB", ctx.framework.free_memory() / 1024))
}
