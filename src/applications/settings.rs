use alloc::{format, string::ToString};

use crate::{
    interface::{ApplicationFramework, StorageInterface},
    menu::Report,
};

use super::ActionContext;

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

/// Saves the settings after a change, and says so on the report.
fn save_and_report<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>, report: &mut Report) {
    match ctx.settings.save(ctx.storage) {
        Ok(()) => report.push("Settings saved"),
        Err(e) => {
            ctx.warning(&format!("Settings not saved: {}", e));
            report.push("Not saved:");
            report.push(e.to_string());
        }
    }
}

pub fn toggle_console_echo<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let enabled = !ctx.settings.values.console_echo;
    ctx.settings.values.console_echo = enabled;
    ctx.apply_settings();
    ctx.info(&format!("Console echo {}", on_off(enabled)));

    let mut report = Report::new("Console Echo").with_line(format!("Console echo: {}", on_off(enabled)));
    save_and_report(ctx, &mut report);
    report
}

pub fn toggle_persistence<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let enabled = !ctx.settings.values.storage_enabled;
    ctx.settings.values.storage_enabled = enabled;
    ctx.apply_settings();
    ctx.info(&format!("SD persistence {}", on_off(enabled)));

    let mut report = Report::new("SD Persistence").with_line(format!("SD persistence: {}", on_off(enabled)));
    save_and_report(ctx, &mut report);
    report
}

pub fn remount_storage<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    let mut report = Report::new("Remount Storage");

    match ctx.remount() {
        Ok(handle) => {
            report.push("Storage mounted");
            report.push(format!("Card type: {}", handle.card_type));
        }
        Err(e) => {
            report.push("Mount failed:");
            report.push(e.to_string());
        }
    }

    report
}
