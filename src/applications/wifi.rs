use alloc::{format, string::{String, ToString}};

use crate::{
    filesystem::WIFI_SCAN_LOG_PATH,
    interface::{ApplicationFramework, NetworkRecord, RadioInterface, StorageInterface},
    logging::Uptime,
    menu::{ActionId, Report},
};

use super::ActionContext;

/// How many networks a scan lists on screen. All of them are saved.
pub const SCAN_DISPLAY_LIMIT: usize = 5;

/// Asks the radio for nearby networks, shows the strongest few, and appends all of them to the
/// scan log if storage is available.
pub fn scan_networks<F: ApplicationFramework, S: StorageInterface>(ctx: &mut ActionContext<F, S>) -> Report {
    ctx.info("WiFi scan started");

    let mut networks = ctx.framework.radio_mut().scan_networks();
    networks.sort_by(|a, b| b.rssi.cmp(&a.rssi));

    let mut report = Report::new("Scan Networks");
    if networks.is_empty() {
        report.push("No networks found");
        ctx.info("WiFi scan found no networks");
        return report;
    }

    report.push(format!("Found {} networks", networks.len()));
    for network in networks.iter().take(SCAN_DISPLAY_LIMIT) {
        report.push(format!("{} {}dBm ch{}", display_ssid(network), network.rssi, network.channel));
    }
    if networks.len() > SCAN_DISPLAY_LIMIT {
        report.push(format!("+{} more", networks.len() - SCAN_DISPLAY_LIMIT));
    }

    if !ctx.storage.is_ready() || !ctx.settings.values.storage_enabled {
        report.push("Results not saved");
        return report;
    }

    let now = ctx.uptime();
    let records = networks.iter()
        .map(|network| scan_record(now, network))
        .collect::<String>();

    match ctx.storage.append(WIFI_SCAN_LOG_PATH, records.as_bytes()) {
        Ok(()) => {
            ctx.info(&format!("WiFi scan saved: {} networks", networks.len()));
            report.push(format!("Saved to {}", WIFI_SCAN_LOG_PATH));
        }
        Err(e) => {
            ctx.error(&format!("WiFi scan not saved: {}", e));
            report.push("Save failed:");
            report.push(e.to_string());
        }
    }

    report
}

/// Screens for radio features which the firmware doesn't implement. They only explain that.
pub fn placeholder(action: ActionId) -> Report {
    let (title, description) = match action {
        ActionId::BeaconSpam => ("Beacon Spam", "Broadcasts fake access points."),
        ActionId::Deauth => ("Deauth", "Disconnects clients from a network."),
        _ => ("Evil Portal", "Serves a captive portal page."),
    };

    Report::new(title)
        .with_line(description)
        .with_line("")
        .with_line("Not available on this firmware.")
        .with_line("Nothing is transmitted.")
}

fn display_ssid(network: &NetworkRecord) -> &str {
    if network.ssid.is_empty() {
        "<hidden>"
    } else {
        &network.ssid
    }
}

/// One line of the scan log: `[<uptime>] <ssid>,<bssid>,<rssi>,<channel>,<security>`.
fn scan_record(now: Uptime, network: &NetworkRecord) -> String {
    format!(
        "[{}] {},{},{},{},{}\n",
        now,
        network.ssid,
        network.bssid_string(),
        network.rssi,
        network.channel,
        if network.encrypted { "SECURED" } else { "OPEN" },
    )
}
