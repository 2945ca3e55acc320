#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Screen {
    Main,
    Wifi,
    Storage,
    Settings,
    WifiReport,
    StorageReport,
    SettingsReport,
    About,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ScreenKind {
    /// A list of items which can be moved through and selected.
    Navigable,

    /// Shows a report; any key returns to the parent.
    Leaf,
}

/// Everything a menu item can do when selected, other than opening another screen.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ActionId {
    ScanNetworks,
    BeaconSpam,
    Deauth,
    EvilPortal,
    StorageInfo,
    BrowseFiles,
    ViewLog,
    RotateLog,
    ToggleConsoleEcho,
    TogglePersistence,
    RemountStorage,
    About,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum MenuAction {
    Enter(Screen),

    /// Runs the action, then shows its report on the given leaf screen.
    Run(ActionId, Screen),
}

#[derive(PartialEq, Eq, Debug)]
pub struct MenuItem {
    pub label: &'static str,
    pub action: MenuAction,
}

#[derive(PartialEq, Eq, Debug)]
pub struct MenuNode {
    pub screen: Screen,
    pub title: &'static str,
    pub parent: Option<Screen>,
    pub kind: ScreenKind,
    pub items: &'static [MenuItem],
}

impl MenuNode {
    /// Number of positions the cursor can take on this screen. A leaf has nothing to select, but
    /// still counts as one so that an index of 0 is always in range.
    pub fn item_count(&self) -> usize {
        match self.kind {
            ScreenKind::Navigable => self.items.len(),
            ScreenKind::Leaf => 1,
        }
    }
}

impl Screen {
    pub fn node(self) -> &'static MenuNode {
        match self {
            Screen::Main => &MAIN,
            Screen::Wifi => &WIFI,
            Screen::Storage => &STORAGE,
            Screen::Settings => &SETTINGS,
            Screen::WifiReport => &WIFI_REPORT,
            Screen::StorageReport => &STORAGE_REPORT,
            Screen::SettingsReport => &SETTINGS_REPORT,
            Screen::About => &ABOUT,
        }
    }
}

static MAIN: MenuNode = MenuNode {
    screen: Screen::Main,
    title: "Main Menu",
    parent: None,
    kind: ScreenKind::Navigable,
    items: &[
        MenuItem { label: "WiFi Tools", action: MenuAction::Enter(Screen::Wifi) },
        MenuItem { label: "Storage", action: MenuAction::Enter(Screen::Storage) },
        MenuItem { label: "Settings", action: MenuAction::Enter(Screen::Settings) },
        MenuItem { label: "About", action: MenuAction::Run(ActionId::About, Screen::About) },
    ],
};

static WIFI: MenuNode = MenuNode {
    screen: Screen::Wifi,
    title: "WiFi Tools",
    parent: Some(Screen::Main),
    kind: ScreenKind::Navigable,
    items: &[
        MenuItem { label: "Scan Networks", action: MenuAction::Run(ActionId::ScanNetworks, Screen::WifiReport) },
        MenuItem { label: "Beacon Spam", action: MenuAction::Run(ActionId::BeaconSpam, Screen::WifiReport) },
        MenuItem { label: "Deauth", action: MenuAction::Run(ActionId::Deauth, Screen::WifiReport) },
        MenuItem { label: "Evil Portal", action: MenuAction::Run(ActionId::EvilPortal, Screen::WifiReport) },
    ],
};

static STORAGE: MenuNode = MenuNode {
    screen: Screen::Storage,
    title: "Storage",
    parent: Some(Screen::Main),
    kind: ScreenKind::Navigable,
    items: &[
        MenuItem { label: "Storage Info", action: MenuAction::Run(ActionId::StorageInfo, Screen::StorageReport) },
        MenuItem { label: "Browse Files", action: MenuAction::Run(ActionId::BrowseFiles, Screen::StorageReport) },
        MenuItem { label: "View Log", action: MenuAction::Run(ActionId::ViewLog, Screen::StorageReport) },
        MenuItem { label: "Rotate Log", action: MenuAction::Run(ActionId::RotateLog, Screen::StorageReport) },
    ],
};

static SETTINGS: MenuNode = MenuNode {
    screen: Screen::Settings,
    title: "Settings",
    parent: Some(Screen::Main),
    kind: ScreenKind::Navigable,
    items: &[
        MenuItem { label: "Console Echo", action: MenuAction::Run(ActionId::ToggleConsoleEcho, Screen::SettingsReport) },
        MenuItem { label: "SD Persistence", action: MenuAction::Run(ActionId::TogglePersistence, Screen::SettingsReport) },
        MenuItem { label: "Remount Storage", action: MenuAction::Run(ActionId::RemountStorage, Screen::SettingsReport) },
    ],
};

static WIFI_REPORT: MenuNode = MenuNode {
    screen: Screen::WifiReport,
    title: "WiFi Tools",
    parent: Some(Screen::Wifi),
    kind: ScreenKind::Leaf,
    items: &[],
};

static STORAGE_REPORT: MenuNode = MenuNode {
    screen: Screen::StorageReport,
    title: "Storage",
    parent: Some(Screen::Storage),
    kind: ScreenKind::Leaf,
    items: &[],
};

static SETTINGS_REPORT: MenuNode = MenuNode {
    screen: Screen::SettingsReport,
    title: "Settings",
    parent: Some(Screen::Settings),
    kind: ScreenKind::Leaf,
    items: &[],
};

static ABOUT: MenuNode = MenuNode {
    screen: Screen::About,
    title: "About",
    parent: Some(Screen::Main),
    kind: ScreenKind::Leaf,
    items: &[],
};
