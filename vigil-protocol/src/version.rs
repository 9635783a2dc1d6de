//! Protocol versions, device platforms and game modes reported by the client.

use serde::{Deserialize, Serialize};

/// Protocol version of 1.20.0. Clients at or below it round acknowledgement timestamps.
pub const GAME_VERSION_1_20_0: i32 = 589;
/// Protocol version of 1.20.10, the first to report missed swings through input flags.
pub const GAME_VERSION_1_20_10: i32 = 594;

/// The network protocol version a client connected with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProtocolVersion(pub i32);

impl ProtocolVersion {
    /// Whether this client rounds `NetworkStackLatency` timestamps to the thousands.
    #[must_use]
    pub const fn is_legacy_acknowledgement(self) -> bool {
        self.0 <= GAME_VERSION_1_20_0
    }

    /// Whether this client reports swings that hit nothing through the input flags.
    #[must_use]
    pub const fn reports_missed_swings(self) -> bool {
        self.0 >= GAME_VERSION_1_20_10
    }
}

/// The platform a client is running on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum DeviceOs {
    /// Unknown or unreported platform.
    #[default]
    Unknown = 0,
    /// Android phones and tablets.
    Android = 1,
    /// iPhone and iPad.
    Ios = 2,
    /// macOS.
    Osx = 3,
    /// Amazon Fire devices.
    FireOs = 4,
    /// Gear VR.
    GearVr = 5,
    /// Hololens.
    Hololens = 6,
    /// Windows 10 and later.
    Win10 = 7,
    /// Win32 education builds.
    Win32 = 8,
    /// Dedicated server software.
    Dedicated = 9,
    /// Apple TV.
    TvOs = 10,
    /// PlayStation.
    Orbis = 11,
    /// Nintendo Switch.
    Nx = 12,
    /// Xbox.
    Xbox = 13,
    /// Windows Phone.
    WindowsPhone = 14,
    /// Linux.
    Linux = 15,
}

impl DeviceOs {
    /// A readable platform name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Android => "Android",
            Self::Ios => "iOS",
            Self::Osx => "MacOS",
            Self::FireOs => "FireOS",
            Self::GearVr => "Gear VR",
            Self::Hololens => "Hololens",
            Self::Win10 => "Windows 10",
            Self::Win32 => "Win32",
            Self::Dedicated => "Dedicated",
            Self::TvOs => "TV",
            Self::Orbis => "PlayStation",
            Self::Nx => "Nintendo",
            Self::Xbox => "Xbox",
            Self::WindowsPhone => "Windows Phone",
            Self::Linux => "Linux",
        }
    }

    /// PlayStation clients scale acknowledgement timestamps differently.
    #[must_use]
    pub const fn is_playstation(self) -> bool {
        matches!(self, Self::Orbis)
    }
}

/// The game mode of the connected player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum GameMode {
    /// Survival.
    #[default]
    Survival = 0,
    /// Creative.
    Creative = 1,
    /// Adventure.
    Adventure = 2,
    /// Spectator.
    Spectator = 6,
}

impl GameMode {
    /// Whether combat in this mode follows the survival reach rules.
    #[must_use]
    pub const fn has_survival_reach(self) -> bool {
        matches!(self, Self::Survival | Self::Adventure)
    }
}
