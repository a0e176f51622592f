use serde::{Deserialize, Serialize};

pub const DEFAULT_COOKIE_NAME: &str = "mooAudio-";
pub const DEFAULT_MUTE_COOKIE_DAYS: u32 = 30;

/// Where the mute flag is persisted between sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MuteStorage {
    #[default]
    Cookie,
    LocalStorage,
}

/// Controller configuration. Every field has a default, so partial JSON
/// objects are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerOptions {
    #[serde(default = "default_pause_all_on_lost_window_focus")]
    pub pause_all_on_lost_window_focus: bool,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default = "default_mute_cookie_days")]
    pub mute_cookie_days: u32,
    #[serde(default)]
    pub mute_storage: MuteStorage,
}

fn default_pause_all_on_lost_window_focus() -> bool {
    true
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

fn default_mute_cookie_days() -> u32 {
    DEFAULT_MUTE_COOKIE_DAYS
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            pause_all_on_lost_window_focus: default_pause_all_on_lost_window_focus(),
            cookie_name: default_cookie_name(),
            mute_cookie_days: default_mute_cookie_days(),
            mute_storage: MuteStorage::default(),
        }
    }
}

impl ControllerOptions {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Storage key of the persisted mute flag, e.g. `mooAudio-isMuted`.
    pub fn mute_key(&self) -> String {
        format!("{}isMuted", self.cookie_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = ControllerOptions::default();
        assert!(options.pause_all_on_lost_window_focus);
        assert_eq!(options.cookie_name, "mooAudio-");
        assert_eq!(options.mute_cookie_days, 30);
        assert_eq!(options.mute_storage, MuteStorage::Cookie);
        assert_eq!(options.mute_key(), "mooAudio-isMuted");
    }

    #[test]
    fn partial_json_takes_defaults() {
        let options = ControllerOptions::from_json(r#"{ "cookieName": "game-" }"#).unwrap();
        assert_eq!(options.cookie_name, "game-");
        assert!(options.pause_all_on_lost_window_focus);
        assert_eq!(options.mute_key(), "game-isMuted");
    }

    #[test]
    fn json_selects_local_storage_and_disables_focus_handling() {
        let options = ControllerOptions::from_json(
            r#"{ "pauseAllOnLostWindowFocus": false, "muteStorage": "local_storage" }"#,
        )
        .unwrap();
        assert!(!options.pause_all_on_lost_window_focus);
        assert_eq!(options.mute_storage, MuteStorage::LocalStorage);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ControllerOptions::from_json("{ cookieName: ").is_err());
    }
}
