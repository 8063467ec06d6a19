//! Options applied to a player's mpv core before it is initialized.

use crate::frame::PixelFormat;
use crate::mpv::LogLevel;
use std::path::PathBuf;

/// Player configuration.
///
/// The defaults keep the core alive after playback ends (`idle`,
/// `keep-open`) so the last frame stays on screen, and use the `sw-fast`
/// profile which suits the software renderer.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub library_path: Option<PathBuf>,
    pub idle: bool,
    pub keep_open: bool,
    pub profile: Option<String>,
    pub hwdec: String,
    /// Let libmpv print to the terminal.
    pub terminal: bool,
    pub msg_level: Option<String>,
    /// Minimum libmpv log level forwarded to `log`; `None` disables it.
    pub log_level: Option<LogLevel>,
    pub pixel_format: PixelFormat,
    pub extra: Vec<(String, String)>,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        let debug = cfg!(debug_assertions);
        Self {
            library_path: None,
            idle: true,
            keep_open: true,
            profile: Some("sw-fast".into()),
            hwdec: "no".into(),
            terminal: debug,
            msg_level: debug.then(|| "all=info".into()),
            log_level: Some(LogLevel::Warn),
            pixel_format: PixelFormat::default(),
            extra: Vec::new(),
        }
    }
}

fn yes_no(value: bool) -> String {
    (if value { "yes" } else { "no" }).to_string()
}

impl PlayerOptions {
    pub fn library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.library_path = Some(path.into());
        self
    }

    pub fn idle(mut self, idle: bool) -> Self {
        self.idle = idle;
        self
    }

    pub fn keep_open(mut self, keep_open: bool) -> Self {
        self.keep_open = keep_open;
        self
    }

    pub fn profile(mut self, profile: Option<impl Into<String>>) -> Self {
        self.profile = profile.map(Into::into);
        self
    }

    pub fn hwdec(mut self, hwdec: impl Into<String>) -> Self {
        self.hwdec = hwdec.into();
        self
    }

    pub fn terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn msg_level(mut self, msg_level: Option<impl Into<String>>) -> Self {
        self.msg_level = msg_level.map(Into::into);
        self
    }

    pub fn log_level(mut self, level: Option<LogLevel>) -> Self {
        self.log_level = level;
        self
    }

    pub fn pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = format;
        self
    }

    /// Adds a raw mpv option, applied after the built-in ones.
    pub fn option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((name.into(), value.into()));
        self
    }

    /// Ordered `(name, value)` pairs passed to `mpv_set_option_string`.
    pub fn to_options(&self) -> Vec<(String, String)> {
        let mut options = vec![
            ("terminal".to_string(), yes_no(self.terminal)),
            ("idle".to_string(), yes_no(self.idle)),
            ("keep-open".to_string(), yes_no(self.keep_open)),
        ];
        if let Some(level) = &self.msg_level {
            options.push(("msg-level".into(), level.clone()));
        }
        if let Some(profile) = &self.profile {
            options.push(("profile".into(), profile.clone()));
        }
        options.push(("hwdec".into(), self.hwdec.clone()));
        // Rendering goes through the render API; mpv must not open a window.
        options.push(("vo".into(), "libmpv".into()));
        options.extend(self.extra.iter().cloned());
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value<'a>(options: &'a [(String, String)], name: &str) -> Option<&'a str> {
        options
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn defaults_keep_player_open() {
        let options = PlayerOptions::default().to_options();
        assert_eq!(value(&options, "idle"), Some("yes"));
        assert_eq!(value(&options, "keep-open"), Some("yes"));
        assert_eq!(value(&options, "profile"), Some("sw-fast"));
        assert_eq!(value(&options, "vo"), Some("libmpv"));
    }

    #[test]
    fn terminal_follows_build_profile() {
        let options = PlayerOptions::default().to_options();
        let expected = if cfg!(debug_assertions) { "yes" } else { "no" };
        assert_eq!(value(&options, "terminal"), Some(expected));
        assert_eq!(
            value(&options, "msg-level").is_some(),
            cfg!(debug_assertions)
        );
    }

    #[test]
    fn extra_options_come_last() {
        let options = PlayerOptions::default()
            .profile(None::<String>)
            .keep_open(false)
            .option("volume", "50")
            .to_options();
        assert_eq!(value(&options, "profile"), None);
        assert_eq!(value(&options, "keep-open"), Some("no"));
        assert_eq!(
            options.last(),
            Some(&("volume".to_string(), "50".to_string()))
        );
    }
}
