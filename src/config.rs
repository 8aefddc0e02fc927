//! Start-up configuration.

use std::time::Duration;

use log::LevelFilter;

use crate::permissions::SMS_PERMISSIONS;
use crate::sms::ActionMatch;

/// Knobs read once by `android_main` and the JNI load hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppConfig {
    /// Tag attached to every logcat line.
    pub log_tag: &'static str,
    pub max_log_level: LevelFilter,
    /// Accelerometer sampling period requested while the app has focus.
    pub sensor_period: Duration,
    /// Amount the animation angle advances per idle iteration.
    pub angle_step: f32,
    /// `android.Manifest.permission` field names checked at start-up.
    pub permissions: &'static [&'static str],
    pub sms_action_match: ActionMatch,
}

impl AppConfig {
    pub const DEFAULT: AppConfig = AppConfig {
        log_tag: "SmsHandler.NativeActivity",
        max_log_level: LevelFilter::Info,
        // 60 events per second, truncated to whole milliseconds.
        sensor_period: Duration::from_millis(1000 / 60),
        angle_step: 0.01,
        permissions: &SMS_PERMISSIONS,
        sms_action_match: ActionMatch::Exact,
    };

    /// Builds the logcat backend configuration.
    #[cfg(target_os = "android")]
    pub fn logger(&self) -> android_logger::Config {
        android_logger::Config::default()
            .with_max_level(self.max_log_level)
            .with_tag(self.log_tag)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Installs the logcat logger. Later calls are no-ops.
#[cfg(target_os = "android")]
pub fn init_logging(config: &AppConfig) {
    android_logger::init_once(config.logger());
}
