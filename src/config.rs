//! Station configuration parameters
//!
//! All tunable parameters for the sorting station.  Values can be
//! overridden by pointing the binary at a JSON file; anything the file
//! omits falls back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::pipeline::categories::CategoryMap;

/// Core station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    // --- Serial link ---
    /// Device path of the bin controller's serial port
    pub serial_port: String,
    /// Baud rate (8 data bits, no parity, one stop bit are fixed)
    pub baud_rate: u32,

    // --- Camera ---
    /// Still-capture command run for each deposit; `{out}` is replaced
    /// with `capture_path`
    pub capture_command: String,
    /// Where the capture command writes its still
    pub capture_path: String,

    // --- Classifier ---
    /// Path of the model handed to the inference engine
    pub model_path: String,
    /// Model input width in pixels
    pub input_width: u32,
    /// Model input height in pixels
    pub input_height: u32,
    /// Minimum confidence for a result to count at all
    pub confidence_threshold: f32,
    /// How many top results to retain (the station acts on the best one)
    pub max_results: usize,
    /// Output-index → waste-category partition
    pub categories: CategoryMap,

    // --- Timing ---
    /// Seconds of idle before the display switches to video playback
    pub idle_video_timeout_secs: u16,
    /// Display clock refresh interval (milliseconds, cosmetic)
    pub display_refresh_ms: u32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Serial link
            serial_port: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,

            // Camera
            capture_command: "raspistill -o {out} -t 1 -br 70 -hf -awb sun".to_string(),
            capture_path: "/tmp/sortstation.jpg".to_string(),

            // Classifier
            model_path: "model.tflite".to_string(),
            input_width: 224,
            input_height: 224,
            confidence_threshold: 0.01,
            max_results: 1,
            categories: CategoryMap::default(),

            // Timing
            idle_video_timeout_secs: 10,
            display_refresh_ms: 500,
        }
    }
}

impl StationConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&text)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::categories::Category;

    #[test]
    fn default_config_is_sane() {
        let c = StationConfig::default();
        assert_eq!(c.baud_rate, 115_200);
        assert!(c.input_width > 0 && c.input_height > 0);
        assert!(c.confidence_threshold > 0.0 && c.confidence_threshold < 1.0);
        assert!(c.max_results >= 1);
        assert!(c.idle_video_timeout_secs > 0);
        assert!(c.display_refresh_ms > 0);
        assert!(c.capture_command.contains("{out}"));
    }

    #[test]
    fn serde_roundtrip() {
        let c = StationConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: StationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.serial_port, c2.serial_port);
        assert_eq!(c.max_results, c2.max_results);
        assert!((c.confidence_threshold - c2.confidence_threshold).abs() < 1e-6);
        assert_eq!(c2.categories.category_for(0), Category::Unrecognized);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let c: StationConfig = serde_json::from_str(r#"{"serial_port":"/dev/ttyACM3"}"#).unwrap();
        assert_eq!(c.serial_port, "/dev/ttyACM3");
        assert_eq!(c.baud_rate, 115_200);
        assert_eq!(c.input_width, 224);
    }

    #[test]
    fn idle_timeout_matches_deployed_station() {
        // The mechanical side expects 10s of quiet before promo video starts.
        let c = StationConfig::default();
        assert_eq!(c.idle_video_timeout_secs, 10);
    }
}
