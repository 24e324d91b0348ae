use serde::{Deserialize, Serialize};

use crate::core::clock::LocalStamp;
use crate::systems::fireworks::FireworksConfig;

/// Configuration for the page. Every field has a default, so a JSON
/// override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Section `id` that holds the typed letter.
    pub letter_section_id: String,
    /// Section `id` of the scrollable memory timeline.
    pub timeline_section_id: String,
    /// Anchor of the "acquainted since" counter, in local time.
    pub acquainted_since: LocalStamp,
    pub acquainted_prefix: String,
    pub together_prefix: String,
    /// Reassurance message shown by the hesitate button.
    pub gentle_note: String,
    pub gentle_note_ms: u32,
    pub letter_start_delay_ms: u32,
    pub letter_step_ms: u32,
    pub counter_period_ms: u32,
    /// Minimum |deltaY| that counts as a section jump.
    pub wheel_threshold: f64,
    pub wheel_lock_ms: u32,
    /// How close (px) the timeline's bottom edge must be to the viewport
    /// bottom before forward gestures jump again.
    pub timeline_bottom_tolerance: f64,
    /// Transition delay added per timeline item.
    pub timeline_stagger_secs: f32,
    pub initial_check_delay_ms: u32,
    pub audio_volume: f64,
    pub fireworks: FireworksConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            letter_section_id: "love-letter".to_string(),
            timeline_section_id: "memory-timeline".to_string(),
            acquainted_since: LocalStamp::new(2025, 10, 22, 17, 0, 0),
            acquainted_prefix: "我们认识了 ".to_string(),
            together_prefix: "一起计时：".to_string(),
            gentle_note: "慢慢来，我会在这里等你。".to_string(),
            gentle_note_ms: 5_000,
            letter_start_delay_ms: 100,
            letter_step_ms: 80,
            counter_period_ms: 1_000,
            wheel_threshold: 30.0,
            wheel_lock_ms: 900,
            timeline_bottom_tolerance: 50.0,
            timeline_stagger_secs: 0.15,
            initial_check_delay_ms: 100,
            audio_volume: 0.5,
            fireworks: FireworksConfig::default(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
