pub const SAMPLE_RATE_HZ: f32 = 100.0;
pub const SAMPLE_PERIOD_MS: u64 = 10;
pub const GRAVITY_BIAS_G: f32 = 1.0449;

pub const WALKING_HIGH_PASS_HZ: f32 = 1.5;
pub const WALKING_LOW_PASS_HZ: f32 = 2.0;
pub const WALKING_THRESHOLD: f32 = 0.08;
pub const STEP_DEBOUNCE_MS: i64 = 500;
pub const STEPS_PER_GAIT: u8 = 5;
pub const GAIT_MIN_SPAN_MS: i64 = 3_000;
pub const GAIT_MAX_SPAN_MS: i64 = 5_000;

pub const GESTURE_HIGH_PASS_HZ: f32 = 2.0;
pub const GESTURE_LOW_PASS_HZ: f32 = 6.5;
pub const GESTURE_PEAK_THRESHOLD: f32 = 0.15;
pub const GESTURE_WINDOW_MS: i64 = 1_500;
pub const GESTURE_MIN_PEAKS: u16 = 20;

pub const MOVEMENT_THRESHOLD: f32 = 0.15;
pub const AUTO_OFF_TIMEOUT_MS: i64 = 5 * 60 * 1_000;

pub const LOUDNESS_THRESHOLD: u32 = 2_500;

pub const FINGERPRINT_MAX_APS: usize = 3;
pub const MAX_STORED_LOCATIONS: usize = 10;
pub const LOCATION_NAME_MAX: usize = 31;
pub const LOCATION_SSID_PREFIX_MAX: usize = 24;
pub const SSID_MAX: usize = 32;
pub const SCAN_LIST_SIZE: usize = 10;
pub const LOCATION_MATCH_THRESHOLD: f64 = 0.5;
pub const LOCATION_OVERLAP_WEIGHT: f64 = 0.7;
pub const LOCATION_RSSI_WEIGHT: f64 = 0.3;
pub const LOCATION_RSSI_SCALE_SQ: f64 = 100.0 * 100.0;
pub const UNKNOWN_LOCATION: &str = "Unknown_Location";
pub const HIDDEN_LOCATION: &str = "Hidden_Location";

pub const DEFAULT_WORK_SECONDS: u16 = 25 * 60;
pub const DEFAULT_BREAK_SECONDS: u16 = 5 * 60;
pub const DEFAULT_LONG_BREAK_SECONDS: u16 = 15 * 60;
pub const DEFAULT_SESSIONS_UNTIL_LONG_BREAK: u16 = 4;
pub const DEFAULT_TIMEOUT_SECONDS: u16 = 5 * 60;
pub const MIN_PHASE_SECONDS: u16 = 1;

pub const COUNTDOWN_TICK_MS: u64 = 1_000;
pub const SESSION_INPUT_QUEUE: usize = 8;
pub const SESSION_EFFECTS_MAX: usize = 8;

pub const SESSION_LOG_CAPACITY: usize = 64;

pub const STORE_CONFIG_MAGIC: u32 = 0x4746_4354;
pub const STORE_CONFIG_VERSION: u8 = 1;
pub const STORE_CONFIG_RECORD_LEN: usize = 24;
pub const STORE_FINGERPRINT_MAGIC: u32 = 0x5052_4654;
pub const STORE_FINGERPRINT_VERSION: u8 = 1;
pub const STORE_FINGERPRINT_RECORD_LEN: usize = 160;
pub const STORE_SESSION_MAGIC: u32 = 0x5353_4554;
pub const STORE_SESSION_VERSION: u8 = 1;
pub const STORE_SESSION_RECORD_LEN: usize = 48;

pub const STORE_CONFIG_OFFSET: u32 = 0;
pub const STORE_FINGERPRINT_OFFSET: u32 = 32;
pub const STORE_SESSION_OFFSET: u32 =
    STORE_FINGERPRINT_OFFSET + (MAX_STORED_LOCATIONS * STORE_FINGERPRINT_RECORD_LEN) as u32;
pub const STORE_REGION_LEN: u32 = 2 * 4096;
