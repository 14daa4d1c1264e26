// User agent
pub const USER_AGENT: &str = "RoamBrowser/0.1.0 reqwest/0.12";

// Walk pacing. One reload-then-navigate cycle fires per tick; the settle and
// load waits are best-effort stand-ins for "page finished loading".
pub const TICK_INTERVAL_SECS: u64 = 10;
pub const RELOAD_SETTLE_SECS: u64 = 3;
pub const LOAD_WAIT_SECS: u64 = 5;

// Network configuration
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const MAX_REDIRECTS: usize = 10;

// File size limits
pub const MAX_PAGE_SIZE_BYTES: u64 = 10 * 1024 * 1024; // 10MB

// Channel capacities
pub const CONTROL_CHANNEL_CAPACITY: usize = 16;
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

// Walk destinations
pub const DEFAULT_SEED_URL: &str = "https://www.rust-lang.org";
pub const FALLBACK_URL: &str = "https://www.reddit.com/";

// Export
pub const EXPORT_FILENAME: &str = "visited_links.txt";

// Link candidates with these final path extensions are skipped
pub const SKIPPED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "zip", "exe"];

// Event polling
pub const EVENT_POLL_TIMEOUT_MS: u64 = 50;

// UI layout
pub const STATUS_BAR_HEIGHT: u16 = 3;
pub const FOOTER_HEIGHT: u16 = 3;
