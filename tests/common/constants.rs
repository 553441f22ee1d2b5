//! Shared constants for end-to-end tests
//!
//! When test data changes (catalog ids, fixture sizes, server limits),
//! update only this file.

// ============================================================================
// Test Catalog IDs
// ============================================================================

/// Track stored twice in the catalog (two rows, same id) to exercise dedup.
pub const TRACK_DUP_ID: &str = "track-dup";

/// High-valence, low-arousal tracks ("calm"): pass every tightened goal.
pub const TRACK_CALM_1_ID: &str = "track-calm-1";
pub const TRACK_CALM_2_ID: &str = "track-calm-2";
pub const TRACK_CALM_3_ID: &str = "track-calm-3";

/// Low-valence, high-arousal tracks ("tense"): filtered out by goals.
pub const TRACK_TENSE_1_ID: &str = "track-tense-1";
pub const TRACK_TENSE_2_ID: &str = "track-tense-2";

/// Track whose audio object is flagged bad; never playable.
pub const TRACK_BROKEN_ID: &str = "track-broken";

/// Working track whose audio file does not exist on disk.
pub const TRACK_GHOST_ID: &str = "track-ghost";

// ============================================================================
// Test Catalog Metadata
// ============================================================================

/// Camelot keys assigned to the calm tracks, in order.
pub const CALM_CAMELOT_KEYS: [&str; 3] = ["8A", "9A", "8A"];

/// Size of every fixture audio file (bytes).
pub const TEST_AUDIO_SIZE_BYTES: usize = 8192;

/// Server-side cap on search results, set low to be reachable in tests.
pub const MAX_SEARCH_LIMIT: usize = 5;

/// Origin present in the test server's CORS allow-list.
pub const ALLOWED_ORIGIN: &str = "http://localhost:3000";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
