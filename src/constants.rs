// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Manifest location, relative to the site root
pub const MANIFEST_PATH: &str = "data/photos.json";

// Geo
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const DIRECTION_LINE_M: f64 = 30.0;
pub const TRIM_FRACTION: f64 = 0.025;

// Initial camera when there is nothing to centre on (Milan)
pub const FALLBACK_CENTER: (f64, f64) = (45.4642, 9.1900);
pub const PRIMARY_INITIAL_ZOOM: u8 = 6;
pub const LIGHTBOX_INITIAL_ZOOM: u8 = 15;
pub const LIGHTBOX_FOCUS_ZOOM: u8 = 18;
pub const FIT_PADDING_PX: u32 = 50;

// Clustering
pub const CLUSTER_RADIUS_PX: u32 = 50;

// Tiles
pub const TILE_MAX_ZOOM: u8 = 19;
pub const TILE_OPACITY: f64 = 0.7;

// Marker palette
pub const MARKER_BLUE: &str = "#3498db";
pub const MARKER_RED: &str = "#e74c3c";
pub const MARKER_STROKE: &str = "white";

// Delay before map containers are resized, lets the browser finish layout
pub const LAYOUT_SETTLE_MS: u64 = 100;

// SSE
pub const EVENT_CHANNEL_CAPACITY: usize = 100;
pub const HEARTBEAT_SECS: u64 = 30;
pub const KEEPALIVE_SECS: u64 = 15;
