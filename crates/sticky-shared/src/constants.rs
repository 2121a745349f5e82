/// Application name
pub const APP_NAME: &str = "Very Sticky";

/// Color applied when a received payload carries none (dark theme background)
pub const DEFAULT_NOTE_COLOR: &str = "#1e1e1e";

/// Color preselected for a freshly drafted note
pub const DEFAULT_DRAFT_COLOR: &str = "#ffd43b";

/// Palette offered when drafting a note, as (label, value)
pub const COLOR_OPTIONS: [(&str, &str); 5] = [
    ("Yellow", "#ffd43b"),
    ("Pink", "#ff8787"),
    ("Blue", "#74c0fc"),
    ("Green", "#69db7c"),
    ("Purple", "#da77f2"),
];

/// Key under which hidden note ids are persisted
pub const HIDDEN_NOTES_KEY: &str = "hidden-notes";

/// Length of a recipient address: `0x` plus 40 hex digits
pub const ADDRESS_LEN: usize = 42;

/// Bytes encoded by the hex part of an address
pub const ADDRESS_BYTES: usize = 20;
