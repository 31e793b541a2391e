//! Default values shared by the configuration types and the CLI.

/// Default event poll interval in milliseconds.
pub const DEFAULT_TICK_RATE_MS: u64 = 100;

/// Smallest terminal the screens are laid out for.
pub const DEFAULT_MIN_WIDTH: u16 = 60;
pub const DEFAULT_MIN_HEIGHT: u16 = 20;

/// Salt length in bytes for new credentials.
pub const DEFAULT_SALT_LENGTH: usize = 16;

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

/// File name of the record store inside the data directory.
pub const STORE_FILE_NAME: &str = "records.json";

/// Default record store location: `<data dir>/carebook/records.json`,
/// falling back to the working directory.
pub fn default_store_path() -> std::path::PathBuf {
    dirs::data_dir().map_or_else(
        || std::path::PathBuf::from(STORE_FILE_NAME),
        |dir| dir.join("carebook").join(STORE_FILE_NAME),
    )
}
