//! Application-wide constants

/// Prefix of every permission token exchanged with the backend.
pub const TOKEN_PREFIX: &str = "prv";
/// Separator between token segments.
pub const TOKEN_SEPARATOR: char = '_';

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_LOG_FILE_PREFIX: &str = "hrm-server.log";
