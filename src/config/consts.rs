/// Default fuel level for WASM execution (100 million instructions)
pub const DEFAULT_FUEL_LEVEL: u64 = 100_000_000;
/// Minimum allowed fuel level (1 million instructions)
pub const MIN_FUEL_LEVEL: u64 = 1_000_000;
/// Maximum allowed fuel level (500 million instructions) - security limit
pub const MAX_FUEL_LEVEL: u64 = 500_000_000;

/// Longest accepted tick frequency (one year)
pub const MAX_TICK_FREQUENCY: std::time::Duration = std::time::Duration::from_secs(365 * 24 * 60 * 60);

/// Output used by emitters that don't name one
pub const DEFAULT_OUTPUT: &str = "console";
/// Parameter injected into every produce call with the emitter's name
pub const EMITTER_NAME_PARAM: &str = "emitter.name";
