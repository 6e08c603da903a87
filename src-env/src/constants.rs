/// Environment variable pointing to the project root
pub const LFI_GA_DIR_VAR: &str = "LFI_GA_DIR";

/// Directory, relative to the project root, for everything a run produces
pub const DATA_GENERATED: &str = "data_generated";

/// Subdirectory of [`DATA_GENERATED`] for per-generation recordings
pub const RECORDS: &str = "records";
