//! Environment helpers shared by the LFI search binaries

pub mod constants;
pub mod env_utils;

pub use constants::{DATA_GENERATED, LFI_GA_DIR_VAR, RECORDS};
pub use env_utils::{EnvError, get_data_generated_dir, get_lfi_dir, get_records_dir};
