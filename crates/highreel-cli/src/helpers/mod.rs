// crates/highreel-cli/src/helpers/mod.rs

pub mod format;
