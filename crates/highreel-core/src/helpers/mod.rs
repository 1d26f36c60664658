// crates/highreel-core/src/helpers/mod.rs
//
// Pure helpers shared by highreel-media and highreel-cli.

pub mod geometry;
pub mod time;
