// crates/loopdesk-media/src/helpers/mod.rs
//
// Internal helpers. Not re-exported from lib.rs.

pub mod seek;
