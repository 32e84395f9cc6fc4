//! Library half of the `mountree` binary: manifest loading and command output.

pub mod commands;
pub mod manifest;

pub use manifest::{MountConfig, MountManifest};
