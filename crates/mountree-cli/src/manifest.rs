//! Mount manifest.
//!
//! A manifest lists what to mount where. It is loaded from
//! `~/.config/mountree/mounts.toml` unless a path is given explicitly:
//!
//! ```toml
//! [[mounts]]
//! kind = "archive"
//! source = "assets.tar.gz"
//! target = "/assets"
//!
//! [[mounts]]
//! kind = "memory"
//! target = "/motd"
//! content = "welcome"
//! ```
//!
//! Relative `source` paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use mountree::{MemoryFile, Namespace, OsFile};
use serde::{Deserialize, Serialize};

/// The list of mounts that make up a namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MountManifest {
    #[serde(default)]
    pub mounts: Vec<MountConfig>,

    /// Directory relative sources are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// One mount, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MountConfig {
    /// A single real file.
    Os {
        source: PathBuf,
        target: String,
        #[serde(default)]
        read_only: bool,
    },
    /// A real directory, mounted recursively.
    OsDir {
        source: PathBuf,
        target: String,
        #[serde(default)]
        read_only: bool,
    },
    /// Every regular member of a tar or tar.gz archive.
    Archive { source: PathBuf, target: String },
    /// Inline text.
    Memory {
        target: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        read_only: bool,
    },
    /// An explicit, possibly empty, directory.
    Directory { target: String },
}

impl MountConfig {
    pub fn target(&self) -> &str {
        match self {
            MountConfig::Os { target, .. }
            | MountConfig::OsDir { target, .. }
            | MountConfig::Archive { target, .. }
            | MountConfig::Memory { target, .. }
            | MountConfig::Directory { target } => target,
        }
    }
}

impl MountManifest {
    /// Load the manifest from the default path.
    ///
    /// If the file doesn't exist, returns an empty manifest.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            tracing::debug!("No manifest at {}, starting empty", path.display());
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load the manifest from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

        let mut manifest: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse manifest from {}", path.display()))?;
        manifest.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(manifest)
    }

    /// Get the default manifest path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", "mountree")
            .context("Could not determine config directory")?;

        Ok(dirs.config_dir().join("mounts.toml"))
    }

    fn resolve_source(&self, source: &Path) -> PathBuf {
        if source.is_absolute() {
            source.to_path_buf()
        } else {
            self.base_dir.join(source)
        }
    }

    /// Build a namespace by applying every mount in order.
    pub fn build(&self) -> Result<Namespace> {
        let mut ns = Namespace::new();
        for mount in &self.mounts {
            self.apply(&mut ns, mount)
                .with_context(|| format!("Failed to mount {}", mount.target()))?;
        }
        tracing::info!(mounts = self.mounts.len(), entries = ns.len(), "namespace ready");
        Ok(ns)
    }

    fn apply(&self, ns: &mut Namespace, mount: &MountConfig) -> Result<()> {
        match mount {
            MountConfig::Os {
                source,
                target,
                read_only,
            } => {
                let source = self.resolve_source(source);
                let backend = if *read_only {
                    OsFile::read_only(source)
                } else {
                    OsFile::new(source)
                };
                ns.add(target, backend)?;
            }
            MountConfig::OsDir {
                source,
                target,
                read_only,
            } => {
                ns.mount_os_dir(self.resolve_source(source), target, *read_only)?;
            }
            MountConfig::Archive { source, target } => {
                ns.mount_archive(self.resolve_source(source), target)?;
            }
            MountConfig::Memory {
                target,
                content,
                read_only,
            } => {
                let backend = if *read_only {
                    MemoryFile::read_only(content.as_bytes())
                } else {
                    MemoryFile::new(content.as_bytes())
                };
                ns.add(target, backend)?;
            }
            MountConfig::Directory { target } => {
                ns.create_directory(target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_manifest() {
        let manifest: MountManifest = toml::from_str("").expect("parse failed");
        assert!(manifest.mounts.is_empty());
    }

    #[test]
    fn test_parse_all_kinds() {
        let toml = r#"
[[mounts]]
kind = "os"
source = "/etc/hostname"
target = "/host/name"
read_only = true

[[mounts]]
kind = "os_dir"
source = "src"
target = "/src"

[[mounts]]
kind = "archive"
source = "assets.tgz"
target = "/assets"

[[mounts]]
kind = "memory"
target = "/motd"
content = "hi"

[[mounts]]
kind = "directory"
target = "/scratch"
"#;

        let manifest: MountManifest = toml::from_str(toml).expect("parse failed");
        assert_eq!(manifest.mounts.len(), 5);
        assert_eq!(
            manifest.mounts[0],
            MountConfig::Os {
                source: PathBuf::from("/etc/hostname"),
                target: "/host/name".to_string(),
                read_only: true,
            }
        );
        assert_eq!(manifest.mounts[1].target(), "/src");
        assert_eq!(
            manifest.mounts[3],
            MountConfig::Memory {
                target: "/motd".to_string(),
                content: "hi".to_string(),
                read_only: false,
            }
        );
        assert_eq!(
            manifest.mounts[4],
            MountConfig::Directory {
                target: "/scratch".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let toml = r#"
[[mounts]]
kind = "ftp"
target = "/x"
"#;
        assert!(toml::from_str::<MountManifest>(toml).is_err());
    }

    #[test]
    fn test_build_resolves_relative_sources() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "from disk").unwrap();
        let manifest_path = dir.path().join("mounts.toml");
        std::fs::write(
            &manifest_path,
            r#"
[[mounts]]
kind = "os"
source = "notes.txt"
target = "/docs/notes.txt"

[[mounts]]
kind = "memory"
target = "/docs/generated.txt"
content = "generated"

[[mounts]]
kind = "directory"
target = "/empty"
"#,
        )
        .unwrap();

        let manifest = MountManifest::load_from(&manifest_path).unwrap();
        let ns = manifest.build().unwrap();
        assert_eq!(ns.read_file_as_text("/docs/notes.txt").unwrap(), "from disk");
        assert_eq!(
            ns.read_file_as_text("/docs/generated.txt").unwrap(),
            "generated"
        );
        assert!(ns.directory_exists("/empty"));
    }

    #[test]
    fn test_build_reports_failing_mount() {
        let manifest = MountManifest {
            mounts: vec![
                MountConfig::Memory {
                    target: "/a".to_string(),
                    content: String::new(),
                    read_only: false,
                },
                MountConfig::Directory {
                    target: "/a".to_string(),
                },
            ],
            base_dir: PathBuf::new(),
        };
        let err = manifest.build().unwrap_err();
        assert!(err.to_string().contains("Failed to mount /a"));
    }
}
