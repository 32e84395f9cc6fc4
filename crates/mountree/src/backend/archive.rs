//! Archive member backend.
//!
//! Exposes one regular-file member of a tar archive (plain or gzip'd) as a
//! read-only file. The archive is reopened and scanned on every read, so no
//! stream outlives the call that needed it.

use super::{FileBackend, WriteMode};
use crate::error::{VfsError, VfsResult};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tar::Archive;

/// Container format of an archive on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGzip,
}

impl ArchiveFormat {
    /// Guess the format from the file name: `.tar.gz` / `.tgz` are gzip'd,
    /// anything else is read as a plain tar.
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            ArchiveFormat::TarGzip
        } else {
            ArchiveFormat::Tar
        }
    }
}

/// A file entry backed by a member of an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    archive: PathBuf,
    format: ArchiveFormat,
    member: String,
    size: u64,
}

impl ArchiveEntry {
    /// Scan an archive and return one backend per regular-file member.
    ///
    /// Directory members are skipped; the namespace creates directories
    /// implicitly when the files beneath them are added.
    pub fn scan(archive: impl Into<PathBuf>) -> VfsResult<Vec<ArchiveEntry>> {
        let archive = archive.into();
        let format = ArchiveFormat::detect(&archive);
        let mut reader = open(&archive, format)?;

        let mut members = Vec::new();
        for entry in reader.entries()? {
            let entry = entry?;
            if !entry.header().entry_type().is_file() {
                continue;
            }
            let member = member_name(&entry)?;
            if member.is_empty() {
                continue;
            }
            members.push(ArchiveEntry {
                archive: archive.clone(),
                format,
                member,
                size: entry.size(),
            });
        }
        Ok(members)
    }

    /// The member's path inside the archive, without a leading `./`.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// The archive file on disk.
    pub fn archive_path(&self) -> &Path {
        &self.archive
    }

    pub fn format(&self) -> ArchiveFormat {
        self.format
    }
}

fn open(path: &Path, format: ArchiveFormat) -> VfsResult<Archive<Box<dyn Read>>> {
    let file = BufReader::new(File::open(path)?);
    let reader: Box<dyn Read> = match format {
        ArchiveFormat::Tar => Box::new(file),
        ArchiveFormat::TarGzip => Box::new(GzDecoder::new(file)),
    };
    Ok(Archive::new(reader))
}

fn member_name<R: Read>(entry: &tar::Entry<'_, R>) -> VfsResult<String> {
    let path = entry.path()?;
    let name = path.to_string_lossy();
    Ok(name.trim_start_matches("./").trim_end_matches('/').to_string())
}

impl FileBackend for ArchiveEntry {
    fn read_all(&self) -> VfsResult<Vec<u8>> {
        // A member name may repeat; like tar extraction, the last copy wins.
        let mut reader = open(&self.archive, self.format)?;
        let mut found = None;
        for entry in reader.entries()? {
            let mut entry = entry?;
            if entry.header().entry_type().is_file() && member_name(&entry)? == self.member {
                let mut data = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut data)?;
                found = Some(data);
            }
        }
        found.ok_or_else(|| {
            VfsError::NotFound(format!("{} in {}", self.member, self.archive.display()))
        })
    }

    fn size(&self) -> VfsResult<u64> {
        Ok(self.size)
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn write(&mut self, _data: &[u8], _mode: WriteMode) -> VfsResult<()> {
        Err(VfsError::read_only(format!("archive member {}", self.member)))
    }

    fn read_into(&self, buffer: &mut [u8], offset: usize, length: usize) -> VfsResult<usize> {
        // Check against the header size before paying for decompression.
        let needed = usize::try_from(self.size)
            .map_err(|_| VfsError::Io(format!("member too large: {}", self.member)))?;
        super::check_window(buffer.len(), offset, length, needed)?;
        let data = self.read_all()?;
        super::copy_into(&data, buffer, offset, length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;

    fn append_file<W: Write>(builder: &mut tar::Builder<W>, path: &str, data: &[u8]) {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append_data(&mut header, path, data).unwrap();
    }

    fn append_dir<W: Write>(builder: &mut tar::Builder<W>, path: &str) {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        builder.append_data(&mut header, path, std::io::empty()).unwrap();
    }

    fn build_tar(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("bundle.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        append_dir(&mut builder, "docs/");
        append_file(&mut builder, "docs/readme.txt", b"read me");
        append_file(&mut builder, "./bin/tool", b"\x7fELF");
        builder.into_inner().unwrap().flush().unwrap();
        path
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(ArchiveFormat::detect(Path::new("a.tar")), ArchiveFormat::Tar);
        assert_eq!(ArchiveFormat::detect(Path::new("a.TGZ")), ArchiveFormat::TarGzip);
        assert_eq!(
            ArchiveFormat::detect(Path::new("/x/a.tar.gz")),
            ArchiveFormat::TarGzip
        );
    }

    #[test]
    fn test_scan_skips_directories() {
        let dir = TempDir::new().unwrap();
        let members = ArchiveEntry::scan(build_tar(&dir)).unwrap();

        let names: Vec<_> = members.iter().map(|m| m.member()).collect();
        assert_eq!(names, vec!["docs/readme.txt", "bin/tool"]);
        assert_eq!(members[0].size().unwrap(), 7);
    }

    #[test]
    fn test_read_member() {
        let dir = TempDir::new().unwrap();
        let members = ArchiveEntry::scan(build_tar(&dir)).unwrap();
        assert_eq!(members[0].read_as_text().unwrap(), "read me");
        assert_eq!(members[1].read_all().unwrap(), b"\x7fELF");
    }

    #[test]
    fn test_gzip_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bundle.tar.gz");
        let encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        let mut builder = tar::Builder::new(encoder);
        append_file(&mut builder, "a/b.txt", b"zipped");
        builder.into_inner().unwrap().finish().unwrap();

        let members = ArchiveEntry::scan(&path).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].format(), ArchiveFormat::TarGzip);
        assert_eq!(members[0].read_all().unwrap(), b"zipped");
    }

    #[test]
    fn test_write_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let mut member = ArchiveEntry::scan(build_tar(&dir)).unwrap().remove(0);
        assert!(member.is_read_only());
        let err = member.write(b"x", WriteMode::Overwrite).unwrap_err();
        assert!(matches!(err, VfsError::UnsupportedOperation(_)));
        let err = member.write_text("x", WriteMode::Append).unwrap_err();
        assert!(matches!(err, VfsError::UnsupportedOperation(_)));
    }

    #[test]
    fn test_read_into_buffer_too_small() {
        let dir = TempDir::new().unwrap();
        let member = ArchiveEntry::scan(build_tar(&dir)).unwrap().remove(0);

        let mut buffer = [0u8; 8];
        let err = member.read_into(&mut buffer, 2, 8).unwrap_err();
        assert_eq!(
            err,
            VfsError::BufferTooSmall {
                needed: 7,
                available: 6
            }
        );
        assert_eq!(member.read_into(&mut buffer, 1, 8).unwrap(), 7);
        assert_eq!(&buffer[1..], b"read me");
    }

    #[test]
    fn test_duplicate_member_last_copy_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dup.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        append_file(&mut builder, "dup.txt", b"first");
        append_file(&mut builder, "dup.txt", b"second!");
        builder.into_inner().unwrap().flush().unwrap();

        let last = ArchiveEntry::scan(&path).unwrap().pop().unwrap();
        assert_eq!(last.size().unwrap(), 7);
        assert_eq!(last.read_all().unwrap(), b"second!");

        let mut buffer = [0u8; 7];
        assert_eq!(last.read_into(&mut buffer, 0, 7).unwrap(), 7);
        assert_eq!(&buffer, b"second!");
    }

    #[test]
    fn test_read_into_empty_member_offset_past_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.tar");
        let mut builder = tar::Builder::new(File::create(&path).unwrap());
        append_file(&mut builder, "empty", b"");
        builder.into_inner().unwrap().flush().unwrap();

        let member = ArchiveEntry::scan(&path).unwrap().remove(0);
        let mut buffer = [0u8; 4];
        assert!(matches!(
            member.read_into(&mut buffer, 10, 10),
            Err(VfsError::BufferTooSmall { .. })
        ));
        assert_eq!(member.read_into(&mut buffer, 4, 4).unwrap(), 0);
    }
}
