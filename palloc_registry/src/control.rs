//! Text control files exposed per group

use crate::binset::BinSet;
use crate::error::{PallocError, PallocResult};
use crate::registry::{GroupId, Registry};
use palloc::consts::BINS_FILE_NAME;
use std::fmt;
use std::str::FromStr;

/// Control files a group exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Comma separated list of allowed bins
    Bins,
}

impl FileKind {
    /// Every control file, in directory order
    pub const ALL: &'static [FileKind] = &[FileKind::Bins];

    /// File name as seen by operators
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bins => BINS_FILE_NAME,
        }
    }

    /// Resolve a file name
    pub fn from_name(name: &str) -> PallocResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| PallocError::UnsupportedFile {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FileKind {
    type Err = PallocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl Registry {
    /// Render a control file, newline terminated
    pub fn read(&self, group: GroupId, file: FileKind) -> PallocResult<String> {
        let record = self.record(group)?;
        match file {
            FileKind::Bins => {
                let (bins, version) = {
                    let _admin = record.lock_admin();
                    record.snapshot()
                };
                tracing::debug!(group = %group, %bins, version, "bins read");
                let mut out = bins.format();
                out.push('\n');
                Ok(out)
            }
        }
    }

    /// Replace a control file's contents, returning the bytes consumed
    ///
    /// Any error leaves the group's current state untouched.
    pub fn write(&self, group: GroupId, file: FileKind, text: &str) -> PallocResult<usize> {
        let record = self.record(group)?;
        let max = self.config().max_write_len;
        if text.len() > max {
            tracing::warn!(group = %group, file = %file, len = text.len(), max, "write rejected");
            return Err(PallocError::PayloadTooLarge {
                len: text.len(),
                max,
            });
        }

        match file {
            FileKind::Bins => {
                let bins = BinSet::parse(text, self.capacity()).map_err(|e| {
                    tracing::warn!(group = %group, input = text.trim(), "bins rejected: {}", e);
                    PallocError::from(e)
                })?;
                let version = {
                    let admin = record.lock_admin();
                    record.publish(&admin, &bins)
                };
                tracing::info!(group = %group, %bins, version, "bins updated");
            }
        }
        Ok(text.len())
    }

    /// [`read`](Self::read) addressed by file name
    pub fn read_file(&self, group: GroupId, name: &str) -> PallocResult<String> {
        self.read(group, name.parse()?)
    }

    /// [`write`](Self::write) addressed by file name
    pub fn write_file(&self, group: GroupId, name: &str, text: &str) -> PallocResult<usize> {
        self.write(group, name.parse()?, text)
    }
}
