//! Input files of one compilation run.

use std::fmt;
use std::path::{Path, PathBuf};

/// Index of a file in the [`SourceMap`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SourceId(u32);

impl SourceId {
    /// Sentinel for declarations that have no source text.
    pub const BUILTIN: SourceId = SourceId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        SourceId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::BUILTIN
    }
}

impl fmt::Debug for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::BUILTIN {
            write!(f, "SourceId::BUILTIN")
        } else {
            write!(f, "SourceId({})", self.0)
        }
    }
}

/// One schema input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    /// Display name of the file (its path as given).
    pub fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// All schema inputs, in the order they were given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file and return its id.
    pub fn add(&mut self, path: impl AsRef<Path>, text: impl Into<String>) -> SourceId {
        let index = u32::try_from(self.files.len()).unwrap_or(u32::MAX - 1);
        self.files.push(SourceFile {
            path: path.as_ref().to_path_buf(),
            text: text.into(),
        });
        SourceId(index)
    }

    /// Look up a file. Returns `None` for [`SourceId::BUILTIN`].
    pub fn get(&self, id: SourceId) -> Option<&SourceFile> {
        self.files.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate files with their ids, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (SourceId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, f)| (SourceId(u32::try_from(i).unwrap_or(u32::MAX - 1)), f))
    }

    /// Names of all files, in input order.
    pub fn names(&self) -> Vec<String> {
        self.files.iter().map(SourceFile::name).collect()
    }
}
