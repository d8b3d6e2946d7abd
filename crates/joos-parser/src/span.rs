//! Source positions and the source manager.
//!
//! A [`Span`] carries a file id plus first/last line and column, exactly as
//! required by spec §3: positions are used only for diagnostics and for the
//! forward-reference ordering rule on field initializers (`<` on positions
//! within one file).

use serde::Serialize;
use std::fmt;

/// Identifier for a source file, assigned in increasing order by
/// [`SourceManager::add_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileId(pub u32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file#{}", self.0)
    }
}

/// A source range: (file, first line/col, last line/col), 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub file: FileId,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(file: FileId, start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Span { file, start_line, start_col, end_line, end_col }
    }

    /// A zero-width span used for synthetic nodes (e.g. implicit `Object`
    /// super-class references).
    pub fn synthetic(file: FileId) -> Self {
        Span::new(file, 0, 0, 0, 0)
    }

    /// Combine two spans from the same file into one covering range.
    pub fn merge(&self, other: &Span) -> Span {
        debug_assert_eq!(self.file, other.file, "cannot merge spans across files");
        Span::new(self.file, self.start_line, self.start_col, other.end_line, other.end_col)
    }

    /// Total order used by the forward-reference rule in field initializers:
    /// `g.position < f.position` within the same file.
    pub fn precedes(&self, other: &Span) -> bool {
        debug_assert_eq!(self.file, other.file, "position comparison across files is meaningless");
        (self.start_line, self.start_col) < (other.start_line, other.start_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{}",
            self.file, self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}

/// Owns the mapping from [`FileId`] to file name and source text, and hands
/// out monotonically increasing ids (spec §3: "The source manager assigns
/// monotonically increasing file ids").
#[derive(Debug, Default)]
pub struct SourceManager {
    files: Vec<(String, String)>,
}

impl SourceManager {
    pub fn new() -> Self {
        SourceManager { files: Vec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> FileId {
        let id = FileId(self.files.len() as u32);
        self.files.push((name.into(), source.into()));
        id
    }

    pub fn name(&self, id: FileId) -> &str {
        &self.files[id.0 as usize].0
    }

    pub fn source(&self, id: FileId) -> &str {
        &self.files[id.0 as usize].1
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = FileId> {
        (0..self.files.len() as u32).map(FileId)
    }
}

/// Adapter so [`SourceManager`] can back a `codespan_reporting::files::Files`
/// implementation without that crate leaking into every caller.
impl<'a> codespan_reporting::files::Files<'a> for SourceManager {
    type FileId = usize;
    type Name = &'a str;
    type Source = &'a str;

    fn name(&'a self, id: usize) -> Result<&'a str, codespan_reporting::files::Error> {
        Ok(&self.files[id].0)
    }

    fn source(&'a self, id: usize) -> Result<&'a str, codespan_reporting::files::Error> {
        Ok(&self.files[id].1)
    }

    fn line_index(&'a self, id: usize, byte_index: usize) -> Result<usize, codespan_reporting::files::Error> {
        let source = &self.files[id].1;
        Ok(source[..byte_index.min(source.len())].matches('\n').count())
    }

    fn line_range(
        &'a self,
        id: usize,
        line_index: usize,
    ) -> Result<std::ops::Range<usize>, codespan_reporting::files::Error> {
        let source = &self.files[id].1;
        let mut start = 0;
        let mut lines = source.match_indices('\n').map(|(i, _)| i + 1);
        for _ in 0..line_index {
            start = lines.next().ok_or(codespan_reporting::files::Error::LineTooLarge {
                given: line_index,
                max: 0,
            })?;
        }
        let end = lines.next().unwrap_or(source.len());
        Ok(start..end)
    }
}
