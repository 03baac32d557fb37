//! JSON course file output
//!
//! Courses are serialized into a temporary file next to the target and
//! renamed into place, so an interrupted or failed write never leaves a
//! truncated file at the output path.

use crate::transform::Course;
use crate::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Renders courses as an indented JSON array
///
/// Non-ASCII text is emitted as-is, not as `\u` escapes.
pub fn render_courses(courses: &[Course], indent: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(&indent));
    courses.serialize(&mut serializer)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes courses to `path` as a UTF-8 JSON array
///
/// # Arguments
///
/// * `path` - Destination file; replaced if it exists
/// * `courses` - Records to write, in order
/// * `indent` - Spaces per indentation level
///
/// # Returns
///
/// * `Ok(())` - The file is fully written
/// * `Err(CrawlerError)` - Nothing was written to `path`
pub fn write_courses(path: &Path, courses: &[Course], indent: usize) -> Result<()> {
    let bytes = render_courses(courses, indent)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        writer.write_all(&bytes)?;
        writer.flush()?;
    }
    temp.as_file().sync_all()?;
    temp.persist(path)?;

    tracing::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
