//! Attachment archive inspection.
//!
//! Attachments are conventionally JAR files; this module reads the archive
//! directory without extracting contents.

use std::io::Cursor;

use zip::ZipArchive;

use crate::error::GatewayError;

/// List the entry names of a ZIP/JAR archive in archive order.
pub fn list_archive_entries(bytes: &[u8]) -> Result<Vec<String>, GatewayError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(|e| {
        GatewayError::MalformedInput(format!("attachment is not a readable archive: {e}"))
    })?;

    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index).map_err(|e| {
            GatewayError::MalformedInput(format!("unreadable archive entry {index}: {e}"))
        })?;
        names.push(entry.name().to_owned());
    }
    Ok(names)
}
