//! Media payloads and their `multipart/form-data` encoding.
//!
//! The upload body always has exactly one part, a file field named `media`.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::Path;

use ureq::unversioned::multipart::{Form, Part};

use crate::error::ApiError;

/// Form field that carries the uploaded file.
pub const MEDIA_FIELD: &str = "media";

/// A filename paired with the bytes to upload.
#[derive(Debug)]
pub struct Media<R> {
    filename: String,
    reader: R,
}

impl<R: Read> Media<R> {
    pub fn new(filename: impl Into<String>, reader: R) -> Self {
        Self {
            filename: filename.into(),
            reader,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl Media<Cursor<Vec<u8>>> {
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(filename, Cursor::new(bytes.into()))
    }
}

impl Media<File> {
    /// Open the file at `path`; the upload filename is its last component.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
        Ok(Self::new(filename, File::open(path)?))
    }
}

/// An encoded multipart body and the content type announcing its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Encode `media` as a single-part form using ureq's multipart writer.
pub fn encode<R: Read>(media: &mut Media<R>) -> Result<MultipartBody, ApiError> {
    let filename = sanitize_filename(&media.filename);
    let part = Part::reader(&mut media.reader)
        .file_name(&filename)
        .mime_str("application/octet-stream")
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let mut form = Form::new().part(MEDIA_FIELD, part);
    let content_type = format!("multipart/form-data; boundary={}", form.boundary());

    let mut bytes = Vec::new();
    form.read_to_end(&mut bytes).map_err(ApiError::Stream)?;

    Ok(MultipartBody {
        content_type,
        bytes,
    })
}

// ureq copies the file name into the part header verbatim. Quotes and line
// breaks are percent-encoded as browsers do for `filename=`.
fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => out.push_str("%22"),
            '\r' => out.push_str("%0D"),
            '\n' => out.push_str("%0A"),
            c => out.push(c),
        }
    }
    out
}
