/*!
 * Document rendering.
 *
 * A template blob is a DOCX archive. The body (`word/document.xml`) is
 * rendered first, then headers and footers with what is left of the context;
 * every other part is copied as is.
 */

use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::conversion::normalize::NormalizedEntry;
use crate::conversion::template::{ConversionContext, Template};
use crate::errors::{RenderError, SubtitleError};

/// Main document part every template must provide
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Immutable template bytes, shared by every conversion in a run.
///
/// Cloning only bumps a reference count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBlob(Bytes);

impl TemplateBlob {
    /// Wrap template bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Read a template from disk
    pub async fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::new(tokio::fs::read(path).await?))
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a zero-length blob
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct Part {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

fn is_rendered_part(name: &str) -> bool {
    name == DOCUMENT_PART
        || ((name.starts_with("word/header") || name.starts_with("word/footer")) && name.ends_with(".xml"))
}

/// Render a document from `template` for one file
pub fn render_document<I>(template: &TemplateBlob, mut context: ConversionContext<I>) -> Result<Vec<u8>, RenderError>
where
    I: Iterator<Item = Result<NormalizedEntry, SubtitleError>>,
{
    let mut archive = ZipArchive::new(Cursor::new(template.as_bytes()))?;
    let mut parts = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let mut file = archive.by_index(idx)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        parts.push(Part {
            name: file.name().to_string(),
            data,
            is_dir: file.is_dir(),
        });
    }

    let body = parts
        .iter()
        .position(|part| part.name == DOCUMENT_PART)
        .ok_or_else(|| RenderError::MissingPart(DOCUMENT_PART.to_string()))?;
    let mut order = vec![body];
    order.extend((0..parts.len()).filter(|&idx| idx != body && is_rendered_part(&parts[idx].name)));

    for idx in order {
        let part = &mut parts[idx];
        let xml = std::str::from_utf8(&part.data).map_err(|_| RenderError::Encoding(part.name.clone()))?;
        let compiled = Template::compile(xml)?;
        if compiled.is_static() {
            continue;
        }
        part.data = compiled.render(&mut context)?.into_bytes();
    }

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(template.len())));
    for part in parts {
        if part.is_dir {
            writer.add_directory(part.name, options)?;
        } else {
            writer.start_file(part.name, options)?;
            writer.write_all(&part.data)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}
