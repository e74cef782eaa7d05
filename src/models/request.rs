use bytes::Bytes;

/// A file part received under the `file` field of an upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadedFile {
    pub fn new(name: String, content: Bytes) -> Self {
        let size = content.len();
        Self {
            name,
            size,
            content,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: String) -> Self {
        self.mime_type = Some(mime_type);
        self
    }

    /// Literal, case-sensitive `.pdf` suffix check; content type and magic
    /// bytes are not consulted.
    pub fn has_pdf_extension(&self) -> bool {
        self.name.ends_with(".pdf")
    }
}
