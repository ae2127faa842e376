use std::path::Path;

const DEFAULT_NAME: &str = "uploaded_image";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        let name = if name.trim().is_empty() {
            DEFAULT_NAME.to_string()
        } else {
            name.to_string()
        };

        Self { name, bytes }
    }

    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(&name, bytes))
    }
}
