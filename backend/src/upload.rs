use actix_multipart::Multipart;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::{StreamExt, TryStreamExt};
use image::ImageFormat;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".webp"];
const FILE_FIELD: &str = "file";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum UploadError {
    #[error("No file uploaded. Send the image as multipart field 'file'")]
    MissingFile,
    #[error("Invalid file type. Allowed types: {}", ALLOWED_EXTENSIONS.join(", "))]
    InvalidType,
    #[error("File too large. Maximum size is {}MB", .max_bytes / (1024 * 1024))]
    TooLarge { max_bytes: usize },
    #[error("File content is not a valid JPEG, PNG or WebP image")]
    UnrecognizedContent,
    #[error("Error reading upload: {0}")]
    Read(String),
}

/// A validated image ready to be forwarded to the vision API.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

pub fn check_extension(filename: &str) -> Result<(), UploadError> {
    let extension = filename
        .rfind('.')
        .map(|i| filename[i..].to_lowercase())
        .unwrap_or_default();
    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(UploadError::InvalidType)
    }
}

impl ImageUpload {
    pub fn validate(filename: String, bytes: Vec<u8>) -> Result<Self, UploadError> {
        check_extension(&filename)?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(UploadError::TooLarge { max_bytes: MAX_FILE_SIZE });
        }

        let format = match image::guess_format(&bytes) {
            Ok(f @ (ImageFormat::Jpeg | ImageFormat::Png | ImageFormat::WebP)) => f,
            _ => return Err(UploadError::UnrecognizedContent),
        };

        Ok(Self {
            filename,
            bytes,
            format,
        })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// Pulls the `file` field out of a multipart body. Reading stops as soon as
/// the field outgrows `MAX_FILE_SIZE`.
pub async fn read_image_field(mut payload: Multipart) -> Result<ImageUpload, UploadError> {
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| UploadError::Read(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| UploadError::Read(e.to_string()))?;
            }
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .unwrap_or_default()
            .to_string();
        check_extension(&filename)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk.map_err(|e| UploadError::Read(e.to_string()))?;
            if bytes.len() + data.len() > MAX_FILE_SIZE {
                return Err(UploadError::TooLarge { max_bytes: MAX_FILE_SIZE });
            }
            bytes.extend_from_slice(&data);
        }

        return ImageUpload::validate(filename, bytes);
    }

    Err(UploadError::MissingFile)
}
