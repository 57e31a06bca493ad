//! # Typed Requests
//!
//! Multipart forms are parsed into these structs at the boundary; the
//! service and engine never see raw form fields.
//!
//! | endpoint  | fields                          |
//! |-----------|---------------------------------|
//! | `/encode` | `file`, `message`, `password`   |
//! | `/decode` | `password`                      |
//!
//! Unknown fields are ignored. A missing field, or a text field that is not
//! valid UTF-8, is a [`RequestError`].

use axum::extract::multipart::{Field, Multipart, MultipartError};
use thiserror::Error;
use zeroize::Zeroizing;

/// Malformed request at the HTTP boundary.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Failed to read multipart data: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Missing form field '{0}'")]
    MissingField(&'static str),

    #[error("Form field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),
}

/// Read a text field, rejecting invalid UTF-8 instead of replacing it.
async fn utf8_field(field: Field<'_>, name: &'static str) -> Result<String, RequestError> {
    let bytes = field.bytes().await?;
    String::from_utf8(bytes.to_vec()).map_err(|_| RequestError::InvalidUtf8(name))
}

/// Cover image, message and password for `POST /encode`.
pub struct EncodeRequest {
    pub image: Vec<u8>,
    pub filename: Option<String>,
    pub message: String,
    pub password: Zeroizing<String>,
}

/// Password for `POST /decode`.
pub struct DecodeRequest {
    pub password: Zeroizing<String>,
}

impl EncodeRequest {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, RequestError> {
        let mut image = None;
        let mut filename = None;
        let mut message = None;
        let mut password = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    filename = field.file_name().map(str::to_string);
                    image = Some(field.bytes().await?.to_vec());
                }
                "message" => message = Some(utf8_field(field, "message").await?),
                "password" => {
                    password = Some(Zeroizing::new(utf8_field(field, "password").await?))
                }
                _ => {}
            }
        }

        Ok(Self {
            image: image.ok_or(RequestError::MissingField("file"))?,
            filename,
            message: message.ok_or(RequestError::MissingField("message"))?,
            password: password.ok_or(RequestError::MissingField("password"))?,
        })
    }
}

impl DecodeRequest {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, RequestError> {
        let mut password = None;

        while let Some(field) = multipart.next_field().await? {
            if field.name() == Some("password") {
                password = Some(Zeroizing::new(utf8_field(field, "password").await?));
            }
        }

        Ok(Self {
            password: password.ok_or(RequestError::MissingField("password"))?,
        })
    }
}
