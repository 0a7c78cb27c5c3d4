use crate::error::{CaptchaError, Result};
use base64::{engine::general_purpose, Engine as _};
use image::DynamicImage;
use std::path::PathBuf;
use std::time::Duration;

/// Content types accepted from captcha links
pub const SUPPORTED_CONTENT_TYPES: [&str; 1] = ["image/jpeg"];

/// Where a captcha image comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
    /// Base64 payload, optionally with a `data:<mime>;base64,` prefix
    Base64(String),
    Url(String),
}

impl ImageSource {
    /// Classify a command-line style input: links, data URIs, else a file path
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http://") || input.starts_with("https://") {
            Self::Url(input.to_string())
        } else if input.starts_with("data:") {
            Self::Base64(input.to_string())
        } else {
            Self::Path(PathBuf::from(input))
        }
    }

    /// Reference recorded for unsolved captchas
    pub fn identifier(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
            Self::Bytes(_) | Self::Base64(_) => "<memory>".to_string(),
        }
    }

    /// Fetch and decode the image
    pub fn load(&self, timeout: Duration) -> Result<DynamicImage> {
        let image = match self {
            Self::Path(path) => image::open(path)?,
            Self::Bytes(bytes) => image::load_from_memory(bytes)?,
            Self::Base64(payload) => image::load_from_memory(&decode_base64(payload)?)?,
            Self::Url(url) => image::load_from_memory(&fetch(url, timeout)?)?,
        };
        Ok(image)
    }
}

/// Decode a base64 image payload, dropping any data URI header
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let data = match payload.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(rest, |(_, data)| data),
        None => payload,
    };
    Ok(general_purpose::STANDARD.decode(data.trim())?)
}

/// Verify a declared content type against `SUPPORTED_CONTENT_TYPES`.
/// Parameters such as `; charset=...` are ignored.
pub fn check_content_type(content_type: Option<&str>) -> Result<()> {
    let declared = content_type.unwrap_or_default();
    let mime = declared.split(';').next().unwrap_or_default().trim();

    if SUPPORTED_CONTENT_TYPES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(mime))
    {
        Ok(())
    } else {
        Err(CaptchaError::UnsupportedContentType(if declared.is_empty() {
            "<missing>".to_string()
        } else {
            declared.to_string()
        }))
    }
}

/// Download a captcha image.
///
/// The declared content type is checked before the body is read, so an
/// unsupported response never reaches the decoder.
pub fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>> {
    let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;

    let response = client.get(url).send()?;

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());
    check_content_type(content_type)?;

    let bytes = response.error_for_status()?.bytes()?;
    tracing::debug!(url, size = bytes.len(), "captcha image fetched");

    Ok(bytes.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources() {
        assert_eq!(
            ImageSource::parse("https://images-na.ssl-images-amazon.com/captcha/abc.jpg"),
            ImageSource::Url("https://images-na.ssl-images-amazon.com/captcha/abc.jpg".to_string())
        );
        assert_eq!(
            ImageSource::parse("captchas/abc.jpg"),
            ImageSource::Path(PathBuf::from("captchas/abc.jpg"))
        );
        assert!(matches!(
            ImageSource::parse("data:image/jpeg;base64,AAAA"),
            ImageSource::Base64(_)
        ));
    }

    #[test]
    fn test_identifier() {
        assert_eq!(ImageSource::Url("http://x/y.jpg".to_string()).identifier(), "http://x/y.jpg");
        assert_eq!(ImageSource::Bytes(vec![1, 2]).identifier(), "<memory>");
    }

    #[test]
    fn test_check_content_type() {
        assert!(check_content_type(Some("image/jpeg")).is_ok());
        assert!(check_content_type(Some("IMAGE/JPEG; charset=binary")).is_ok());

        let err = check_content_type(Some("text/html")).unwrap_err();
        assert!(matches!(err, CaptchaError::UnsupportedContentType(ref t) if t == "text/html"));

        assert!(matches!(
            check_content_type(Some("image/png")),
            Err(CaptchaError::UnsupportedContentType(_))
        ));
        assert!(matches!(
            check_content_type(None),
            Err(CaptchaError::UnsupportedContentType(ref t)) if t == "<missing>"
        ));
    }

    #[test]
    fn test_decode_base64() {
        assert_eq!(decode_base64("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode_base64("data:image/jpeg;base64,aGVsbG8=").unwrap(), b"hello");
        assert!(matches!(decode_base64("%%%"), Err(CaptchaError::Base64(_))));
    }

    #[test]
    fn test_load_undecodable_bytes() {
        let source = ImageSource::Bytes(b"not an image".to_vec());
        assert!(matches!(
            source.load(Duration::from_secs(1)),
            Err(CaptchaError::Image(_))
        ));
    }
}
