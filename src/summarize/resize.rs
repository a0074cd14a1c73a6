use std::io::Cursor;

use async_trait::async_trait;
use base64::{Engine, prelude::BASE64_STANDARD};
use image::{DynamicImage, ImageFormat, imageops::FilterType};

use crate::error::{Error, Result};
use crate::summarize::ImageResizer;

/// A `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl DataUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| Error::invalid_input("not a data URI"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| Error::invalid_input("data URI has no payload"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| Error::invalid_input("data URI is not base64 encoded"))?;

        let bytes = BASE64_STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::invalid_input(format!("invalid base64 payload: {e}")))?;

        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }

    pub fn encode(&self) -> String {
        format!("data:{};base64,{}", self.mime, BASE64_STANDARD.encode(&self.bytes))
    }
}

/// Scales images with the `image` crate. JPEG input stays JPEG; everything else becomes PNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateResizer;

impl ImageCrateResizer {
    pub fn downscale_bytes(bytes: &[u8], scale: f32) -> Result<(ImageFormat, Vec<u8>)> {
        let format = image::guess_format(bytes)
            .map_err(|e| Error::upstream_parse(format!("unrecognized image: {e}")))?;
        let img = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| Error::upstream_parse(format!("could not decode image: {e}")))?;

        let width = scaled(img.width(), scale);
        let height = scaled(img.height(), scale);
        let resized = img.resize_exact(width, height, FilterType::Triangle);

        let (format, resized) = match format {
            ImageFormat::Jpeg => (ImageFormat::Jpeg, DynamicImage::ImageRgb8(resized.to_rgb8())),
            _ => (ImageFormat::Png, resized),
        };

        let mut out = Cursor::new(Vec::new());
        resized
            .write_to(&mut out, format)
            .map_err(|e| Error::upstream_parse(format!("could not encode image: {e}")))?;

        Ok((format, out.into_inner()))
    }
}

fn scaled(dimension: u32, scale: f32) -> u32 {
    ((dimension as f32 * scale).round() as u32).max(1)
}

#[async_trait]
impl ImageResizer for ImageCrateResizer {
    async fn downscale(&self, data_uri: &str, scale: f32) -> Result<String> {
        let source = DataUri::parse(data_uri)?;

        let (format, bytes) =
            tokio::task::spawn_blocking(move || Self::downscale_bytes(&source.bytes, scale))
                .await
                .map_err(|e| Error::upstream_parse(format!("resize task failed: {e}")))??;

        Ok(DataUri {
            mime: format.to_mime_type().to_string(),
            bytes,
        }
        .encode())
    }
}

#[cfg(test)]
mod tests {
    use image::{GenericImageView, Rgba, RgbaImage};

    use super::*;

    fn png_data_uri(width: u32, height: u32) -> String {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255])));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        DataUri {
            mime: "image/png".to_string(),
            bytes: out.into_inner(),
        }
        .encode()
    }

    #[test]
    fn test_parse_data_uri() {
        let uri = DataUri::parse("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(uri.mime, "image/png");
        assert_eq!(uri.bytes, b"hello");
        assert_eq!(uri.encode(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(DataUri::parse("image/png;base64,aGVsbG8=").is_err());
        assert!(DataUri::parse("data:image/png;base64").is_err());
        assert!(DataUri::parse("data:image/png,aGVsbG8=").is_err());
        assert!(DataUri::parse("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_scaled_never_reaches_zero() {
        assert_eq!(scaled(100, 0.3), 30);
        assert_eq!(scaled(1, 0.3), 1);
        assert_eq!(scaled(10, 1.0), 10);
    }

    #[tokio::test]
    async fn test_downscale_png() {
        let resized = ImageCrateResizer
            .downscale(&png_data_uri(100, 50), 0.3)
            .await
            .unwrap();

        let uri = DataUri::parse(&resized).unwrap();
        assert_eq!(uri.mime, "image/png");
        let img = image::load_from_memory(&uri.bytes).unwrap();
        assert_eq!(img.dimensions(), (30, 15));
    }

    #[tokio::test]
    async fn test_downscale_rejects_non_image() {
        let not_an_image = DataUri {
            mime: "image/png".to_string(),
            bytes: b"plain text, not pixels".to_vec(),
        }
        .encode();

        let err = ImageCrateResizer.downscale(&not_an_image, 0.3).await.unwrap_err();
        assert!(matches!(err, Error::UpstreamParse(_)));
    }
}
