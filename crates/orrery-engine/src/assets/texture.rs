use std::collections::BTreeMap;

use crate::api::types::TextureId;
use crate::assets::error::DecodeError;

/// RGBA8 pixels ready for upload by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTexture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DecodedTexture {
    /// Decode a PNG or JPEG payload. The format is sniffed from the bytes.
    #[cfg(feature = "textures")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        use std::io::Cursor;
        let reader = image::ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let img = reader.decode()?.to_rgba8();
        Ok(Self {
            width: img.width(),
            height: img.height(),
            rgba: img.into_raw(),
        })
    }

    #[cfg(not(feature = "textures"))]
    pub fn from_bytes(_bytes: &[u8]) -> Result<Self, DecodeError> {
        Err(DecodeError::Disabled)
    }

    /// A flat single-colour texture.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let texels = (width * height) as usize;
        Self {
            width,
            height,
            rgba: rgba.iter().copied().cycle().take(texels * 4).collect(),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.rgba.len()
    }
}

/// Decoded textures by id. The host copies pixels out after `TEXTURE_READY`.
#[derive(Default)]
pub struct TextureStore {
    textures: BTreeMap<TextureId, DecodedTexture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TextureId, texture: DecodedTexture) {
        self.textures.insert(id, texture);
    }

    pub fn get(&self, id: TextureId) -> Option<&DecodedTexture> {
        self.textures.get(&id)
    }

    pub fn contains(&self, id: TextureId) -> bool {
        self.textures.contains_key(&id)
    }

    /// Pointer to the pixels of `id`, or null when absent.
    pub fn pixels_ptr(&self, id: TextureId) -> *const u8 {
        self.get(id).map_or(std::ptr::null(), |t| t.rgba.as_ptr())
    }

    pub fn pixels_len(&self, id: TextureId) -> usize {
        self.get(id).map_or(0, DecodedTexture::byte_len)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_fills_every_texel() {
        let tex = DecodedTexture::solid(2, 3, [1, 2, 3, 4]);
        assert_eq!(tex.byte_len(), 24);
        assert_eq!(&tex.rgba[20..24], &[1, 2, 3, 4]);
    }

    #[test]
    fn store_reports_missing_as_null() {
        let mut store = TextureStore::new();
        assert!(store.pixels_ptr(TextureId(1)).is_null());
        assert_eq!(store.pixels_len(TextureId(1)), 0);
        store.insert(TextureId(1), DecodedTexture::solid(1, 1, [255; 4]));
        assert!(!store.pixels_ptr(TextureId(1)).is_null());
        assert_eq!(store.pixels_len(TextureId(1)), 4);
        store.clear();
        assert!(store.is_empty());
    }

    #[cfg(feature = "textures")]
    #[test]
    fn decodes_png_to_rgba() {
        let mut png = Vec::new();
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let tex = DecodedTexture::from_bytes(&png).unwrap();
        assert_eq!((tex.width, tex.height), (4, 2));
        assert_eq!(&tex.rgba[0..4], &[10, 20, 30, 255]);
    }

    #[cfg(feature = "textures")]
    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(DecodedTexture::from_bytes(b"not an image").is_err());
    }
}
