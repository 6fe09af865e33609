use std::collections::HashMap;

use base64::Engine as _;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::error::SyncResult;

/// What a cached texture shows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TextureKey {
    /// Last frame fetched from `/update_view/{camera_id}`
    CameraView(String),
    /// Newest frame of the live MJPEG feed
    StreamFeed,
}

impl TextureKey {
    fn name(&self) -> String {
        match self {
            TextureKey::CameraView(camera_id) => format!("view_{camera_id}"),
            TextureKey::StreamFeed => "stream_feed".to_owned(),
        }
    }
}

/// Decode an encoded frame (PNG, JPEG, ...) into an egui image
pub fn decode_frame(bytes: &[u8]) -> SyncResult<ColorImage> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Decode the base64 `image` field of a view response
pub fn decode_base64_frame(encoded: &str) -> SyncResult<ColorImage> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
    decode_frame(&bytes)
}

/// Owns the GPU textures for camera views and the live stream.
///
/// Updating a key reuses its handle so the texture id painted by the
/// surfaces stays stable between frames.
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<TextureKey, TextureHandle>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the image shown for `key`
    pub fn set_image(&mut self, ctx: &Context, key: TextureKey, image: ColorImage) {
        match self.textures.get_mut(&key) {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => {
                let handle = ctx.load_texture(key.name(), image, TextureOptions::LINEAR);
                self.textures.insert(key, handle);
            }
        }
    }

    pub fn texture_id(&self, key: &TextureKey) -> Option<TextureId> {
        self.textures.get(key).map(|handle| handle.id())
    }

    pub fn remove(&mut self, key: &TextureKey) {
        self.textures.remove(key);
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_base64_png() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 3));
        let image = decode_base64_frame(&encoded).unwrap();
        assert_eq!(image.size, [4, 3]);
        assert_eq!(image.pixels[0], egui::Color32::RED);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_base64_frame("not base64!").is_err());
        assert!(decode_frame(b"definitely not an image").is_err());
    }

    #[test]
    fn test_set_image_reuses_handle() {
        let ctx = Context::default();
        let mut textures = TextureManager::new();
        let key = TextureKey::CameraView("A".into());

        textures.set_image(&ctx, key.clone(), ColorImage::new([2, 2], egui::Color32::BLACK));
        let first = textures.texture_id(&key);
        textures.set_image(&ctx, key.clone(), ColorImage::new([3, 3], egui::Color32::WHITE));

        assert_eq!(textures.texture_id(&key), first);
        assert_eq!(textures.len(), 1);
        assert!(textures.texture_id(&TextureKey::StreamFeed).is_none());
    }
}
