//! Palette texture collaborator used by texture color mode.

use std::cell::RefCell;

use hashbrown::HashMap;
use voxmesh_grid::Color;

use crate::constants::PALETTE_STRIP_HEIGHT;

/// Produces the texture sampled by palette UVs.
///
/// The strip must hold one texel per palette entry along `u`; `texture_width`
/// reports that width so UVs land on texel centers.
pub trait TextureFactory {
    type Texture;

    fn texture(&self, palette: &[Color]) -> Self::Texture;

    fn texture_width(&self, palette: &[Color]) -> usize {
        palette.len().max(1)
    }
}

/// CPU-side RGBA8 image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteTexture {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl PaletteTexture {
    pub fn texel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        let px = self.rgba.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// One row, one texel per palette entry. An empty palette yields a single
/// transparent texel.
#[derive(Clone, Copy, Debug, Default)]
pub struct PaletteStripFactory;

impl TextureFactory for PaletteStripFactory {
    type Texture = PaletteTexture;

    fn texture(&self, palette: &[Color]) -> PaletteTexture {
        let width = self.texture_width(palette);
        let height = PALETTE_STRIP_HEIGHT;
        let mut rgba = vec![0u8; width * height * 4];
        for row in rgba.chunks_exact_mut(width * 4) {
            for (px, c) in row.chunks_exact_mut(4).zip(palette) {
                px.copy_from_slice(&c.to_array());
            }
        }
        PaletteTexture {
            width,
            height,
            rgba,
        }
    }
}

/// Memoizes another factory by palette contents.
///
/// Callers meshing many models that share a palette get one texture back.
/// Wrap a factory whose texture is an `Arc` to make hits cheap.
pub struct CachedTextureFactory<F: TextureFactory> {
    inner: F,
    cache: RefCell<HashMap<Vec<Color>, F::Texture>>,
}

impl<F: TextureFactory> CachedTextureFactory<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn cached_len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

impl<F> TextureFactory for CachedTextureFactory<F>
where
    F: TextureFactory,
    F::Texture: Clone,
{
    type Texture = F::Texture;

    fn texture(&self, palette: &[Color]) -> F::Texture {
        if let Some(tex) = self.cache.borrow().get(palette) {
            return tex.clone();
        }
        let tex = self.inner.texture(palette);
        self.cache
            .borrow_mut()
            .insert(palette.to_vec(), tex.clone());
        tex
    }

    fn texture_width(&self, palette: &[Color]) -> usize {
        self.inner.texture_width(palette)
    }
}
