//! Raster layers drawn beneath the graph overlay.
//!
//! Layers are opaque, display-ready [`slint::Image`]s. Decoding and color
//! mapping happen elsewhere; the stack only tracks order, visibility and
//! opacity. Index 0 is the bottom layer.

use slint::Image;
use tracing::debug;

/// One raster layer.
#[derive(Debug, Clone)]
pub struct RasterLayer {
    pub name: String,
    pub image: Image,
    pub visible: bool,
    /// Always within `0.0..=1.0`.
    pub opacity: f32,
}

impl RasterLayer {
    pub fn new(name: impl Into<String>, image: Image) -> Self {
        Self { name: name.into(), image, visible: true, opacity: 1.0 }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = clamp_opacity(opacity).unwrap_or(1.0);
        self
    }

    /// Pixel size of the image.
    pub fn size(&self) -> (f32, f32) {
        let size = self.image.size();
        (size.width as f32, size.height as f32)
    }
}

fn clamp_opacity(opacity: f32) -> Option<f32> {
    opacity.is_finite().then(|| opacity.clamp(0.0, 1.0))
}

/// Ordered layer stack, bottom to top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<RasterLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top. Returns its index.
    pub fn push(&mut self, layer: RasterLayer) -> usize {
        debug!(name = %layer.name, "layer added");
        self.layers.push(layer);
        self.layers.len() - 1
    }

    pub fn remove(&mut self, index: usize) -> Option<RasterLayer> {
        (index < self.layers.len()).then(|| self.layers.remove(index))
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn get(&self, index: usize) -> Option<&RasterLayer> {
        self.layers.get(index)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Returns `false` if there is no layer at `index`.
    pub fn set_visible(&mut self, index: usize, visible: bool) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Set a layer's opacity, clamped to `0.0..=1.0`. Non-finite values are
    /// rejected.
    pub fn set_opacity(&mut self, index: usize, opacity: f32) -> bool {
        let Some(opacity) = clamp_opacity(opacity) else {
            debug!(index, "non-finite layer opacity ignored");
            return false;
        };
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.opacity = opacity;
                true
            }
            None => false,
        }
    }

    /// Visible layers in draw order (bottom first).
    pub fn visible_layers(&self) -> impl Iterator<Item = &RasterLayer> + '_ {
        self.layers.iter().filter(|l| l.visible)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &RasterLayer> + '_ {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Size of the bottom layer, used to fit the view.
    pub fn image_size(&self) -> Option<(f32, f32)> {
        self.layers.first().map(RasterLayer::size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> LayerStack {
        let mut stack = LayerStack::new();
        stack.push(RasterLayer::new("dapi", Image::default()));
        stack.push(RasterLayer::new("gfp", Image::default()));
        stack.push(RasterLayer::new("mask", Image::default()));
        stack
    }

    #[test]
    fn test_push_returns_index_in_draw_order() {
        let mut stack = LayerStack::new();
        assert_eq!(stack.push(RasterLayer::new("a", Image::default())), 0);
        assert_eq!(stack.push(RasterLayer::new("b", Image::default())), 1);
        assert_eq!(stack.index_of("b"), Some(1));
        assert_eq!(stack.index_of("missing"), None);
    }

    #[test]
    fn test_visible_layers_bottom_to_top() {
        let mut stack = stack();
        assert!(stack.set_visible(1, false));
        let names: Vec<&str> = stack.visible_layers().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["dapi", "mask"]);
    }

    #[test]
    fn test_set_opacity_clamps() {
        let mut stack = stack();
        assert!(stack.set_opacity(0, 1.5));
        assert_eq!(stack.get(0).unwrap().opacity, 1.0);
        assert!(stack.set_opacity(0, -0.2));
        assert_eq!(stack.get(0).unwrap().opacity, 0.0);
        assert!(stack.set_opacity(0, 0.4));
        assert_eq!(stack.get(0).unwrap().opacity, 0.4);
    }

    #[test]
    fn test_set_opacity_rejects_nan_and_bad_index() {
        let mut stack = stack();
        assert!(!stack.set_opacity(0, f32::NAN));
        assert_eq!(stack.get(0).unwrap().opacity, 1.0);
        assert!(!stack.set_opacity(7, 0.5));
        assert!(!stack.set_visible(7, false));
    }

    #[test]
    fn test_remove_and_image_size() {
        let mut stack = stack();
        assert_eq!(stack.remove(0).map(|l| l.name), Some("dapi".to_string()));
        assert!(stack.remove(5).is_none());
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.image_size(), Some((0.0, 0.0)));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.image_size(), None);
    }
}
