use gdk_pixbuf::Pixbuf;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use verso_core::{AssetState, Layer, PanelRef, Scene};

/// Decoded images, keyed by the path they were loaded from.
#[derive(Default)]
pub struct AssetCache {
    images: HashMap<PathBuf, Pixbuf>,
}

impl AssetCache {
    /// Decodes every image panel and reports the outcome to the scene, so
    /// each layer is released for display once all of its images resolve.
    pub fn load(scene: &mut Scene) -> Self {
        let mut cache = Self::default();

        let mut pending = Vec::new();
        for layer in [Layer::Front, Layer::Back] {
            for (i, panel) in scene.panels(layer).iter().enumerate() {
                if let Some(path) = panel.content.image_path() {
                    pending.push((PanelRef::new(layer, i), path.to_path_buf()));
                }
            }
        }

        for (panel, path) in pending {
            let state = cache.decode(&path);
            if let Err(e) = scene.set_asset(panel, state) {
                log::error!("Failed to record asset for {}: {}", panel, e);
            }
        }

        log::info!("Loaded {} image(s)", cache.images.len());
        cache
    }

    fn decode(&mut self, path: &Path) -> AssetState {
        if let Some(pixbuf) = self.images.get(path) {
            return ready(pixbuf);
        }

        match Pixbuf::from_file(path) {
            Ok(pixbuf) => {
                let state = ready(&pixbuf);
                self.images.insert(path.to_path_buf(), pixbuf);
                state
            }
            Err(e) => {
                log::warn!("Failed to load image {}: {}", path.display(), e);
                AssetState::Failed
            }
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Pixbuf> {
        self.images.get(path)
    }
}

fn ready(pixbuf: &Pixbuf) -> AssetState {
    let (w, h) = (pixbuf.width(), pixbuf.height());
    if w <= 0 || h <= 0 {
        return AssetState::Failed;
    }
    AssetState::Ready {
        aspect: w as f64 / h as f64,
    }
}
