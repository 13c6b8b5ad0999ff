use std::path::{Path, PathBuf};

/// Aspect ratio used when a text panel has nothing to measure.
pub const PLACEHOLDER_ASPECT: f64 = 1.0;
/// Glyph advance relative to line height for the panel font.
const GLYPH_ASPECT: f64 = 0.55;
const LINE_SPACING: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Image { path: PathBuf },
    Text { body: String },
}

impl PanelContent {
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::Image { path: path.into() }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::Text { body: body.into() }
    }

    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::Image { path } => Some(path),
            Self::Text { .. } => None,
        }
    }

    /// Text resolves immediately; images wait for the loader.
    pub fn initial_state(&self) -> AssetState {
        match self {
            Self::Image { .. } => AssetState::Pending,
            Self::Text { body } => AssetState::Ready {
                aspect: text_aspect(body),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AssetState {
    #[default]
    Pending,
    Ready {
        aspect: f64,
    },
    Failed,
}

impl AssetState {
    pub fn aspect(&self) -> Option<f64> {
        match self {
            Self::Ready { aspect } => Some(*aspect),
            Self::Pending | Self::Failed => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.aspect().is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub content: PanelContent,
    pub asset: AssetState,
}

impl Panel {
    pub fn new(content: PanelContent) -> Self {
        let asset = content.initial_state();
        Self { content, asset }
    }

    pub fn lines(&self) -> Vec<&str> {
        match &self.content {
            PanelContent::Text { body } => body.lines().map(str::trim).collect(),
            PanelContent::Image { .. } => Vec::new(),
        }
    }
}

/// Width over height of a block of text set in the panel font.
pub fn text_aspect(body: &str) -> f64 {
    let lines: Vec<&str> = body.lines().map(str::trim).collect();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    if longest == 0 {
        return PLACEHOLDER_ASPECT;
    }
    (longest as f64 * GLYPH_ASPECT) / (lines.len() as f64 * LINE_SPACING)
}
