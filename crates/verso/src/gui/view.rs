use crate::gui::assets::AssetCache;
use crate::gui::theme::ThemeColors;
use cairo::{Context, Matrix};
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use glam::{DVec2, DVec3};
use palette::Srgba;
use verso_core::{Camera, ItemTransform, Layer, Panel, PanelContent, Scene, Viewport};

/// Local height used for laying out text on a panel.
const TEXT_UNITS: f64 = 100.0;
const LINE_SPACING: f64 = 1.2;
const BORDER_WIDTH: f64 = 3.0;

struct PanelRenderer<'a> {
    item: &'a ItemTransform,
    panel: &'a Panel,
    /// Top-left, top-right, bottom-right, bottom-left in pixels.
    corners: [DVec2; 4],
}

impl<'a> PanelRenderer<'a> {
    fn new(
        item: &'a ItemTransform,
        panel: &'a Panel,
        camera: &Camera,
        viewport: Viewport,
    ) -> Option<Self> {
        let (hw, hh) = (item.width / 2.0, item.height / 2.0);
        let corner = |x: f64, y: f64| {
            camera.project(item.position + item.rotation * DVec3::new(x, y, 0.0), viewport)
        };
        let corners = [
            corner(-hw, hh)?,
            corner(hw, hh)?,
            corner(hw, -hh)?,
            corner(-hw, -hh)?,
        ];
        Some(Self {
            item,
            panel,
            corners,
        })
    }

    fn draw(
        &self,
        cr: &Context,
        assets: &AssetCache,
        colors: &ThemeColors,
    ) -> Result<(), cairo::Error> {
        self.trace(cr);
        set_color(cr, self.fill(colors));
        cr.fill_preserve()?;

        cr.save()?;
        cr.clip();
        match &self.panel.content {
            PanelContent::Image { path } => {
                if let Some(pixbuf) = assets.get(path) {
                    self.draw_image(cr, pixbuf)?;
                }
            }
            PanelContent::Text { .. } => self.draw_text(cr, colors)?,
        }
        cr.restore()?;

        if self.item.focused {
            self.trace(cr);
            set_color(cr, colors.focused);
            cr.set_line_width(BORDER_WIDTH);
            cr.stroke()?;
        }
        Ok(())
    }

    fn fill(&self, colors: &ThemeColors) -> Srgba<f64> {
        match self.item.panel.layer {
            Layer::Front => colors.panel,
            Layer::Back => colors.back_panel,
        }
    }

    fn trace(&self, cr: &Context) {
        cr.new_path();
        let [first, rest @ ..] = &self.corners;
        cr.move_to(first.x, first.y);
        for p in rest {
            cr.line_to(p.x, p.y);
        }
        cr.close_path();
    }

    /// Maps a local `width` x `height` rectangle (y down) onto the quad.
    /// `None` when the quad is seen edge-on.
    fn local_matrix(&self, width: f64, height: f64) -> Option<Matrix> {
        let [tl, tr, _, bl] = self.corners;
        let u = (tr - tl) / width;
        let v = (bl - tl) / height;
        if u.perp_dot(v).abs() < 1e-9 {
            return None;
        }
        Some(Matrix::new(u.x, u.y, v.x, v.y, tl.x, tl.y))
    }

    fn draw_image(&self, cr: &Context, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
        let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
        let Some(matrix) = self.local_matrix(w, h) else {
            return Ok(());
        };
        cr.transform(matrix);
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint()
    }

    fn draw_text(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let lines = self.panel.lines();
        if lines.iter().all(|l| l.is_empty()) {
            return Ok(());
        }
        let height = TEXT_UNITS;
        let width = TEXT_UNITS * self.item.width / self.item.height;
        let Some(matrix) = self.local_matrix(width, height) else {
            return Ok(());
        };
        cr.transform(matrix);

        let size = height / (lines.len() as f64 * LINE_SPACING + 1.0);
        set_color(cr, colors.text);
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(size);

        let block = lines.len() as f64 * size * LINE_SPACING;
        let mut baseline = (height - block) / 2.0 + size;
        for line in lines {
            if let Ok(ext) = cr.text_extents(line) {
                cr.move_to(width / 2.0 - ext.width() / 2.0 - ext.x_bearing(), baseline);
                cr.show_text(line)?;
            }
            baseline += size * LINE_SPACING;
        }
        Ok(())
    }
}

fn set_color(cr: &Context, color: Srgba<f64>) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a);
}

pub fn draw(
    cr: &Context,
    scene: &Scene,
    assets: &AssetCache,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_color(cr, colors.background);
    cr.paint()?;

    let viewport = scene.viewport();
    if viewport.is_empty() {
        return Ok(());
    }

    let frame = scene.frame();
    let mut items: Vec<&ItemTransform> = frame.items.iter().collect();
    // painter's order: farthest first
    items.sort_by(|a, b| {
        let da = frame.camera.position.distance_squared(a.position);
        let db = frame.camera.position.distance_squared(b.position);
        db.total_cmp(&da)
    });

    for item in items {
        let Some(panel) = scene.panel(item.panel) else {
            continue;
        };
        if let Some(renderer) = PanelRenderer::new(item, panel, &frame.camera, viewport) {
            renderer.draw(cr, assets, colors)?;
        }
    }
    Ok(())
}
