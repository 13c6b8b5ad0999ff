use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Named colours the viewer defines on top of the GTK theme. A user stylesheet
/// can redefine any of them with `@define-color`.
const CSS: &str = "
@define-color verso_background @theme_bg_color;
@define-color verso_panel @theme_base_color;
@define-color verso_back_panel alpha(@theme_fg_color, 0.25);
@define-color verso_focused @theme_selected_bg_color;
@define-color verso_text @theme_text_color;

.verso-drawing-area {
    background: none;
}
";

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub panel: Srgba<f64>,
    pub back_panel: Srgba<f64>,
    pub focused: Srgba<f64>,
    pub text: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        let color = |name: &str, fallback: Srgba<f64>| {
            context
                .lookup_color(name)
                .map(|c| {
                    Srgba::new(
                        c.red() as f64,
                        c.green() as f64,
                        c.blue() as f64,
                        c.alpha() as f64,
                    )
                })
                .unwrap_or(fallback)
        };

        Self {
            background: color("verso_background", Srgba::new(0.08, 0.08, 0.09, 1.0)),
            panel: color("verso_panel", Srgba::new(0.92, 0.91, 0.88, 1.0)),
            back_panel: color("verso_back_panel", Srgba::new(0.55, 0.55, 0.58, 0.85)),
            focused: color("verso_focused", Srgba::new(0.4, 0.4, 0.8, 0.9)),
            text: color("verso_text", Srgba::new(0.1, 0.1, 0.1, 1.0)),
        }
        .opaque_panels()
    }

    /// Front panels hide what is behind them, whatever the theme says.
    fn opaque_panels(mut self) -> Self {
        self.panel.alpha = 1.0;
        self.background.alpha = 1.0;
        self
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    provider.load_from_data(CSS);

    match gdk::Display::default() {
        Some(display) => gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => log::warn!("No display, theme colours fall back to built-ins"),
    }
}
