use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

// cycled through for categories without a configured colour
const PALETTE: [(u8, u8, u8); 10] = [
    (0xff, 0x6b, 0x6b),
    (0x4e, 0xcd, 0xc4),
    (0x45, 0xb7, 0xd1),
    (0xff, 0xa0, 0x7a),
    (0x98, 0xd8, 0xc8),
    (0xf7, 0xdc, 0x6f),
    (0xbb, 0x8f, 0xce),
    (0xf1, 0x94, 0x8a),
    (0x82, 0xe0, 0xaa),
    (0x85, 0xc1, 0xe9),
];

pub fn palette_color(index: usize) -> Srgba<f64> {
    let (r, g, b) = PALETTE[index % PALETTE.len()];
    Srgba::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0)
}

pub struct ThemeColors {
    pub label: Srgba<f64>,
    pub shadow: Srgba<f64>,
    pub active_outline: Srgba<f64>,
    pub guide: Srgba<f64>,
    pub background: Srgba<f64>,
    pub description: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            label: Srgba::new(1.0, 1.0, 1.0, 1.0),
            shadow: Srgba::new(0.0, 0.0, 0.0, 0.3),
            active_outline: Self::lookup_color(
                context,
                "theme_selected_bg_color",
                Srgba::new(0.4, 0.4, 0.8, 0.9),
                Some(0.9),
            ),
            guide: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.2, 0.2, 0.2, 0.15),
                Some(0.15),
            ),
            background: Self::lookup_color(
                context,
                "theme_bg_color",
                Srgba::new(0.15, 0.15, 0.15, 1.0),
                Some(1.0),
            ),
            description: Self::lookup_color(
                context,
                "theme_fg_color",
                Srgba::new(0.85, 0.85, 0.85, 0.85),
                Some(0.85),
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    alpha_override.unwrap_or(c.alpha() as f64),
                )
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.wheel-drawing-area {
    background: none;
    background-color: transparent;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), palette_color(10));
        assert_ne!(palette_color(0), palette_color(1));
        assert_eq!(palette_color(3).alpha, 1.0);
    }
}
