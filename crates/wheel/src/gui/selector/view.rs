use super::model::{ItemStyle, State};
use super::{
    CORNER_RADIUS, DESCRIPTION_FONT_SIZE, DESCRIPTION_GAP, FADE_HEIGHT, ITEM_HEIGHT, ITEM_WIDTH,
    LABEL_FONT_SIZE, Point, SHADOW_OFFSET,
};
use crate::gui::theme::{ThemeColors, palette_color};
use cairo::{Context, LinearGradient};
use drum::CYLINDER_RADIUS;
use drum::layout::{self, VisibleItem};
use palette::Srgba;
use std::f64::consts::PI;

fn set_source(cr: &Context, color: Srgba<f64>, opacity: f64) {
    let (r, g, b, a) = color.into_components();
    cr.set_source_rgba(r, g, b, a * opacity);
}

struct ItemRenderer<'a> {
    item: &'a VisibleItem,
    label: &'a str,
    style: Option<&'a ItemStyle>,
    center: Point,
}

impl<'a> ItemRenderer<'a> {
    fn new(
        item: &'a VisibleItem,
        label: &'a str,
        style: Option<&'a ItemStyle>,
        center: Point,
    ) -> Self {
        Self {
            item,
            label,
            style,
            center,
        }
    }

    fn draw(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        if self.item.opacity <= 0.0 {
            return Ok(());
        }

        cr.save()?;
        // tilt: squash vertically around the item's own centre
        cr.translate(self.center.x, self.center.y + self.item.offset_y);
        cr.scale(self.item.scale, self.item.scale * self.item.foreshortening);

        self.draw_card(cr, colors)?;
        self.draw_label(cr, colors)?;
        cr.restore()
    }

    fn card_color(&self) -> Srgba<f64> {
        self.style
            .map(|s| s.color)
            .unwrap_or_else(|| palette_color(self.item.category_index))
    }

    fn draw_card(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        rounded_rect(
            cr,
            -ITEM_WIDTH / 2.0,
            -ITEM_HEIGHT / 2.0,
            ITEM_WIDTH,
            ITEM_HEIGHT,
            CORNER_RADIUS,
        );
        set_source(cr, self.card_color(), self.item.opacity);
        cr.fill_preserve()?;

        if self.item.active {
            set_source(cr, colors.active_outline, self.item.opacity);
            cr.set_line_width(2.0);
            cr.stroke()
        } else {
            cr.new_path();
            Ok(())
        }
    }

    fn text(&self) -> String {
        match self.style.and_then(|s| s.icon.as_deref()) {
            Some(icon) => format!("{} {}", icon, self.label),
            None => self.label.to_string(),
        }
    }

    fn draw_label(&self, cr: &Context, colors: &ThemeColors) -> Result<(), cairo::Error> {
        let text = self.text();
        cr.select_font_face("Sans", cairo::FontSlant::Normal, cairo::FontWeight::Bold);
        cr.set_font_size(LABEL_FONT_SIZE);
        let ext = cr.text_extents(&text)?;
        let (x, y) = (
            -ext.width() / 2.0 - ext.x_bearing(),
            -ext.height() / 2.0 - ext.y_bearing(),
        );

        set_source(cr, colors.shadow, self.item.opacity);
        cr.move_to(x, y + SHADOW_OFFSET);
        cr.show_text(&text)?;

        set_source(cr, colors.label, self.item.opacity);
        cr.move_to(x, y);
        cr.show_text(&text)
    }
}

fn rounded_rect(cr: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    let r = r.min(w / 2.0).min(h / 2.0);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

pub fn draw(
    cr: &Context,
    state: &State,
    colors: &ThemeColors,
    width: f64,
    height: f64,
) -> Result<(), cairo::Error> {
    let center = Point::new(width / 2.0, height / 2.0);

    draw_guides(cr, center, width, colors)?;

    let items = state.wheel.items();
    for item in layout::draw_order(&items) {
        ItemRenderer::new(
            item,
            state.label(item),
            state.style(item.category_index),
            center,
        )
        .draw(cr, colors)?;
    }

    draw_fade(cr, width, height, colors)?;
    draw_description(cr, state, center, colors)
}

// lines bracketing the centre slot
fn draw_guides(
    cr: &Context,
    center: Point,
    width: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    set_source(cr, colors.guide, 1.0);
    cr.set_line_width(1.0);
    for dy in [-ITEM_HEIGHT / 2.0 - 4.0, ITEM_HEIGHT / 2.0 + 4.0] {
        cr.move_to(0.0, center.y + dy);
        cr.line_to(width, center.y + dy);
    }
    cr.stroke()
}

fn draw_fade(
    cr: &Context,
    width: f64,
    height: f64,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let (r, g, b, _) = colors.background.into_components();

    for (from, to) in [(0.0, FADE_HEIGHT), (height, height - FADE_HEIGHT)] {
        let gradient = LinearGradient::new(0.0, from, 0.0, to);
        gradient.add_color_stop_rgba(0.0, r, g, b, 1.0);
        gradient.add_color_stop_rgba(1.0, r, g, b, 0.0);
        cr.set_source(&gradient)?;
        cr.rectangle(0.0, from.min(to), width, FADE_HEIGHT);
        cr.fill()?;
    }
    Ok(())
}

fn draw_description(
    cr: &Context,
    state: &State,
    center: Point,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let Some(description) = state.active_description() else {
        return Ok(());
    };

    cr.select_font_face("Sans", cairo::FontSlant::Italic, cairo::FontWeight::Normal);
    cr.set_font_size(DESCRIPTION_FONT_SIZE);
    let ext = cr.text_extents(description)?;

    set_source(cr, colors.description, 1.0);
    cr.move_to(
        center.x - ext.width() / 2.0 - ext.x_bearing(),
        center.y + CYLINDER_RADIUS + DESCRIPTION_GAP,
    );
    cr.show_text(description)
}
