use crate::config::{CategoryConfig, Config};
use crate::gui::selector::{ITEM_HEIGHT, ITEM_WIDTH};
use crate::gui::theme;
use drum::categories::{Categories, Category};
use drum::layout::{self, VisibleItem};
use drum::tracker::{CaptureGuard, PointerKind, PointerSample};
use drum::wheel::{Wheel, WheelAction};
use palette::{Srgb, Srgba};

#[derive(Debug, Clone)]
pub struct ItemStyle {
    pub color: Srgba<f64>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl ItemStyle {
    pub fn from_config(cfg: &CategoryConfig, index: usize) -> Self {
        let color = cfg
            .color
            .map(|hex| {
                let rgb: Srgb<f64> = (*hex).into_format();
                Srgba::new(rgb.red, rgb.green, rgb.blue, 1.0)
            })
            .unwrap_or_else(|| theme::palette_color(index));

        Self {
            color,
            icon: cfg.icon.clone().filter(|s| !s.is_empty()),
            description: cfg.description.clone().filter(|s| !s.is_empty()),
        }
    }
}

/// Drum plus the per-category presentation the host draws with.
pub struct State {
    pub wheel: Wheel,
    pub styles: Vec<ItemStyle>,
}

impl State {
    pub fn new(wheel: Wheel, styles: Vec<ItemStyle>) -> Self {
        Self { wheel, styles }
    }

    pub fn from_config(config: &Config) -> Self {
        let categories = config.categories().unwrap_or_else(|e| {
            log::error!("{}, starting with an empty wheel", e);
            Categories::default()
        });

        let styles = config
            .categories
            .iter()
            .enumerate()
            .map(|(i, cfg)| ItemStyle::from_config(cfg, i))
            .collect();

        let selected = config
            .selected
            .clone()
            .filter(|s| categories.index_of(s).is_some());

        Self::new(Wheel::new(categories, selected, config.tuning), styles)
    }

    pub fn style(&self, category_index: usize) -> Option<&ItemStyle> {
        self.styles.get(category_index)
    }

    pub fn label(&self, item: &VisibleItem) -> &str {
        self.wheel
            .categories()
            .get(item.category_index)
            .map(Category::as_str)
            .unwrap_or_default()
    }

    pub fn press(
        &mut self,
        kind: PointerKind,
        sample: PointerSample,
        capture: CaptureGuard,
    ) -> WheelAction {
        self.wheel.pointer_down(kind, sample, capture)
    }

    pub fn drag(&mut self, sample: PointerSample) -> WheelAction {
        self.wheel.pointer_move(sample)
    }

    /// Ends a press. A tap on an item centres it; `x`/`y` are relative to
    /// the drum centre.
    pub fn release(&mut self, x: f64, y: f64, now_ms: f64) -> WheelAction {
        let action = self.wheel.pointer_up();
        if self.wheel.last_drag_moved() {
            return action;
        }

        match self.hit(x, y) {
            Some(virtual_index) => self.wheel.click(virtual_index, now_ms),
            None => action,
        }
    }

    fn hit(&self, x: f64, y: f64) -> Option<i64> {
        let items = self.wheel.items();
        layout::item_at(&items, y, ITEM_HEIGHT)
            .filter(|item| x.abs() <= ITEM_WIDTH * item.scale / 2.0)
            .map(|item| item.virtual_index)
    }

    pub fn frame(&mut self, now_ms: f64) -> WheelAction {
        self.wheel.tick(now_ms)
    }

    /// Description of the item under the centre line, if it has one.
    pub fn active_description(&self) -> Option<&str> {
        let items = self.wheel.items();
        let item = layout::centre_item(&items)?;
        self.style(item.category_index)?.description.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drum::Tuning;
    use drum::wheel::FrameRequest;

    fn config(names: &[&str]) -> Config {
        Config {
            selected: None,
            tuning: Tuning::default(),
            categories: names
                .iter()
                .map(|&n| CategoryConfig {
                    name: Category::from(n),
                    color: None,
                    icon: None,
                    description: Some(format!("about {n}")),
                })
                .collect(),
        }
    }

    fn settle(state: &mut State, mut now: f64) -> Vec<Category> {
        let mut changes = Vec::new();
        while state.wheel.is_animating() {
            now += 16.0;
            changes.extend(state.frame(now).changed);
        }
        changes
    }

    #[test]
    fn test_tap_on_lower_item_centres_it() {
        let mut state = State::from_config(&config(&["A", "B", "C", "D"]));
        let below = state
            .wheel
            .items()
            .into_iter()
            .find(|i| i.virtual_index == 1)
            .unwrap();

        state.press(
            PointerKind::Mouse,
            PointerSample::new(below.offset_y, 0.0),
            CaptureGuard::none(),
        );
        let action = state.release(0.0, below.offset_y, 1000.0);
        assert_eq!(action.frame, FrameRequest::Schedule);

        assert_eq!(settle(&mut state, 1000.0), vec![Category::from("B")]);
        assert_eq!(state.wheel.rotation(), -30.0);
        assert_eq!(state.active_description(), Some("about B"));
    }

    #[test]
    fn test_tap_outside_items_does_nothing() {
        let mut state = State::from_config(&config(&["A", "B", "C"]));
        state.press(
            PointerKind::Touch,
            PointerSample::new(0.0, 0.0),
            CaptureGuard::none(),
        );
        let action = state.release(ITEM_WIDTH, 0.0, 0.0);
        assert_eq!(action, WheelAction::default());
        assert!(!state.wheel.is_animating());
    }

    #[test]
    fn test_drag_release_does_not_click() {
        let mut state = State::from_config(&config(&["A", "B", "C"]));
        state.press(
            PointerKind::Mouse,
            PointerSample::new(0.0, 0.0),
            CaptureGuard::none(),
        );
        state.drag(PointerSample::new(-150.0, 16.0));
        state.drag(PointerSample::new(-150.0, 116.0));
        let action = state.release(0.0, 0.0, 116.0);
        assert_eq!(action.frame, FrameRequest::Schedule);
        assert_eq!(settle(&mut state, 116.0), vec![Category::from("B")]);
    }

    #[test]
    fn test_styles_fall_back_to_palette() {
        let mut cfg = config(&["A", "B"]);
        cfg.categories[0].color = Some("#000000".parse().unwrap());
        let state = State::from_config(&cfg);

        assert_eq!(state.styles[0].color, Srgba::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(state.styles[1].color, theme::palette_color(1));
    }

    #[test]
    fn test_unknown_selection_dropped() {
        let mut cfg = config(&["A", "B"]);
        cfg.selected = Some(Category::from("Z"));
        let state = State::from_config(&cfg);
        assert!(state.wheel.selected().is_none());
    }

    #[test]
    fn test_invalid_categories_give_empty_wheel() {
        let state = State::from_config(&config(&["A", "A"]));
        assert!(state.wheel.categories().is_empty());
        assert!(state.wheel.items().is_empty());
        assert_eq!(state.active_description(), None);
    }
}
