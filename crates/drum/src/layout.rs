//! Virtual window over the drum: which slots are on screen for a given
//! rotation, and how each one is placed.

use crate::categories::{Categories, wrap_index};
use crate::snap::round_half_up;
use crate::{CYLINDER_RADIUS, OVERSCAN_ANGLE, SLOT_ANGLE, VISIBLE_ANGLE};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleItem {
    pub virtual_index: i64,
    pub category_index: usize,
    /// Degrees from the centre line; positive is below centre.
    pub angle: f64,
    pub opacity: f64,
    pub scale: f64,
    pub active: bool,
    pub z_index: i32,
    /// Vertical offset from the drum centre after projecting onto the
    /// cylinder, in px.
    pub offset_y: f64,
    /// Distance towards the viewer, `CYLINDER_RADIUS` at the centre.
    pub depth: f64,
    /// Vertical squash from the item's tilt, 1.0 when facing the viewer.
    pub foreshortening: f64,
}

impl VisibleItem {
    fn at(virtual_index: i64, category_index: usize, angle: f64) -> Self {
        let dist = angle.abs();
        let opacity = (1.0 - dist / VISIBLE_ANGLE).max(0.0);
        let radians = angle.to_radians();

        Self {
            virtual_index,
            category_index,
            angle,
            opacity,
            scale: 0.8 + 0.2 * opacity,
            active: dist < SLOT_ANGLE / 2.0,
            z_index: (100.0 - dist).round() as i32,
            offset_y: CYLINDER_RADIUS * radians.sin(),
            depth: CYLINDER_RADIUS * radians.cos(),
            foreshortening: radians.cos(),
        }
    }

    /// Whether `y` (relative to the drum centre) falls on this item's band.
    pub fn contains(&self, y: f64, item_height: f64) -> bool {
        let half = item_height * self.scale * self.foreshortening / 2.0;
        (y - self.offset_y).abs() <= half
    }
}

/// Slots visible at `rotation`, in ascending virtual index order.
pub fn project(rotation: f64, categories: &Categories) -> Vec<VisibleItem> {
    if !rotation.is_finite() {
        return Vec::new();
    }

    match categories.len() {
        0 => Vec::new(),
        1 => vec![lone_item(rotation)],
        len => window_range(rotation)
            .filter_map(|i| {
                let angle = rotation + i as f64 * SLOT_ANGLE;
                if angle.abs() > VISIBLE_ANGLE {
                    return None;
                }
                wrap_index(i, len).map(|category_index| VisibleItem::at(i, category_index, angle))
            })
            .collect(),
    }
}

/// Virtual indices whose slots fall within the overscan window.
pub fn window_range(rotation: f64) -> std::ops::RangeInclusive<i64> {
    let start = ((-rotation - OVERSCAN_ANGLE) / SLOT_ANGLE).floor() as i64;
    let end = ((-rotation + OVERSCAN_ANGLE) / SLOT_ANGLE).ceil() as i64;
    start..=end
}

// A single category has no neighbours: only the copy nearest the centre is
// shown, and it is always the active one.
fn lone_item(rotation: f64) -> VisibleItem {
    let virtual_index = round_half_up(-rotation / SLOT_ANGLE) as i64;
    let angle = rotation + virtual_index as f64 * SLOT_ANGLE;
    VisibleItem {
        active: true,
        ..VisibleItem::at(virtual_index, 0, angle)
    }
}

/// Painter's order: farthest first so nearer items end up on top.
pub fn draw_order(items: &[VisibleItem]) -> Vec<&VisibleItem> {
    let mut ordered: Vec<&VisibleItem> = items.iter().collect();
    ordered.sort_by_key(|item| item.z_index);
    ordered
}

/// Top-most item under `y`, measured from the drum centre.
pub fn item_at(items: &[VisibleItem], y: f64, item_height: f64) -> Option<&VisibleItem> {
    items
        .iter()
        .filter(|item| item.opacity > 0.0 && item.contains(y, item_height))
        .max_by_key(|item| item.z_index)
}

/// The item nearest the centre line.
pub fn centre_item(items: &[VisibleItem]) -> Option<&VisibleItem> {
    items
        .iter()
        .min_by(|a, b| a.angle.abs().total_cmp(&b.angle.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;
    use std::collections::HashSet;

    fn cats(n: usize) -> Categories {
        Categories::try_new((0..n).map(|i| Category::new(format!("c{i}")))).unwrap()
    }

    #[test]
    fn test_rest_position() {
        let items = project(0.0, &cats(12));
        let indices: Vec<i64> = items.iter().map(|i| i.virtual_index).collect();
        assert_eq!(indices, vec![-3, -2, -1, 0, 1, 2, 3]);

        let centre = items.iter().find(|i| i.virtual_index == 0).unwrap();
        assert_eq!(centre.opacity, 1.0);
        assert_eq!(centre.scale, 1.0);
        assert_eq!(centre.z_index, 100);
        assert!(centre.active);
        assert_eq!(centre.offset_y, 0.0);
        assert_eq!(centre.depth, CYLINDER_RADIUS);

        // the edge slots sit exactly on the cutoff
        let edge = items.iter().find(|i| i.virtual_index == 3).unwrap();
        assert_eq!(edge.angle, 90.0);
        assert_eq!(edge.opacity, 0.0);
        assert_eq!(edge.scale, 0.8);
        assert_eq!(edge.z_index, 10);
        assert!(!edge.active);
    }

    #[test]
    fn test_wraps_negative_indices() {
        let items = project(0.0, &cats(5));
        let pairs: Vec<(i64, usize)> = items
            .iter()
            .map(|i| (i.virtual_index, i.category_index))
            .collect();
        assert_eq!(
            pairs,
            vec![(-3, 2), (-2, 3), (-1, 4), (0, 0), (1, 1), (2, 2), (3, 3)]
        );
    }

    #[test]
    fn test_window_invariants() {
        let list = cats(7);
        let mut rotation = -725.0;
        while rotation <= 725.0 {
            let items = project(rotation, &list);
            let unique: HashSet<i64> = items.iter().map(|i| i.virtual_index).collect();
            assert_eq!(unique.len(), items.len(), "duplicate slot at {rotation}");
            assert!(items.iter().all(|i| i.angle.abs() <= VISIBLE_ANGLE));
            assert!(items.iter().filter(|i| i.active).count() <= 1);
            assert!(!items.is_empty());
            rotation += 7.3;
        }
    }

    #[test]
    fn test_active_is_nearest_centre() {
        let items = project(-41.0, &cats(10));
        let active: Vec<&VisibleItem> = items.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].virtual_index, 1);
        assert_eq!(centre_item(&items).map(|i| i.virtual_index), Some(1));
    }

    #[test]
    fn test_z_index_falls_off_with_distance() {
        let items = project(12.0, &cats(10));
        let order = draw_order(&items);
        let last = order.last().unwrap();
        assert_eq!(last.virtual_index, 0);
        assert!(order.windows(2).all(|w| w[0].z_index <= w[1].z_index));
    }

    #[test]
    fn test_empty_and_single() {
        assert!(project(0.0, &Categories::default()).is_empty());

        let single = cats(1);
        for rotation in [-95.0, -14.0, 0.0, 16.0, 400.0] {
            let items = project(rotation, &single);
            assert_eq!(items.len(), 1, "rotation {rotation}");
            assert!(items[0].active);
            assert_eq!(items[0].category_index, 0);
            assert!(items[0].angle.abs() <= SLOT_ANGLE / 2.0);
        }
    }

    #[test]
    fn test_non_finite_rotation_renders_nothing() {
        assert!(project(f64::NAN, &cats(3)).is_empty());
    }

    #[test]
    fn test_hit_testing() {
        let items = project(0.0, &cats(10));
        assert_eq!(item_at(&items, 0.0, 40.0).map(|i| i.virtual_index), Some(0));
        assert_eq!(item_at(&items, 15.0, 40.0).map(|i| i.virtual_index), Some(0));

        let below = items.iter().find(|i| i.virtual_index == 1).unwrap();
        assert_eq!(
            item_at(&items, below.offset_y, 40.0).map(|i| i.virtual_index),
            Some(1)
        );
        assert_eq!(item_at(&items, 500.0, 40.0), None);
    }
}
