use clap::{Parser, Subcommand};
use drum::Tuning;
use drum::categories::{Categories, Category};
use drum::layout;
use drum::tracker::{CaptureGuard, PointerKind, PointerSample};
use drum::wheel::Wheel;

// frames after which a replay is abandoned
const MAX_FRAMES: usize = 100_000;

#[derive(Parser, Debug)]
#[command(name = "drum", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Replay one gesture on a fresh drum and print where it lands.
    Simulate {
        /// Comma separated category labels
        #[arg(short = 'c', long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        /// Category the host currently has selected
        #[arg(short = 's', long)]
        selected: Option<String>,

        /// Vertical drag distance in px (negative is upwards)
        #[arg(short = 'd', long, allow_hyphen_values = true)]
        drag: Option<f64>,

        /// Pointer speed at release, px/ms
        #[arg(short = 'v', long, default_value_t = 0.0, allow_hyphen_values = true)]
        velocity: f64,

        /// Click the item at this virtual index instead of dragging
        #[arg(long, allow_hyphen_values = true, conflicts_with = "drag")]
        click: Option<i64>,

        /// Input device driving the drag
        #[arg(short = 'p', long, default_value = "mouse")]
        pointer: PointerKind,

        /// Simulated frame interval
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,
    },
    /// Print the visible items for a rotation.
    Layout {
        #[arg(short = 'c', long, value_delimiter = ',', required = true)]
        categories: Vec<String>,

        #[arg(short = 'r', long, default_value_t = 0.0, allow_hyphen_values = true)]
        rotation: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            categories,
            selected,
            drag,
            velocity,
            click,
            pointer,
            frame_ms,
        } => {
            let categories = parse_categories(categories)?;
            let selected = parse_selected(&categories, selected)?;
            simulate(
                categories,
                selected,
                Gesture::from_args(drag, velocity, click),
                pointer,
                frame_ms,
            )
        }
        Commands::Layout {
            categories,
            rotation,
        } => print_layout(&parse_categories(categories)?, rotation),
    }
}

fn parse_categories(raw: Vec<String>) -> anyhow::Result<Categories> {
    let items = raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(Category::new);
    Ok(Categories::try_new(items)?)
}

fn parse_selected(
    categories: &Categories,
    selected: Option<String>,
) -> anyhow::Result<Option<Category>> {
    let Some(name) = selected else {
        return Ok(None);
    };
    let category = Category::new(name.trim());
    if categories.index_of(&category).is_none() {
        anyhow::bail!("--selected '{}' is not one of the categories", category);
    }
    Ok(Some(category))
}

#[derive(Debug, Clone, Copy)]
enum Gesture {
    Drag { distance: f64, velocity: f64 },
    Click(i64),
}

impl Gesture {
    fn from_args(drag: Option<f64>, velocity: f64, click: Option<i64>) -> Self {
        match click {
            Some(index) => Self::Click(index),
            None => Self::Drag {
                distance: drag.unwrap_or(0.0),
                velocity,
            },
        }
    }
}

fn simulate(
    categories: Categories,
    selected: Option<Category>,
    gesture: Gesture,
    pointer: PointerKind,
    frame_ms: f64,
) -> anyhow::Result<()> {
    if !(frame_ms.is_finite() && frame_ms > 0.0) {
        anyhow::bail!("--frame-ms must be a positive number, got {}", frame_ms);
    }

    let mut wheel = Wheel::new(categories, selected, Tuning::default());
    let mut now = 0.0;

    match gesture {
        Gesture::Drag { distance, velocity } => {
            wheel.pointer_down(pointer, PointerSample::new(0.0, now), CaptureGuard::none());
            // reach the end point, then one more sample that leaves the
            // requested release speed behind
            now += frame_ms;
            let end = distance - velocity * frame_ms;
            wheel.pointer_move(PointerSample::new(end, now));
            now += frame_ms;
            wheel.pointer_move(PointerSample::new(distance, now));
            wheel.pointer_up();
            log::debug!("Released at {:.3}°", wheel.rotation());
        }
        Gesture::Click(index) => {
            wheel.click(index, now);
        }
    }

    let mut frames = 0;
    while wheel.is_animating() {
        now += frame_ms;
        frames += 1;
        if frames > MAX_FRAMES {
            anyhow::bail!("Animation did not settle after {} frames", MAX_FRAMES);
        }
        if let Some(category) = wheel.tick(now).changed {
            println!("changed {}", category);
            wheel.set_selected(Some(category));
        }
    }

    let landed = drum::snap::slot_index(wheel.rotation(), wheel.categories().len())
        .and_then(|i| wheel.categories().get(i));
    println!(
        "rotation {} frames {} landed {}",
        wheel.rotation(),
        frames,
        landed.map(Category::as_str).unwrap_or("-")
    );
    Ok(())
}

fn print_layout(categories: &Categories, rotation: f64) -> anyhow::Result<()> {
    let items = layout::project(rotation, categories);
    if items.is_empty() {
        anyhow::bail!("Nothing visible at rotation {}", rotation);
    }

    for item in &items {
        let label = categories
            .get(item.category_index)
            .map(Category::as_str)
            .unwrap_or_default();
        println!(
            "{:>4} {:<16} angle {:>7.2} opacity {:.2} scale {:.2} z {:>3} y {:>7.2}{}",
            item.virtual_index,
            label,
            item.angle,
            item.opacity,
            item.scale,
            item.z_index,
            item.offset_y,
            if item.active { " *" } else { "" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cats(names: &[&str]) -> Categories {
        parse_categories(names.iter().map(|n| n.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_selected_must_be_a_category() {
        let categories = cats(&["A", " B", "C"]);

        let selected = parse_selected(&categories, Some("B".to_string())).unwrap();
        assert_eq!(selected, Some(Category::from("B")));
        assert_eq!(parse_selected(&categories, None).unwrap(), None);
        assert!(parse_selected(&categories, Some("Z".to_string())).is_err());
    }

    #[test]
    fn test_simulate_rejects_bad_frame_interval() {
        let gesture = Gesture::from_args(Some(-150.0), 0.0, None);
        let result = simulate(cats(&["A", "B"]), None, gesture, PointerKind::Touch, 0.0);
        assert!(result.is_err());
    }
}
