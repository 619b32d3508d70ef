use relm4::prelude::*;
use wheel::config;
use wheel::gui::app::AppModel;
use wheel::gui::selector::State;
use wheel::sys::runtime;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    let state = State::from_config(&config);

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.drum.wheel");

    app.run::<AppModel>((state, rx));
}
