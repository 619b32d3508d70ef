use crate::config;
use crate::events::AppEvent;
use crate::gui::selector::{self, State, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::gui::theme::{self, ThemeColors};
use crate::gui::window::{self, CursorCapture};
use drum::categories::Category;
use drum::tracker::{CaptureGuard, PointerKind, PointerSample};
use drum::wheel::{FrameRequest, WheelAction};
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub root: gtk::ApplicationWindow,
    pub drawing_area: gtk::DrawingArea,
    tick: Option<gtk::TickCallbackId>,
    // bumped whenever the tick callback changes; frames from older chains are dropped
    chain: u64,
}

#[derive(Debug)]
pub enum AppMsg {
    Press { kind: PointerKind, sample: PointerSample },
    Drag(PointerSample),
    Release { x: f64, y: f64 },
    Frame { chain: u64, now_ms: f64 },
    Close,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            #[watch]
            set_title: Some(model.title().as_str()),
            set_default_size: (WINDOW_WIDTH, WINDOW_HEIGHT),
            add_css_class: "wheel-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Close);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "wheel-drawing-area",

                add_controller = gtk::GestureDrag {
                    set_button: gtk::gdk::BUTTON_PRIMARY,
                    connect_drag_begin[sender] => move |gesture, _, y| {
                        sender.input(AppMsg::Press {
                            kind: window::pointer_kind(gesture),
                            sample: PointerSample::new(y, window::event_time_ms(gesture)),
                        });
                    },
                    connect_drag_update[sender] => move |gesture, _, offset_y| {
                        if let Some((_, start_y)) = gesture.start_point() {
                            sender.input(AppMsg::Drag(PointerSample::new(
                                start_y + offset_y,
                                window::event_time_ms(gesture),
                            )));
                        }
                    },
                    connect_drag_end[sender] => move |gesture, offset_x, offset_y| {
                        let (x, y) = gesture
                            .start_point()
                            .map(|(x, y)| (x + offset_x, y + offset_y))
                            .unwrap_or_default();
                        sender.input(AppMsg::Release { x, y });
                    }
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, rx) = init;

        theme::load_css();

        let mut model = AppModel {
            state: Rc::new(RefCell::new(state)),
            root: root.clone(),
            drawing_area: gtk::DrawingArea::default(),
            tick: None,
            chain: 0,
        };

        let widgets = view_output!();
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, width, height| {
                let colors = ThemeColors::from_context(&drawing_area.style_context());
                if let Err(e) = selector::draw(
                    cr,
                    &state_draw.borrow(),
                    &colors,
                    width as f64,
                    height as f64,
                ) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Press { kind, sample } => {
                let capture = if kind.needs_capture() {
                    CursorCapture::acquire(&self.drawing_area)
                } else {
                    CaptureGuard::none()
                };
                let action = self.state.borrow_mut().press(kind, sample, capture);
                self.apply(action, &sender);
            }
            AppMsg::Drag(sample) => {
                let action = self.state.borrow_mut().drag(sample);
                self.apply(action, &sender);
            }
            AppMsg::Release { x, y } => {
                let (x, y) = window::from_center(&self.drawing_area, x, y);
                let now_ms = window::frame_time_ms(&self.drawing_area);
                let action = self.state.borrow_mut().release(x, y, now_ms);
                self.apply(action, &sender);
            }
            AppMsg::Frame { chain, now_ms } => {
                if chain != self.chain {
                    return;
                }
                let action = self.state.borrow_mut().frame(now_ms);
                self.apply(action, &sender);
            }
            AppMsg::Close => {
                self.teardown();
                self.root.close();
            }
            AppMsg::ConfigReload => match config::reload_config() {
                Ok(new_config) => {
                    // a fresh wheel starts back at rest
                    self.teardown();
                    *self.state.borrow_mut() = State::from_config(&new_config);
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        self.teardown();
    }
}

impl AppModel {
    fn title(&self) -> String {
        match self.state.borrow().wheel.selected() {
            Some(category) => format!("Wheel: {}", category),
            None => "Wheel".to_string(),
        }
    }

    fn apply(&mut self, action: WheelAction, sender: &ComponentSender<Self>) {
        match action.frame {
            FrameRequest::Keep => {}
            FrameRequest::Schedule => {
                if self.tick.is_none() {
                    self.install_tick(sender);
                }
            }
            FrameRequest::Cancel => self.remove_tick(),
            FrameRequest::Restart => {
                self.remove_tick();
                self.install_tick(sender);
            }
        }

        if let Some(category) = action.changed {
            self.publish(category);
        }

        if action.should_redraw {
            self.drawing_area.queue_draw();
        }
    }

    // the selection lives here; the drum only learns about it afterwards
    fn publish(&mut self, category: Category) {
        println!("{}", category);
        log::info!("Selected '{}'", category);
        self.state.borrow_mut().wheel.set_selected(Some(category));
    }

    fn install_tick(&mut self, sender: &ComponentSender<Self>) {
        self.chain += 1;
        let chain = self.chain;
        let sender = sender.clone();
        let id = self.drawing_area.add_tick_callback(move |_, clock| {
            sender.input(AppMsg::Frame {
                chain,
                now_ms: clock.frame_time() as f64 / 1000.0,
            });
            glib::ControlFlow::Continue
        });
        self.tick = Some(id);
    }

    fn remove_tick(&mut self) {
        if let Some(id) = self.tick.take() {
            id.remove();
        }
        self.chain += 1;
    }

    /// Drops the drag session and animation of the current wheel.
    fn teardown(&mut self) {
        self.state.borrow_mut().wheel.cancel();
        self.remove_tick();
    }
}
