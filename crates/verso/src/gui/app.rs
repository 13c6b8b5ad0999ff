use crate::config;
use crate::events::AppEvent;
use crate::gui::assets::AssetCache;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use glam::DVec2;
use gtk::glib;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use verso_core::{PointerEvent, Scene, Variant};

pub struct AppModel {
    pub scene: Rc<RefCell<Scene>>,
    pub assets: Rc<RefCell<AssetCache>>,
    /// Command-line preset, kept across config reloads.
    pub variant: Option<Variant>,
    pub epoch: Instant,
    pub drawing_area: gtk::DrawingArea,
    pub tick: Option<gtk::TickCallbackId>,
}

#[derive(Debug)]
pub enum AppMsg {
    Press(DVec2),
    Drag(DVec2),
    Release,
    DoubleClick,
    Wheel(f64),
    Resize(i32, i32),
    Frame,
    Reset,
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
    type Init = (
        Scene,
        AssetCache,
        Option<Variant>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Verso"),
            set_default_width: 1280,
            set_default_height: 720,

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Reset);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            // controllers sit on the drawing area so coordinates skip the titlebar
            #[name = "drawing_area"]
            gtk::DrawingArea {
                set_hexpand: true,
                set_vexpand: true,
                add_css_class: "verso-drawing-area",

                connect_resize[sender] => move |_, width, height| {
                    sender.input(AppMsg::Resize(width, height));
                },

                add_controller = gtk::GestureDrag {
                    connect_drag_begin[sender] => move |_, x, y| {
                        sender.input(AppMsg::Press(DVec2::new(x, y)));
                    },
                    connect_drag_update[sender] => move |gesture, dx, dy| {
                        if let Some((x, y)) = gesture.start_point() {
                            sender.input(AppMsg::Drag(DVec2::new(x + dx, y + dy)));
                        }
                    },
                    connect_drag_end[sender] => move |_, _, _| {
                        sender.input(AppMsg::Release);
                    },
                },

                add_controller = gtk::GestureClick {
                    connect_pressed[sender] => move |_, n_press, _, _| {
                        if n_press == 2 {
                            sender.input(AppMsg::DoubleClick);
                        }
                    }
                },

                add_controller = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL) {
                    connect_scroll[sender] => move |_, _, dy| {
                        sender.input(AppMsg::Wheel(dy));
                        glib::Propagation::Stop
                    }
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (scene, assets, variant, rx) = init;

        theme::load_css();

        let model = AppModel {
            scene: Rc::new(RefCell::new(scene)),
            assets: Rc::new(RefCell::new(assets)),
            variant,
            epoch: Instant::now(),
            drawing_area: gtk::DrawingArea::default(),
            tick: None,
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let scene_draw = model.scene.clone();
        let assets_draw = model.assets.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let (scene, assets) = (scene_draw.borrow(), assets_draw.borrow());
                if let Err(e) = view::draw(cr, &scene, &assets, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let frame_sender = sender.clone();
        model.tick = Some(widgets.drawing_area.add_tick_callback(move |_, _| {
            frame_sender.input(AppMsg::Frame);
            glib::ControlFlow::Continue
        }));

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        let now = self.epoch.elapsed();
        let redraw = match msg {
            AppMsg::Press(position) => self.pointer(PointerEvent::Down {
                position,
                time: now,
            }),
            AppMsg::Drag(position) => self.pointer(PointerEvent::Move { position }),
            AppMsg::Release => self.pointer(PointerEvent::Up { time: now }),
            AppMsg::DoubleClick => self.pointer(PointerEvent::DoubleClick),
            AppMsg::Wheel(ticks) => self.pointer(PointerEvent::Wheel { ticks }),
            AppMsg::Resize(width, height) => {
                self.scene
                    .borrow_mut()
                    .resize(width as f64, height as f64);
                true
            }
            AppMsg::Frame => self.scene.borrow_mut().tick(now),
            AppMsg::Reset => {
                self.scene.borrow_mut().reset();
                true
            }
            AppMsg::ConfigReload => self.reload(),
        };

        if redraw {
            self.drawing_area.queue_draw();
        }
    }

    fn shutdown(&mut self, _widgets: &mut Self::Widgets, _output: relm4::Sender<Self::Output>) {
        if let Some(tick) = self.tick.take() {
            tick.remove();
        }
    }
}

impl AppModel {
    fn pointer(&self, event: PointerEvent) -> bool {
        self.scene.borrow_mut().handle(event)
    }

    /// Rebuilds the scene from disk, keeping the current window size.
    fn reload(&mut self) -> bool {
        let viewport = self.scene.borrow().viewport();
        match config::load_scene(self.variant) {
            Ok(mut scene) => {
                let assets = AssetCache::load(&mut scene);
                if !viewport.is_empty() {
                    scene.resize(viewport.width, viewport.height);
                }
                *self.scene.borrow_mut() = scene;
                *self.assets.borrow_mut() = assets;
                log::info!("Configuration reloaded");
                true
            }
            Err(e) => {
                log::error!("Failed to reload config: {}", e);
                false
            }
        }
    }
}
