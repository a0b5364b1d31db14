//! Hydraulic Press entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, Event, HtmlElement, HtmlInputElement, PageTransitionEvent, SvgElement,
    };

    use hydraulic_press::consts::*;
    use hydraulic_press::sim::{Control, Frame, PressState, tick};
    use hydraulic_press::view::{Readouts, Scene, ids, slider_id};
    use hydraulic_press::PressConfig;

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    /// Simulator instance holding all state
    struct App {
        state: PressState,
        document: Document,
        accumulator: f32,
        last_time: f64,
        /// Cleared by `dispose`; the frame loop stops rescheduling once false
        running: bool,
        /// Readouts need rewriting before the next frame is drawn
        readouts_dirty: bool,
    }

    impl App {
        fn new(state: PressState, document: Document) -> Self {
            Self {
                state,
                document,
                accumulator: 0.0,
                last_time: 0.0,
                running: true,
                readouts_dirty: true,
            }
        }

        /// Run simulation ticks, returning the newest frame
        fn update(&mut self, dt: f32) -> Option<Frame> {
            self.accumulator += dt.min(MAX_FRAME_DELTA);

            let mut latest = None;
            let mut substeps = 0;
            while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
                let frame = tick(&mut self.state, FRAME_DT);
                if frame.inputs_changed {
                    self.sync_force_slider();
                    self.readouts_dirty = true;
                }
                latest = Some(frame);
                self.accumulator -= FRAME_DT;
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }
            latest
        }

        fn element(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.element(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_attr(&self, id: &str, name: &str, value: &str) {
            if let Some(el) = self.element(id) {
                let _ = el.set_attribute(name, value);
            }
        }

        /// Inline style on an HTML or SVG element
        fn set_style(&self, id: &str, property: &str, value: &str) {
            let Some(el) = self.element(id) else {
                return;
            };
            let style = match el.dyn_into::<HtmlElement>() {
                Ok(el) => el.style(),
                Err(el) => match el.dyn_into::<SvgElement>() {
                    Ok(el) => el.style(),
                    Err(_) => return,
                },
            };
            let _ = style.set_property(property, value);
        }

        /// Read a slider into the state
        fn read_slider(&mut self, control: Control) {
            let value = self
                .element(slider_id(control))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                .and_then(|input| input.value().parse::<f32>().ok());
            if let Some(value) = value {
                self.state.set_control(control, value);
                self.readouts_dirty = true;
            }
        }

        /// Write every input back to its slider
        fn sync_sliders(&self) {
            for control in Control::ALL {
                self.sync_slider(control);
            }
        }

        fn sync_force_slider(&self) {
            self.sync_slider(Control::InputForce);
        }

        fn sync_slider(&self, control: Control) {
            if let Some(input) = self
                .element(slider_id(control))
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                // Range first, or the browser clamps the value to the markup's bounds
                let range = control.range(self.state.config());
                input.set_min(&range.min.to_string());
                input.set_max(&range.max.to_string());
                input.set_step(&range.step.to_string());
                input.set_value(&control.value(&self.state.inputs()).to_string());
            }
        }

        /// Update readout text in the DOM
        fn update_readouts(&mut self) {
            if !self.readouts_dirty {
                return;
            }
            self.readouts_dirty = false;

            let r = Readouts::from_state(&self.state);
            self.set_text(ids::FORCE_LABEL, &r.force_label);
            self.set_text(ids::INPUT_AREA_LABEL, &r.input_area_label);
            self.set_text(ids::OUTPUT_AREA_LABEL, &r.output_area_label);
            self.set_text(ids::MATH_FORCE, &r.math_force);
            self.set_text(ids::MATH_RATIO, &r.math_ratio);
            if let Some(el) = self.element(ids::MATH_PRESSURE) {
                el.set_inner_html(&r.math_pressure_html);
            }
            self.set_text(ids::MATH_OUTPUT_FORCE, &r.math_output_force);
            self.set_text(ids::GAUGE, &r.gauge);
            self.set_style(ids::WARNING, "opacity", r.warning_opacity());
        }

        /// Apply piston, fluid and object attributes
        fn render(&self, frame: &Frame) {
            let scene = Scene::from_frame(frame, &self.state);

            self.set_attr(ids::PISTON_LEFT, "transform", &scene.piston_left_transform);
            self.set_attr(ids::FLUID_LEFT, "y", &scene.fluid_left_y);
            self.set_attr(ids::FLUID_LEFT, "height", &scene.fluid_left_height);
            self.set_attr(ids::FLUID_LEFT, "fill", &scene.fluid_fill);

            self.set_attr(ids::PISTON_RIGHT, "transform", &scene.piston_right_transform);
            self.set_attr(ids::FLUID_RIGHT, "y", &scene.fluid_right_y);
            self.set_attr(ids::FLUID_RIGHT, "height", &scene.fluid_right_height);
            self.set_attr(ids::FLUID_RIGHT, "fill", &scene.fluid_fill);

            self.set_style(ids::CRUSH_OBJECT, "transform", &scene.object_transform);
            self.set_style(ids::CRACKS, "opacity", scene.cracks_opacity);
            if let Some(el) = self.element(ids::CRUSH_MESSAGE) {
                let classes = el.class_list();
                let _ = if scene.crush_message_visible {
                    classes.add_1("visible")
                } else {
                    classes.remove_1("visible")
                };
            }
        }

        /// Stop the frame loop and any repeating action
        fn dispose(&mut self) {
            if self.running {
                self.running = false;
                self.state.stop_pump();
                log::info!("Frame loop disposed after {} ticks", self.state.time_ticks());
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Hydraulic Press starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            web_sys::console::error_1(&"No document available".into());
            return;
        };

        for id in [ids::FORCE_SLIDER, ids::PUMP_BUTTON, ids::PISTON_LEFT, ids::PISTON_RIGHT] {
            if document.get_element_by_id(id).is_none() {
                log::warn!("Missing element #{}", id);
            }
        }

        let config = PressConfig::load();
        let app = Rc::new(RefCell::new(App::new(PressState::new(config), document)));
        {
            let a = app.borrow();
            a.sync_sliders();
        }

        setup_controls(app.clone());
        setup_pump_button(app.clone());
        setup_action_buttons(app.clone());
        setup_teardown(app.clone());

        APP.with(|slot| *slot.borrow_mut() = Some(app.clone()));

        request_animation_frame(app);

        log::info!("Hydraulic Press running!");
    }

    /// Host teardown hook
    pub fn dispose() {
        APP.with(|slot| {
            if let Some(app) = slot.borrow_mut().take() {
                app.borrow_mut().dispose();
            }
        });
    }

    fn listen(target: &Element, event: &str, handler: impl FnMut(Event) + 'static) {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_controls(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();

        for control in Control::ALL {
            if let Some(slider) = document.get_element_by_id(slider_id(control)) {
                let app = app.clone();
                listen(&slider, "input", move |_event: Event| {
                    app.borrow_mut().read_slider(control);
                });
            }
        }

        if let Some(toggle) = document.get_element_by_id(ids::REALISTIC_TOGGLE) {
            let app = app.clone();
            listen(&toggle, "change", move |event: Event| {
                let checked = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.checked())
                    .unwrap_or(false);
                app.borrow_mut().state.set_realistic_mode(checked);
            });
        }
    }

    fn setup_pump_button(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();
        let Some(button) = document.get_element_by_id(ids::PUMP_BUTTON) else {
            return;
        };

        {
            let app = app.clone();
            listen(&button, "mousedown", move |_event: Event| {
                app.borrow_mut().state.start_pump();
            });
        }
        {
            let app = app.clone();
            listen(&button, "touchstart", move |event: Event| {
                event.prevent_default();
                app.borrow_mut().state.start_pump();
            });
        }

        // Every way a press can end must stop the pump
        for end in ["mouseup", "mouseleave", "touchend", "touchcancel"] {
            let app = app.clone();
            listen(&button, end, move |_event: Event| {
                app.borrow_mut().state.stop_pump();
            });
        }
    }

    fn setup_action_buttons(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();

        if let Some(button) = document.get_element_by_id(ids::RELEASE_BUTTON) {
            let app = app.clone();
            listen(&button, "click", move |_event: Event| {
                app.borrow_mut().state.release();
            });
        }

        if let Some(button) = document.get_element_by_id(ids::RESET_BUTTON) {
            let app = app.clone();
            listen(&button, "click", move |_event: Event| {
                let mut a = app.borrow_mut();
                a.state.reset();
                a.sync_sliders();
                a.readouts_dirty = true;
            });
        }
    }

    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            // Pages kept in the back/forward cache resume with the loop intact
            let persisted = event
                .dyn_ref::<PageTransitionEvent>()
                .is_some_and(|e| e.persisted());
            if persisted {
                log::info!("Page cached; keeping the press loop alive");
                return;
            }
            app.borrow_mut().dispose();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            if !a.running {
                return;
            }

            // Calculate delta time
            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            a.last_time = time;

            if let Some(frame) = a.update(dt) {
                a.update_readouts();
                a.render(&frame);
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

/// Stop the simulator's frame loop (call when tearing down the view)
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn dispose() {
    wasm_app::dispose();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hydraulic_press::PressConfig;
    use hydraulic_press::sim::PressState;

    env_logger::init();
    log::info!("Hydraulic Press (native) starting...");
    log::info!("Native mode runs a scripted session - run with `trunk serve` for the interactive page");

    let config = match std::env::args().nth(1) {
        Some(path) => PressConfig::load_file(std::path::Path::new(&path)),
        None => PressConfig::default(),
    };

    let mut state = PressState::new(config);
    scripted_session(&mut state);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Settle, pump to full force until the object breaks, release, reset
#[cfg(not(target_arch = "wasm32"))]
fn scripted_session(state: &mut hydraulic_press::sim::PressState) {
    use hydraulic_press::consts::FRAME_DT;
    use hydraulic_press::sim::tick;
    use hydraulic_press::view::Readouts;

    fn report(label: &str, state: &hydraulic_press::sim::PressState) {
        let r = Readouts::from_state(state);
        println!(
            "{:<10} F1 {:>7}  P {:>9}  F2 {:>8}  ratio {:>8}  stroke {:.2}  {:?}{}",
            label,
            r.math_force,
            r.gauge,
            r.math_output_force,
            r.math_ratio,
            state.visual_position(),
            state.crush(),
            if r.warning_visible { "  (no advantage)" } else { "" },
        );
    }

    let run = |state: &mut hydraulic_press::sim::PressState, seconds: f32| {
        let ticks = (seconds / FRAME_DT).round() as u32;
        for _ in 0..ticks {
            let frame = tick(state, FRAME_DT);
            if frame.just_crushed {
                println!("*** CRUSHED after {} ticks ***", state.time_ticks());
            }
        }
    };

    report("start", state);
    run(state, 2.0);
    report("settled", state);

    state.start_pump();
    run(state, 4.0);
    state.stop_pump();
    report("pumped", state);

    run(state, 2.0);
    report("held", state);

    state.release();
    run(state, 3.0);
    report("released", state);

    state.reset();
    report("reset", state);
}
