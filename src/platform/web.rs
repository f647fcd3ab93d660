//! Browser host
//!
//! Wires DOM events into the session's input record, drives
//! `Session::frame` from `requestAnimationFrame`, and paints the scene onto
//! a 2D canvas. `advanceTime` and `render_game_to_text` are exported for
//! automation.

use std::cell::RefCell;

use glam::Vec2;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, FocusEvent, HtmlCanvasElement, KeyboardEvent, PointerEvent,
    VisibilityState,
};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, SIM_DT};
use crate::profile::Profile;
use crate::renderer::{RenderView, Vertex, build_scene, vertex::colors};
use crate::session::{Screen, Session};
use crate::settings::Settings;
use crate::sim::Mode;

struct Host {
    session: Session,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    last_time: f64,
}

thread_local! {
    static HOST: RefCell<Option<Host>> = const { RefCell::new(None) };
}

fn with_host<R>(f: impl FnOnce(&mut Host) -> R) -> Option<R> {
    HOST.with(|cell| cell.borrow_mut().as_mut().map(f))
}

impl Host {
    fn apply_key(&mut self, code: &str, held: bool, repeat: bool) {
        match code {
            "KeyW" | "ArrowUp" => self.session.input.up = held,
            "KeyS" | "ArrowDown" => self.session.input.down = held,
            "KeyA" | "ArrowLeft" => self.session.input.left = held,
            "KeyD" | "ArrowRight" => self.session.input.right = held,
            "KeyJ" => self.session.input.attack = held,
            "Space" | "ShiftLeft" | "ShiftRight" => self.session.input.dash = held,
            "KeyE" | "KeyK" => self.session.input.special = held,
            "KeyQ" | "KeyF" => self.session.set_pull(held),
            "Escape" | "KeyP" if held && !repeat => self.session.toggle_pause(),
            "Enter" | "KeyR" if held && !repeat => match self.session.screen() {
                Screen::Menu => self.session.start_battle(),
                Screen::Battle(Mode::GameOver) => {
                    self.session.restart();
                }
                Screen::Battle(_) => {}
            },
            "Backspace" if held && !repeat => self.session.exit_to_menu(),
            _ => {}
        }
    }

    /// Pointer offset in CSS pixels -> arena coordinates
    fn to_arena(&self, offset_x: i32, offset_y: i32) -> Vec2 {
        let w = self.canvas.client_width().max(1) as f32;
        let h = self.canvas.client_height().max(1) as f32;
        Vec2::new(
            offset_x as f32 / w * ARENA_WIDTH,
            offset_y as f32 / h * ARENA_HEIGHT,
        )
    }

    /// Hidden tab or lost focus: pause a live battle and drop held keys
    fn auto_pause(&mut self, reason: &str) {
        if self.session.screen() == Screen::Battle(Mode::Battle) {
            self.session.toggle_pause();
            log::info!("Auto-paused ({})", reason);
        }
        self.session.input = Default::default();
    }

    fn frame(&mut self, time: f64) {
        let dt = if self.last_time > 0.0 {
            ((time - self.last_time) / 1000.0) as f32
        } else {
            SIM_DT
        };
        self.last_time = time;

        self.session.frame(dt);
        self.persist();
        self.draw();
    }

    fn persist(&mut self) {
        if self.session.take_profile_dirty() {
            self.session.profile.save();
        }
    }

    fn draw(&self) {
        let ctx = &self.ctx;
        let sx = f64::from(self.canvas.width()) / f64::from(ARENA_WIDTH);
        let sy = f64::from(self.canvas.height()) / f64::from(ARENA_HEIGHT);
        let _ = ctx.set_transform(sx, 0.0, 0.0, sy, 0.0, 0.0);

        let Some(battle) = self.session.battle() else {
            ctx.set_fill_style_str(&css_color(colors::BACKGROUND));
            ctx.fill_rect(0.0, 0.0, f64::from(ARENA_WIDTH), f64::from(ARENA_HEIGHT));
            return;
        };

        let vertices = build_scene(
            &RenderView::new(battle),
            &self.session.settings,
            self.session.damage_flash(),
        );
        fill_triangles(ctx, &vertices);
    }
}

fn css_color(c: [f32; 4]) -> String {
    format!(
        "rgba({},{},{},{})",
        (c[0] * 255.0) as u8,
        (c[1] * 255.0) as u8,
        (c[2] * 255.0) as u8,
        c[3]
    )
}

fn fill_triangles(ctx: &CanvasRenderingContext2d, vertices: &[Vertex]) {
    let mut current = String::new();
    for tri in vertices.chunks_exact(3) {
        let color = css_color(tri[0].color);
        if color != current {
            ctx.set_fill_style_str(&color);
            current = color;
        }
        ctx.begin_path();
        ctx.move_to(f64::from(tri[0].position[0]), f64::from(tri[0].position[1]));
        ctx.line_to(f64::from(tri[1].position[0]), f64::from(tri[1].position[1]));
        ctx.line_to(f64::from(tri[2].position[0]), f64::from(tri[2].position[1]));
        ctx.close_path();
        ctx.fill();
    }
}

/// Boot the browser host on the `#canvas` element
#[wasm_bindgen]
pub fn run() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger unavailable: {}", e).into());
    }
    log::info!("Arena Brawl starting...");

    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id("canvas")
        .ok_or("no canvas")?
        .dyn_into()?;

    let dpr = window.device_pixel_ratio();
    canvas.set_width((f64::from(canvas.client_width()) * dpr) as u32);
    canvas.set_height((f64::from(canvas.client_height()) * dpr) as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or("no 2d context")?
        .dyn_into()?;

    let seed = js_sys::Date::now() as u64;
    let session = Session::new(Profile::load(), Settings::load(), seed);
    log::info!("Session initialized with seed: {}", seed);

    HOST.with(|cell| {
        *cell.borrow_mut() = Some(Host {
            session,
            canvas: canvas.clone(),
            ctx,
            last_time: 0.0,
        })
    });

    setup_input_handlers(&window, &canvas);
    setup_auto_pause(&window, &document);
    request_animation_frame();

    log::info!("Arena Brawl running!");
    Ok(())
}

fn setup_input_handlers(window: &web_sys::Window, canvas: &HtmlCanvasElement) {
    for (name, held) in [("keydown", true), ("keyup", false)] {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            with_host(|h| h.apply_key(&event.code(), held, event.repeat()));
        });
        let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            with_host(|h| {
                let pos = h.to_arena(event.offset_x(), event.offset_y());
                h.session.input.pointer = Some(pos);
            });
        });
        let _ = canvas
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    for (name, held) in [("pointerdown", true), ("pointerup", false)] {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            if event.button() != 0 {
                return;
            }
            with_host(|h| {
                let pos = h.to_arena(event.offset_x(), event.offset_y());
                h.session.input.pointer = Some(pos);
                h.session.input.attack = held;
            });
        });
        let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
            with_host(|h| h.session.input.pointer = None);
        });
        let _ = canvas
            .add_event_listener_with_callback("pointerleave", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn setup_auto_pause(window: &web_sys::Window, document: &web_sys::Document) {
    {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == VisibilityState::Hidden {
                with_host(|h| h.auto_pause("tab hidden"));
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    let closure = Closure::<dyn FnMut(_)>::new(move |_event: FocusEvent| {
        with_host(|h| h.auto_pause("window blur"));
    });
    let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
    closure.forget();
}

fn request_animation_frame() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let closure = Closure::once(move |time: f64| {
        with_host(|h| h.frame(time));
        request_animation_frame();
    });
    let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Advance the simulation by `ms` with the current input held
#[wasm_bindgen(js_name = advanceTime)]
pub fn advance_time(ms: f64) -> u32 {
    with_host(|h| {
        let steps = h.session.advance_time(ms);
        h.persist();
        h.draw();
        steps
    })
    .unwrap_or(0)
}

/// JSON snapshot of the current screen
#[wasm_bindgen]
pub fn render_game_to_text() -> String {
    with_host(|h| h.session.render_game_to_text()).unwrap_or_else(|| "{}".to_string())
}

/// Start a battle with the selected character
#[wasm_bindgen(js_name = startBattle)]
pub fn start_battle() {
    with_host(|h| h.session.start_battle());
}

fn shop(
    action: impl FnOnce(&mut Session) -> Result<(), crate::ShopError>,
) -> Result<(), JsValue> {
    with_host(|h| {
        let result = action(&mut h.session);
        h.persist();
        result
    })
    .ok_or_else(|| JsValue::from_str("host not running"))?
    .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(js_name = unlockCharacter)]
pub fn unlock_character(id: &str) -> Result<(), JsValue> {
    shop(|s| s.unlock(id))
}

#[wasm_bindgen(js_name = upgradeCharacter)]
pub fn upgrade_character(id: &str) -> Result<(), JsValue> {
    shop(|s| s.upgrade_level(id).map(|_| ()))
}

#[wasm_bindgen(js_name = selectCharacter)]
pub fn select_character(id: &str) -> Result<(), JsValue> {
    shop(|s| s.select_character(id))
}

/// Current profile as JSON, for the menu UI
#[wasm_bindgen(js_name = profileJson)]
pub fn profile_json() -> String {
    with_host(|h| h.session.profile.to_json().ok())
        .flatten()
        .unwrap_or_else(|| "{}".to_string())
}

/// Replace and persist settings; unknown fields fall back to defaults
#[wasm_bindgen(js_name = applySettings)]
pub fn apply_settings(json: &str) {
    with_host(|h| {
        h.session.settings = Settings::from_json(json);
        h.session.settings.save();
    });
}
