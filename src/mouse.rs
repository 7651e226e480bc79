//! Interactive pointer-driven move and resize.

use tracing::debug;

use crate::config;
use crate::events;
use crate::logic;
use crate::structs::Application;
use crate::wrap::xlib::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drag {
    Move,
    Resize,
}

/// Grab the pointer and track it until a key or button event ends the
/// drag. The dragged window leaves fullscreen and becomes floating first.
/// Configure and map requests arriving mid-drag are fed to their normal
/// handlers; moving the pointer onto another monitor drags the client
/// along with it.
pub fn mouse_motion(app: &mut Application, drag: Drag) {
    let desk = app.runtime.desktop();
    let Some(i) = desk.current else { return };
    let win = desk.clients[i].window;

    let Some((wx, wy, ww, wh)) = get_geometry(app.core.display, win) else {
        return;
    };
    let Some((px, py)) = query_pointer(app.core.display, app.core.root) else {
        return;
    };
    if !grab_pointer(app.core.display, app.core.root) {
        return;
    }
    debug!("{drag:?} drag on window {win}");

    let m = app.runtime.current_monitor;
    let d = app.runtime.monitors[m].current_desktop;
    if app.runtime.desktop().clients[i].fullscreen {
        logic::set_fullscreen(app, m, d, i, false);
    }
    app.runtime.desktop_mut().clients[i].floating = true;
    let cur = app.runtime.desktop().current;
    logic::update_current(app, cur);

    loop {
        flush(app.core.display);
        match next_event(app.core.display) {
            EEvent::ConfigureRequest { configure_request } => {
                events::configure_request(app, configure_request)
            }
            EEvent::MapRequest { map_request } => events::map_request(app, map_request),
            EEvent::MotionNotify { motion } => {
                let dx = motion.x_root - px;
                let dy = motion.y_root - py;
                match drag {
                    Drag::Move => {
                        move_window(app.core.display, win, wx + dx, wy + dy);
                        let target = app.runtime.monitor_at(motion.x_root, motion.y_root);
                        if target != app.runtime.current_monitor {
                            logic::client_to_monitor(app, target);
                            logic::change_monitor(app, target);
                        }
                    }
                    Drag::Resize => {
                        let w = (ww as i32 + dx).max(config::MINWSZ) as u32;
                        let h = (wh as i32 + dy).max(config::MINWSZ) as u32;
                        resize_window(app.core.display, win, w, h);
                    }
                }
            }
            EEvent::KeyPress { .. }
            | EEvent::KeyRelease { .. }
            | EEvent::ButtonPress { .. }
            | EEvent::ButtonRelease { .. } => break,
            _ => {}
        }
        // the dragged client may vanish under the pointer
        if logic::find_window(app, win).is_none() {
            break;
        }
    }
    ungrab_pointer(app.core.display);
}
