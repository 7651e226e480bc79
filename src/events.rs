//! Functions ran for events

use tracing::{debug, trace};

use x11::xlib::{
    Button1, LockMask, NotifyInferior, NotifyNormal, XButtonEvent, XClientMessageEvent,
    XConfigureRequestEvent, XCrossingEvent, XDestroyWindowEvent, XKeyEvent, XMapRequestEvent,
    XMotionEvent, XPropertyEvent, XUnmapEvent, XUrgencyHint, XWindowChanges, XA_WM_HINTS,
};

use crate::config;
use crate::logic;
use crate::mouse::{self, Drag};
use crate::structs::{Action, Application, Client};
use crate::utils;
use crate::wrap::xlib::*;

fn clean_mask(app: &Application, mask: u32) -> u32 {
    mask & !(app.core.numlock_mask | LockMask)
}

pub fn run_action(app: &mut Application, action: &Action) {
    match action {
        Action::ChangeDesktop(d) => logic::change_desktop(app, *d),
        Action::ClientToDesktop(d) => logic::client_to_desktop(app, *d),
        Action::LastDesktop => logic::last_desktop(app),
        Action::RotateDesktop(dir) => logic::rotate_desktop(app, *dir),
        Action::RotateFilled(dir) => logic::rotate_filled(app, *dir),
        Action::RotateMonitor(dir) => logic::rotate_monitor(app, *dir),
        Action::LastMonitor => logic::last_monitor(app),
        Action::ClientToMonitor(dir) => {
            let count = app.runtime.monitors.len() as i32;
            let target = (app.runtime.current_monitor as i32 + dir).rem_euclid(count);
            logic::client_to_monitor(app, target as usize);
        }
        Action::NextWin => logic::next_win(app),
        Action::PrevWin => logic::prev_win(app),
        Action::MoveDown => logic::move_down(app),
        Action::MoveUp => logic::move_up(app),
        Action::SwapMaster => logic::swap_master(app),
        Action::ResizeMaster(delta) => logic::resize_master(app, *delta),
        Action::ResizeStack(delta) => logic::resize_stack(app, *delta),
        Action::SwitchMode(mode) => logic::switch_mode(app, *mode),
        Action::TogglePanel => logic::toggle_panel(app),
        Action::FocusUrgent => logic::focus_urgent(app),
        Action::KillClient => logic::kill_client(app),
        Action::MouseMove => mouse::mouse_motion(app, Drag::Move),
        Action::MouseResize => mouse::mouse_motion(app, Drag::Resize),
        Action::Spawn(cmd) => utils::spawn(app, cmd),
        Action::Quit(code) => logic::quit(app, *code),
    }
}

pub fn key_press(app: &mut Application, key_event: XKeyEvent) {
    let keysym = keycode_to_keysym(app.core.display, key_event.keycode);
    for binding in config::keys() {
        if binding.keysym == keysym
            && clean_mask(app, binding.modifier) == clean_mask(app, key_event.state)
        {
            run_action(app, &binding.action);
        }
    }
}

pub fn button_press(app: &mut Application, button_event: XButtonEvent) {
    let Some((m, d, i)) = logic::find_window(app, button_event.window) else {
        return;
    };
    trace!("button {} on window {}", button_event.button, button_event.window);
    let is_current = m == app.runtime.current_monitor
        && d == app.runtime.monitors[m].current_desktop
        && app.runtime.monitors[m].desktops[d].current == Some(i);
    if config::CLICK_TO_FOCUS && button_event.button == Button1 && !is_current {
        logic::focus_client(app, m, d, i);
    }
    for binding in config::buttons() {
        if binding.button == button_event.button
            && clean_mask(app, binding.modifier) == clean_mask(app, button_event.state)
        {
            logic::focus_client(app, m, d, i);
            run_action(app, &binding.action);
        }
    }
}

/// A window wants to be shown. Apply the first matching app rule, create a
/// client on the rule's desktop, pick up transient and fullscreen state,
/// and display or follow it depending on where it landed.
pub fn map_request(app: &mut Application, map_request: XMapRequestEvent) {
    let win = map_request.window;
    let Some(attributes) = get_window_attributes(app.core.display, win) else {
        return;
    };
    if attributes.override_redirect != 0 {
        return;
    }
    if logic::find_window(app, win).is_some() {
        return;
    }
    debug!("map request from window {win}");

    let mut follow = false;
    let mut floating = false;
    let cd = app.runtime.monitor().current_desktop;
    let mut newdsk = cd;
    let rules = config::rules();
    if let Some((instance, class)) = get_class_hint(app.core.display, win) {
        if let Some(rule) = rules.iter().find(|r| class == r.class || instance == r.class) {
            follow = rule.follow;
            floating = rule.floating;
            if let Some(d) = rule.desktop {
                if d < config::DESKTOPS {
                    newdsk = d;
                }
            }
        }
    }

    let transient = get_transient_for_hint(app.core.display, win).map_or(false, |w| w != 0);
    let fullscreen =
        get_atom_property(app.core.display, win, app.atoms.net_wm_state)
            == Some(app.atoms.net_fullscreen);

    let m = app.runtime.current_monitor;
    let mut client = Client::new(win);
    client.transient = transient;
    client.floating = floating || transient;
    let at = logic::add_window(app, m, newdsk, client);

    logic::grab_buttons(app, win);
    if fullscreen {
        logic::set_fullscreen(app, m, newdsk, at, true);
    }

    if newdsk == cd {
        map_window(app.core.display, win);
        logic::update_current(app, Some(at));
    } else if follow {
        logic::change_desktop(app, newdsk);
    }
    logic::desktopinfo(app);
}

/// Windows that request to unmap lose their client, so no invisible
/// windows linger. Unmaps reported against the root (our own hides during
/// desktop switches) are ignored.
pub fn unmap_notify(app: &mut Application, unmap_event: XUnmapEvent) {
    if let Some((m, d, i)) = logic::find_window(app, unmap_event.window) {
        if unmap_event.event != app.core.root {
            logic::remove_client(app, m, d, i);
        }
    }
    logic::desktopinfo(app);
}

pub fn destroy_notify(app: &mut Application, destroy_event: XDestroyWindowEvent) {
    if let Some((m, d, i)) = logic::find_window(app, destroy_event.window) {
        logic::remove_client(app, m, d, i);
    }
    logic::desktopinfo(app);
}

/// Geometry wishes from clients. Fullscreen windows get their fullscreen
/// geometry re-enforced instead; everything else is forwarded, shifted
/// below a visible top panel.
pub fn configure_request(app: &mut Application, request: XConfigureRequestEvent) {
    if let Some((m, d, i)) = logic::find_window(app, request.window) {
        if app.runtime.monitors[m].desktops[d].clients[i].fullscreen {
            logic::set_fullscreen(app, m, d, i, true);
            logic::tile(app);
            return;
        }
    }
    let y_offset = if app.runtime.desktop().show_panel && config::TOP_PANEL {
        config::PANEL_HEIGHT
    } else {
        0
    };
    let mut changes = XWindowChanges {
        x: request.x,
        y: request.y + y_offset,
        width: request.width,
        height: request.height,
        border_width: request.border_width,
        sibling: request.above,
        stack_mode: request.detail,
    };
    configure_window(
        app.core.display,
        request.window,
        request.value_mask as u32,
        &mut changes,
    );
    logic::tile(app);
}

/// NET_WM_STATE messages: fullscreen may be cleared (0), set (1) or
/// toggled (2).
pub fn client_message(app: &mut Application, client_event: XClientMessageEvent) {
    let Some((m, d, i)) = logic::find_window(app, client_event.window) else {
        return;
    };
    if client_event.message_type == app.atoms.net_wm_state
        && (client_event.data.get_long(1) as u64 == app.atoms.net_fullscreen
            || client_event.data.get_long(2) as u64 == app.atoms.net_fullscreen)
    {
        let fullscreen = app.runtime.monitors[m].desktops[d].clients[i].fullscreen;
        let action = client_event.data.get_long(0);
        let set = action == 1 || (action == 2 && !fullscreen);
        logic::set_fullscreen(app, m, d, i, set);
    }
}

/// Track the urgency hint of managed windows.
pub fn property_notify(app: &mut Application, property_event: XPropertyEvent) {
    if property_event.atom != XA_WM_HINTS {
        return;
    }
    let Some((m, d, i)) = logic::find_window(app, property_event.window) else {
        return;
    };
    if let Some(hints) = get_wm_hints(app.core.display, property_event.window) {
        app.runtime.monitors[m].desktops[d].clients[i].urgent =
            hints.flags & XUrgencyHint != 0;
        debug!(
            "window {} urgent: {}",
            property_event.window,
            hints.flags & XUrgencyHint != 0
        );
    }
    logic::desktopinfo(app);
}

pub fn enter_notify(app: &mut Application, crossing_event: XCrossingEvent) {
    if !config::FOLLOW_MOUSE {
        return;
    }
    if crossing_event.mode != NotifyNormal || crossing_event.detail == NotifyInferior {
        return;
    }
    let Some((m, d, i)) = logic::find_window(app, crossing_event.window) else {
        return;
    };
    // only windows of a visible desktop can be crossed
    if d != app.runtime.monitors[m].current_desktop {
        return;
    }
    logic::focus_client(app, m, d, i);
}

pub fn motion_notify(app: &mut Application, motion_event: XMotionEvent) {
    if !config::FOLLOW_MONITOR {
        return;
    }
    let target = app
        .runtime
        .monitor_at(motion_event.x_root, motion_event.y_root);
    if target != app.runtime.current_monitor {
        logic::change_monitor(app, target);
    }
}
