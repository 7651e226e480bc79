//! The stateful choreography: desktop and monitor switching, focus and
//! border discipline, client placement and the status line.

use std::io::Write;

use tracing::debug;

use x11::xlib::{
    AnyModifier, Button1, CurrentTime, DestroyAll, EnterWindowMask, LockMask, PropModeReplace,
    PropertyChangeMask, RevertToPointerRoot, XA_ATOM, XA_WINDOW,
};

use crate::config;
use crate::layout::{self, Rect};
use crate::structs::{Application, Client, Mode};
use crate::utils;
use crate::wrap::xlib::*;

/// Locate a managed window: (monitor, desktop, client) indices.
pub fn find_window(app: &Application, win: u64) -> Option<(usize, usize, usize)> {
    let rt = &app.runtime;
    for m in 0..rt.monitors.len() {
        for d in 0..rt.monitors[m].desktops.len() {
            if let Some(c) = rt.monitors[m].desktops[d].index_of(win) {
                return Some((m, d, c));
            }
        }
    }
    None
}

/// Add a client to desktop (m, d), subscribe to the events the manager
/// needs from its window, and make it the desktop's focus candidate.
/// Returns the client's index.
pub fn add_window(app: &mut Application, m: usize, d: usize, client: Client) -> usize {
    let mask = PropertyChangeMask | if config::FOLLOW_MOUSE { EnterWindowMask } else { 0 };
    select_input(app.core.display, client.window, mask);
    let desk = &mut app.runtime.monitors[m].desktops[d];
    let at = desk.attach(client, config::ATTACH_ASIDE);
    desk.prevfocus = desk.current;
    desk.current = Some(at);
    at
}

/// Unlink the client at (m, d, i). On the visible desktop focus falls back
/// to the previously focused client; elsewhere only the indices shift.
pub fn remove_client(app: &mut Application, m: usize, d: usize, i: usize) {
    let visible =
        m == app.runtime.current_monitor && d == app.runtime.monitors[m].current_desktop;
    let desk = &mut app.runtime.monitors[m].desktops[d];
    let gone = desk.detach(i);
    debug!("removed client {}", gone.window);
    let fallback = desk.prevfocus;
    if visible {
        update_current(app, fallback);
    } else {
        let desk = &mut app.runtime.monitors[m].desktops[d];
        desk.current = fallback;
        desk.prevfocus = fallback.and_then(|j| desk.prev_index(j));
    }
}

/// Focus transition plus everything the server must observe:
/// border widths and colors for the whole desktop, stacking of floating
/// windows, the active-window property, input focus and a re-tile.
///
/// A window has no border when it is alone on its desktop, fullscreen, or
/// tiled in monocle mode.
pub fn update_current(app: &mut Application, new: Option<usize>) {
    let Some(i) = new else {
        let desk = app.runtime.desktop_mut();
        desk.current = None;
        desk.prevfocus = None;
        delete_property(app.core.display, app.core.root, app.atoms.net_active);
        return;
    };

    {
        let desk = app.runtime.desktop_mut();
        if i >= desk.clients.len() {
            return;
        }
        if Some(i) == desk.prevfocus && Some(i) != desk.current {
            // refocusing the previous client swaps the two roles
            desk.current = Some(i);
            desk.prevfocus = desk.prev_index(i);
        } else if Some(i) != desk.current {
            desk.prevfocus = desk.current;
            desk.current = Some(i);
        }
    }

    let mode = app.runtime.desktop().mode;
    let clients = app.runtime.desktop().clients.clone();
    let current_win = clients[i].window;
    for (j, c) in clients.iter().enumerate() {
        let border = if clients.len() == 1
            || c.fullscreen
            || (mode == Mode::Monocle && !c.floating && !c.transient)
        {
            0
        } else {
            config::BORDER_WIDTH
        };
        set_window_border_width(app.core.display, c.window, border);
        let pixel = if j == i {
            app.core.win_focus
        } else {
            app.core.win_unfocus
        };
        set_window_border(app.core.display, c.window, pixel);
        if config::CLICK_TO_FOCUS {
            grab_button(app.core.display, c.window, Button1, AnyModifier);
        }
        if !c.floating && !c.transient {
            raise_window(app.core.display, c.window);
        }
    }
    // the focused window ends up on top of the floating layer
    if clients[i].floating || clients[i].transient {
        raise_window(app.core.display, current_win);
    }

    change_property(
        app.core.display,
        app.core.root,
        app.atoms.net_active,
        XA_WINDOW,
        32,
        PropModeReplace,
        &current_win as *const u64 as *mut u8,
        1,
    );
    set_input_focus(app.core.display, current_win, RevertToPointerRoot, CurrentTime);
    if config::CLICK_TO_FOCUS {
        grab_buttons(app, current_win);
    }
    tile(app);
}

/// Install the configured pointer bindings on a client window, once per
/// combination of the bound modifier with the lock modifiers.
pub fn grab_buttons(app: &mut Application, win: u64) {
    let extras = [
        0,
        LockMask,
        app.core.numlock_mask,
        app.core.numlock_mask | LockMask,
    ];
    for binding in config::buttons() {
        for extra in extras {
            grab_button(app.core.display, win, binding.button, binding.modifier | extra);
        }
    }
}

/// Drop the focus highlight from every window of a monitor's visible
/// desktop.
fn paint_unfocused(app: &mut Application, m: usize) {
    let windows: Vec<u64> = app.runtime.monitors[m]
        .current()
        .clients
        .iter()
        .map(|c| c.window)
        .collect();
    for win in windows {
        set_window_border(app.core.display, win, app.core.win_unfocus);
    }
}

/// Focus an arbitrary managed client, switching monitor and desktop to it
/// when necessary.
pub fn focus_client(app: &mut Application, m: usize, d: usize, i: usize) {
    if m != app.runtime.current_monitor {
        let old = app.runtime.current_monitor;
        app.runtime.previous_monitor = old;
        app.runtime.current_monitor = m;
        paint_unfocused(app, old);
    }
    if d != app.runtime.monitors[m].current_desktop {
        change_desktop(app, d);
    }
    update_current(app, Some(i));
}

pub fn tile(app: &mut Application) {
    tile_monitor(app, app.runtime.current_monitor);
}

/// Re-apply the layout of a monitor's visible desktop. Fullscreen clients
/// span the full output including the panel row; floating and transient
/// clients are left where they are.
pub fn tile_monitor(app: &mut Application, m: usize) {
    let mon = &app.runtime.monitors[m];
    let desk = mon.current();
    let hh = mon.h + if desk.show_panel { 0 } else { config::PANEL_HEIGHT };
    let cy = if config::TOP_PANEL && desk.show_panel {
        config::PANEL_HEIGHT
    } else {
        0
    };
    let area = Rect {
        x: mon.x,
        y: mon.y + cy,
        w: mon.w,
        h: hh,
    };
    let (mx, my, mw, mh) = (mon.x, mon.y, mon.w, mon.h);
    let tileable: Vec<u64> = desk
        .clients
        .iter()
        .filter(|c| c.tileable())
        .map(|c| c.window)
        .collect();
    let fullscreen: Vec<u64> = desk
        .clients
        .iter()
        .filter(|c| c.fullscreen)
        .map(|c| c.window)
        .collect();
    let frames = layout::arrange(desk.mode, area, tileable.len(), desk.master_size, desk.growth);

    for (win, frame) in tileable.iter().zip(frames) {
        set_window_border_width(app.core.display, *win, frame.border);
        move_resize_window(
            app.core.display,
            *win,
            frame.rect.x,
            frame.rect.y,
            frame.rect.w.max(1) as u32,
            frame.rect.h.max(1) as u32,
        );
    }
    for win in fullscreen {
        set_window_border_width(app.core.display, win, 0);
        move_resize_window(
            app.core.display,
            win,
            mx,
            my,
            mw as u32,
            (mh + config::PANEL_HEIGHT) as u32,
        );
        raise_window(app.core.display, win);
    }
}

/// Emit one status line for the panel and flush it out.
pub fn desktopinfo(app: &mut Application) {
    let line = utils::format_status(&app.runtime);
    let mut out = std::io::stdout().lock();
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

/// Switch the current monitor to another desktop. The destination windows
/// are mapped before the source windows are unmapped to avoid flicker.
pub fn change_desktop(app: &mut Application, target: usize) {
    if target >= config::DESKTOPS || target == app.runtime.monitor().current_desktop {
        return;
    }
    let old = app.runtime.monitor().current_desktop;
    {
        let mon = app.runtime.monitor_mut();
        mon.previous_desktop = old;
        mon.current_desktop = target;
    }

    let new_desk = app.runtime.desktop();
    let mut to_map: Vec<u64> = Vec::with_capacity(new_desk.clients.len());
    if let Some(w) = new_desk.window_of(new_desk.current) {
        to_map.push(w);
    }
    to_map.extend(
        new_desk
            .clients
            .iter()
            .map(|c| c.window)
            .filter(|w| Some(*w) != new_desk.window_of(new_desk.current)),
    );
    for win in to_map {
        map_window(app.core.display, win);
    }

    let cur = app.runtime.desktop().current;
    update_current(app, cur);

    let old_desk = &app.runtime.monitor().desktops[old];
    let current = old_desk.window_of(old_desk.current);
    let mut to_unmap: Vec<u64> = old_desk
        .clients
        .iter()
        .map(|c| c.window)
        .filter(|w| Some(*w) != current)
        .collect();
    to_unmap.extend(current);
    for win in to_unmap {
        unmap_window(app.core.display, win);
    }

    desktopinfo(app);
}

pub fn last_desktop(app: &mut Application) {
    change_desktop(app, app.runtime.monitor().previous_desktop);
}

pub fn rotate_desktop(app: &mut Application, dir: i32) {
    let desktops = config::DESKTOPS as i32;
    let cur = app.runtime.monitor().current_desktop as i32;
    change_desktop(app, (cur + dir).rem_euclid(desktops) as usize);
}

/// Jump to the next/previous desktop that has clients, if any.
pub fn rotate_filled(app: &mut Application, dir: i32) {
    let desktops = config::DESKTOPS as i32;
    let mon = app.runtime.monitor();
    let cur = mon.current_desktop as i32;
    let mut n = dir;
    let mut steps = 1;
    while steps < desktops
        && mon.desktops[(cur + n).rem_euclid(desktops) as usize]
            .clients
            .is_empty()
    {
        n += dir;
        steps += 1;
    }
    change_desktop(app, (cur + n).rem_euclid(desktops) as usize);
}

/// Move the current client to another desktop of the same monitor. It is
/// appended to the destination's tail and becomes its focus candidate.
pub fn client_to_desktop(app: &mut Application, target: usize) {
    if target >= config::DESKTOPS || target == app.runtime.monitor().current_desktop {
        return;
    }
    let Some(i) = app.runtime.desktop().current else {
        return;
    };

    let desk = app.runtime.desktop_mut();
    let client = desk.detach(i);
    let fallback = desk.prevfocus;
    let win = client.window;
    unmap_window(app.core.display, win);

    let m = app.runtime.current_monitor;
    let tdesk = &mut app.runtime.monitors[m].desktops[target];
    tdesk.clients.push(client);
    tdesk.prevfocus = tdesk.current;
    tdesk.current = Some(tdesk.clients.len() - 1);

    update_current(app, fallback);
    if config::FOLLOW_WINDOW {
        change_desktop(app, target);
    }
    desktopinfo(app);
}

pub fn change_monitor(app: &mut Application, target: usize) {
    if target >= app.runtime.monitors.len() || target == app.runtime.current_monitor {
        return;
    }
    let old = app.runtime.current_monitor;
    app.runtime.previous_monitor = old;
    app.runtime.current_monitor = target;
    paint_unfocused(app, old);
    let cur = app.runtime.desktop().current;
    update_current(app, cur);
    desktopinfo(app);
}

pub fn last_monitor(app: &mut Application) {
    change_monitor(app, app.runtime.previous_monitor);
}

pub fn rotate_monitor(app: &mut Application, dir: i32) {
    let count = app.runtime.monitors.len() as i32;
    let cur = app.runtime.current_monitor as i32;
    change_monitor(app, (cur + dir).rem_euclid(count) as usize);
}

/// Move the current client to another monitor's visible desktop, keeping
/// its floating/fullscreen/transient flags. Both monitors re-tile.
pub fn client_to_monitor(app: &mut Application, target: usize) {
    let m = app.runtime.current_monitor;
    if target == m || target >= app.runtime.monitors.len() {
        return;
    }
    let Some(i) = app.runtime.desktop().current else {
        return;
    };

    let desk = app.runtime.desktop_mut();
    let client = desk.detach(i);
    let fallback = desk.prevfocus;
    let win = client.window;
    unmap_window(app.core.display, win);

    let tdesk = app.runtime.monitors[target].current_mut();
    let at = tdesk.attach(client, config::ATTACH_ASIDE);
    tdesk.prevfocus = tdesk.current;
    tdesk.current = Some(at);

    tile_monitor(app, target);
    map_window(app.core.display, win);
    tile_monitor(app, m);
    update_current(app, fallback);

    if config::FOLLOW_WINDOW {
        change_monitor(app, target);
    }
    desktopinfo(app);
}

/// Cyclic focus of the next window of the current desktop.
pub fn next_win(app: &mut Application) {
    let desk = app.runtime.desktop();
    let Some(i) = desk.current else { return };
    if desk.clients.len() < 2 {
        return;
    }
    let next = (i + 1) % desk.clients.len();
    update_current(app, Some(next));
}

/// Cyclic focus of the previous window of the current desktop.
pub fn prev_win(app: &mut Application) {
    let desk = app.runtime.desktop();
    let Some(i) = desk.current else { return };
    let Some(prev) = desk.prev_index(i) else { return };
    app.runtime.desktop_mut().prevfocus = Some(i);
    update_current(app, Some(prev));
}

pub fn move_down(app: &mut Application) {
    app.runtime.desktop_mut().move_down();
    tile(app);
}

pub fn move_up(app: &mut Application) {
    app.runtime.desktop_mut().move_up();
    tile(app);
}

pub fn swap_master(app: &mut Application) {
    let desk = app.runtime.desktop_mut();
    if desk.current.is_none() || desk.clients.len() < 2 {
        return;
    }
    desk.swap_master();
    update_current(app, Some(0));
}

/// Focus the first urgent client anywhere in the system.
pub fn focus_urgent(app: &mut Application) {
    for m in 0..app.runtime.monitors.len() {
        for d in 0..app.runtime.monitors[m].desktops.len() {
            if let Some(i) = app.runtime.monitors[m].desktops[d]
                .clients
                .iter()
                .position(|c| c.urgent)
            {
                focus_client(app, m, d, i);
                return;
            }
        }
    }
}

/// Grow or shrink the master area. Neither the master nor the stack area
/// may become smaller than MINWSZ.
pub fn resize_master(app: &mut Application, delta: i32) {
    let (mw, mh) = {
        let mon = app.runtime.monitor();
        (mon.w, mon.h)
    };
    let desk = app.runtime.desktop_mut();
    let axis = if desk.mode == Mode::BStack { mh } else { mw };
    let size = desk.master_size + delta;
    if size <= config::MINWSZ || axis - size <= config::MINWSZ {
        return;
    }
    desk.master_size = size;
    tile(app);
}

/// Grow or shrink the first stack window. No boundary checks.
pub fn resize_stack(app: &mut Application, delta: i32) {
    app.runtime.desktop_mut().growth += delta;
    tile(app);
}

/// Change the tiling mode of the current desktop. The master size is reset
/// from MASTER_SIZE and every floating window returns to the tiled flow,
/// which also makes repeated switches to the same mode idempotent.
pub fn switch_mode(app: &mut Application, mode: Mode) {
    let (mw, mh) = {
        let mon = app.runtime.monitor();
        (mon.w, mon.h)
    };
    let desk = app.runtime.desktop_mut();
    for c in desk.clients.iter_mut() {
        // transients never return to the tiled flow
        if !c.transient {
            c.floating = false;
        }
    }
    desk.mode = mode;
    desk.master_size = layout::master_size_for(mode, mw, mh);
    let cur = desk.current;
    update_current(app, cur);
    desktopinfo(app);
}

pub fn toggle_panel(app: &mut Application) {
    let desk = app.runtime.desktop_mut();
    desk.show_panel = !desk.show_panel;
    tile(app);
}

/// Set or clear the fullscreen state of a client, publishing it on the
/// window's NET_WM_STATE property. Clearing re-tiles, which restores the
/// client's place in the layout; its floating flag is untouched.
pub fn set_fullscreen(app: &mut Application, m: usize, d: usize, i: usize, full: bool) {
    let (mx, my, mw, mh) = {
        let mon = &app.runtime.monitors[m];
        (mon.x, mon.y, mon.w, mon.h)
    };
    let (win, was) = {
        let c = &app.runtime.monitors[m].desktops[d].clients[i];
        (c.window, c.fullscreen)
    };
    if full != was {
        let atom = app.atoms.net_fullscreen;
        change_property(
            app.core.display,
            win,
            app.atoms.net_wm_state,
            XA_ATOM,
            32,
            PropModeReplace,
            &atom as *const u64 as *mut u8,
            i32::from(full),
        );
    }
    app.runtime.monitors[m].desktops[d].clients[i].fullscreen = full;
    if full {
        set_window_border_width(app.core.display, win, 0);
        move_resize_window(
            app.core.display,
            win,
            mx,
            my,
            mw as u32,
            (mh + config::PANEL_HEIGHT) as u32,
        );
    }
    if m == app.runtime.current_monitor && d == app.runtime.monitors[m].current_desktop {
        update_current(app, Some(i));
    }
}

/// Politely ask the current client to close, falling back to killing its
/// connection when it does not speak WM_DELETE_WINDOW.
pub fn kill_client(app: &mut Application) {
    let desk = app.runtime.desktop();
    let Some(i) = desk.current else { return };
    let win = desk.clients[i].window;
    let deletable = get_wm_protocols(app.core.display, win)
        .map(|protocols| protocols.contains(&app.atoms.wm_delete))
        .unwrap_or(false);
    if deletable {
        delete_window(app, win);
    } else {
        grab_server(app.core.display);
        set_close_down_mode(app.core.display, DestroyAll);
        x_kill_client(app.core.display, win);
        ungrab_server(app.core.display);
    }
    let m = app.runtime.current_monitor;
    let d = app.runtime.monitors[m].current_desktop;
    remove_client(app, m, d, i);
}

pub fn delete_window(app: &mut Application, win: u64) {
    send_client_message(
        app.core.display,
        win,
        app.atoms.wm_protocols,
        app.atoms.wm_delete as i64,
        CurrentTime as i64,
    );
}

pub fn quit(app: &mut Application, code: i32) {
    app.core.exit_code = code;
    app.core.running = false;
}
