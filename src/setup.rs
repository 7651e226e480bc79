//! Startup and shutdown: acquire the display, probe for another window
//! manager, discover monitors, allocate colors, intern atoms, grab keys.

use x11::xlib::{
    ButtonPressMask, CurrentTime, LockMask, PointerMotionMask, PropModeReplace,
    PropertyChangeMask, RevertToPointerRoot, SubstructureNotifyMask, SubstructureRedirectMask,
    XA_ATOM,
};

use crate::config;
use crate::errors::Error;
use crate::layout;
use crate::logic;
use crate::structs::{Application, Atoms, Desktop, Monitor, Runtime, WmCore};
use crate::utils;
use crate::wrap::xinerama::*;
use crate::wrap::xlib::*;

pub fn setup() -> Result<Application, Error> {
    let display = open_display(None).ok_or(Error::OpenDisplay)?;

    let mut app = Application {
        core: WmCore {
            display,
            root: 0,
            screen: 0,
            running: true,
            exit_code: 0,
            numlock_mask: 0,
            win_focus: 0,
            win_unfocus: 0,
        },
        runtime: Runtime {
            monitors: Vec::new(),
            current_monitor: 0,
            previous_monitor: 0,
        },
        atoms: Atoms {
            wm_protocols: 0,
            wm_delete: 0,
            net_supported: 0,
            net_wm_state: 0,
            net_fullscreen: 0,
            net_active: 0,
        },
    };
    app.core.root = default_root_window(app.core.display);
    app.core.screen = default_screen(app.core.display);

    let event_mask = SubstructureRedirectMask
        | SubstructureNotifyMask
        | PropertyChangeMask
        | ButtonPressMask
        | if config::FOLLOW_MONITOR {
            PointerMotionMask
        } else {
            0
        };
    if !select_wm_input(app.core.display, app.core.root, event_mask) {
        return Err(Error::OtherWm);
    }
    set_error_handler();
    set_io_error_handler();

    init_monitors(&mut app);
    app.core.win_focus = init_color(&mut app, config::FOCUS)?;
    app.core.win_unfocus = init_color(&mut app, config::UNFOCUS)?;
    app.core.numlock_mask = numlock_mask(app.core.display).ok_or(Error::Keyboard)?;
    init_atoms(&mut app);
    grab_keys(&mut app);

    logic::change_monitor(&mut app, config::DEFAULT_MONITOR);
    logic::change_desktop(&mut app, config::DEFAULT_DESKTOP);

    Ok(app)
}

/// One monitor per Xinerama screen, or a single monitor spanning the root
/// screen when Xinerama is not active. The panel reservation comes off the
/// height up front.
fn init_monitors(app: &mut Application) {
    let panel = if config::SHOW_PANEL {
        config::PANEL_HEIGHT
    } else {
        0
    };
    let screens = xinerama_query_screens(app.core.display).unwrap_or_default();
    if screens.is_empty() {
        let w = display_width(app.core.display, app.core.screen);
        let h = display_height(app.core.display, app.core.screen);
        app.runtime.monitors.push(new_monitor(0, 0, w, h - panel));
    } else {
        for screen in screens {
            app.runtime.monitors.push(new_monitor(
                screen.x_org as i32,
                screen.y_org as i32,
                screen.width as i32,
                screen.height as i32 - panel,
            ));
        }
    }
}

fn new_monitor(x: i32, y: i32, w: i32, h: i32) -> Monitor {
    let master_size = layout::master_size_for(config::DEFAULT_MODE, w, h);
    let desktops = (0..config::DESKTOPS)
        .map(|_| Desktop::new(config::DEFAULT_MODE, master_size, config::SHOW_PANEL))
        .collect();
    Monitor {
        x,
        y,
        w,
        h,
        desktops,
        current_desktop: config::DEFAULT_DESKTOP,
        previous_desktop: config::DEFAULT_DESKTOP,
    }
}

fn init_color(app: &mut Application, hex: &str) -> Result<u64, Error> {
    utils::parse_color(hex)
        .and_then(|rgb| alloc_color(app.core.display, app.core.screen, rgb))
        .ok_or_else(|| Error::ColorAlloc(hex.to_string()))
}

fn init_atoms(app: &mut Application) {
    app.atoms = Atoms {
        wm_protocols: intern_atom(app.core.display, "WM_PROTOCOLS"),
        wm_delete: intern_atom(app.core.display, "WM_DELETE_WINDOW"),
        net_supported: intern_atom(app.core.display, "_NET_SUPPORTED"),
        net_wm_state: intern_atom(app.core.display, "_NET_WM_STATE"),
        net_fullscreen: intern_atom(app.core.display, "_NET_WM_STATE_FULLSCREEN"),
        net_active: intern_atom(app.core.display, "_NET_ACTIVE_WINDOW"),
    };
    let mut netatoms = [
        app.atoms.net_supported,
        app.atoms.net_wm_state,
        app.atoms.net_fullscreen,
        app.atoms.net_active,
    ];
    change_property(
        app.core.display,
        app.core.root,
        app.atoms.net_supported,
        XA_ATOM,
        32,
        PropModeReplace,
        netatoms.as_mut_ptr() as *mut u8,
        netatoms.len() as i32,
    );
}

/// Grab every bound key with every combination of the lock modifiers, so
/// bindings fire regardless of caps- and num-lock state.
fn grab_keys(app: &mut Application) {
    ungrab_all_keys(app.core.display, app.core.root);
    let extras = [
        0,
        LockMask,
        app.core.numlock_mask,
        app.core.numlock_mask | LockMask,
    ];
    for key in config::keys() {
        let keycode = keysym_to_keycode(app.core.display, key.keysym);
        if keycode == 0 {
            continue;
        }
        for extra in extras {
            grab_key(app.core.display, app.core.root, keycode, key.modifier | extra);
        }
    }
}

/// Release everything on the way out: ungrab the keyboard bindings, ask
/// every managed window to close, and hand input focus back to the root.
pub fn cleanup(app: &mut Application) {
    ungrab_all_keys(app.core.display, app.core.root);
    let windows: Vec<u64> = app
        .runtime
        .monitors
        .iter()
        .flat_map(|m| m.desktops.iter())
        .flat_map(|d| d.clients.iter())
        .map(|c| c.window)
        .collect();
    for win in windows {
        logic::delete_window(app, win);
    }
    set_input_focus(
        app.core.display,
        app.core.root,
        RevertToPointerRoot,
        CurrentTime,
    );
    flush(app.core.display);
    close_display(app.core.display);
}
