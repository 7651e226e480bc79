//! \*Safe\* wrap for x11

pub mod xlib {
    use std::sync::atomic::{AtomicBool, Ordering};

    use x11::xlib::{
        Atom, ButtonPress, ButtonRelease, ClientMessage, ConfigureRequest, DestroyNotify,
        EnterNotify, KeyPress, KeyRelease, MapRequest, MotionNotify, PropertyNotify, UnmapNotify,
        XEvent,
    };

    static WM_DETECTED: AtomicBool = AtomicBool::new(false);

    unsafe extern "C" fn ignore_error(
        _d: *mut x11::xlib::Display,
        _e: *mut x11::xlib::XErrorEvent,
    ) -> i32 {
        0
    }

    unsafe extern "C" fn detect_wm_error(
        _d: *mut x11::xlib::Display,
        e: *mut x11::xlib::XErrorEvent,
    ) -> i32 {
        if (*e).error_code == x11::xlib::BadAccess {
            WM_DETECTED.store(true, Ordering::SeqCst);
        }
        0
    }

    unsafe extern "C" fn die_io_error(_d: *mut x11::xlib::Display) -> i32 {
        eprintln!("error: connection to the X server lost");
        std::process::exit(1);
    }

    pub fn set_error_handler() {
        unsafe {
            x11::xlib::XSetErrorHandler(Some(ignore_error));
        }
    }

    pub fn set_io_error_handler() {
        unsafe {
            x11::xlib::XSetIOErrorHandler(Some(die_io_error));
        }
    }

    /// Request the wm event mask on the root window. Only one client may
    /// hold substructure redirection, so a BadAccess here means another
    /// window manager is running.
    pub fn select_wm_input(display: &mut x11::xlib::Display, root: u64, mask: i64) -> bool {
        unsafe {
            WM_DETECTED.store(false, Ordering::SeqCst);
            let old = x11::xlib::XSetErrorHandler(Some(detect_wm_error));
            x11::xlib::XSelectInput(display as *mut x11::xlib::Display, root, mask);
            x11::xlib::XSync(display as *mut x11::xlib::Display, 0);
            x11::xlib::XSetErrorHandler(old);
            !WM_DETECTED.load(Ordering::SeqCst)
        }
    }

    pub fn set_locale(c: i32, l: &str) {
        unsafe {
            let locale = std::ffi::CString::new(l).unwrap();
            libc::setlocale(c, locale.as_ptr());
        }
    }

    pub fn open_display(display_name: Option<&str>) -> Option<&'static mut x11::xlib::Display> {
        unsafe {
            let result = match display_name {
                Some(dn) => {
                    let name = std::ffi::CString::new(dn).unwrap();
                    x11::xlib::XOpenDisplay(name.as_ptr())
                }
                None => x11::xlib::XOpenDisplay(std::ptr::null::<i8>()),
            };
            result.as_mut()
        }
    }

    pub fn close_display(display: &mut x11::xlib::Display) {
        unsafe {
            x11::xlib::XCloseDisplay(display as *mut x11::xlib::Display);
        }
    }

    pub fn default_root_window(display: &mut x11::xlib::Display) -> u64 {
        unsafe { x11::xlib::XDefaultRootWindow(display as *mut x11::xlib::Display) }
    }

    pub fn default_screen(display: &mut x11::xlib::Display) -> i32 {
        unsafe { x11::xlib::XDefaultScreen(display as *mut x11::xlib::Display) }
    }

    pub fn display_width(display: &mut x11::xlib::Display, screen: i32) -> i32 {
        unsafe { x11::xlib::XDisplayWidth(display as *mut x11::xlib::Display, screen) }
    }

    pub fn display_height(display: &mut x11::xlib::Display, screen: i32) -> i32 {
        unsafe { x11::xlib::XDisplayHeight(display as *mut x11::xlib::Display, screen) }
    }

    pub fn select_input(display: &mut x11::xlib::Display, w: u64, event_mask: i64) -> i32 {
        unsafe { x11::xlib::XSelectInput(display as *mut x11::xlib::Display, w, event_mask) }
    }

    pub fn flush(display: &mut x11::xlib::Display) {
        unsafe {
            x11::xlib::XFlush(display as *mut x11::xlib::Display);
        }
    }

    pub fn grab_key(display: &mut x11::xlib::Display, root: u64, keycode: u32, modifiers: u32) {
        unsafe {
            x11::xlib::XGrabKey(
                display as *mut x11::xlib::Display,
                keycode as i32,
                modifiers,
                root,
                1,
                x11::xlib::GrabModeAsync,
                x11::xlib::GrabModeAsync,
            );
        }
    }

    pub fn ungrab_all_keys(display: &mut x11::xlib::Display, root: u64) {
        unsafe {
            x11::xlib::XUngrabKey(
                display as *mut x11::xlib::Display,
                x11::xlib::AnyKey,
                x11::xlib::AnyModifier,
                root,
            );
        }
    }

    pub fn grab_button(display: &mut x11::xlib::Display, win: u64, button: u32, modifiers: u32) {
        unsafe {
            x11::xlib::XGrabButton(
                display as *mut x11::xlib::Display,
                button,
                modifiers,
                win,
                1,
                x11::xlib::ButtonPressMask as u32,
                x11::xlib::GrabModeAsync,
                x11::xlib::GrabModeAsync,
                0,
                0,
            );
        }
    }

    pub fn grab_pointer(display: &mut x11::xlib::Display, root: u64) -> bool {
        unsafe {
            x11::xlib::XGrabPointer(
                display as *mut x11::xlib::Display,
                root,
                0,
                (x11::xlib::ButtonPressMask
                    | x11::xlib::ButtonReleaseMask
                    | x11::xlib::ButtonMotionMask
                    | x11::xlib::PointerMotionMask) as u32,
                x11::xlib::GrabModeAsync,
                x11::xlib::GrabModeAsync,
                0,
                0,
                x11::xlib::CurrentTime,
            ) == x11::xlib::GrabSuccess
        }
    }

    pub fn ungrab_pointer(display: &mut x11::xlib::Display) {
        unsafe {
            x11::xlib::XUngrabPointer(display as *mut x11::xlib::Display, x11::xlib::CurrentTime);
        }
    }

    pub fn query_pointer(display: &mut x11::xlib::Display, root: u64) -> Option<(i32, i32)> {
        unsafe {
            let mut root_return: u64 = 0;
            let mut child_return: u64 = 0;
            let mut root_x: i32 = 0;
            let mut root_y: i32 = 0;
            let mut win_x: i32 = 0;
            let mut win_y: i32 = 0;
            let mut mask: u32 = 0;
            if x11::xlib::XQueryPointer(
                display as *mut x11::xlib::Display,
                root,
                &mut root_return as *mut u64,
                &mut child_return as *mut u64,
                &mut root_x as *mut i32,
                &mut root_y as *mut i32,
                &mut win_x as *mut i32,
                &mut win_y as *mut i32,
                &mut mask as *mut u32,
            ) != 0
            {
                Some((root_x, root_y))
            } else {
                None
            }
        }
    }

    pub fn keysym_to_keycode(display: &mut x11::xlib::Display, keysym: u32) -> u32 {
        unsafe {
            x11::xlib::XKeysymToKeycode(display as *mut x11::xlib::Display, keysym as u64) as u32
        }
    }

    pub fn keycode_to_keysym(display: &mut x11::xlib::Display, keycode: u32) -> u32 {
        unsafe {
            x11::xlib::XKeycodeToKeysym(display as *mut x11::xlib::Display, keycode as u8, 0) as u32
        }
    }

    /// Find which of the eight modifier bits carries Num_Lock. The mask is
    /// needed to ignore that modifier when matching bindings.
    pub fn numlock_mask(display: &mut x11::xlib::Display) -> Option<u32> {
        unsafe {
            let modmap = x11::xlib::XGetModifierMapping(display as *mut x11::xlib::Display);
            if modmap.is_null() {
                return None;
            }
            let numlock = x11::xlib::XKeysymToKeycode(
                display as *mut x11::xlib::Display,
                x11::keysym::XK_Num_Lock as u64,
            );
            let per = (*modmap).max_keypermod as usize;
            let map = std::slice::from_raw_parts((*modmap).modifiermap, 8 * per);
            let mut mask = 0;
            for i in 0..8 {
                for j in 0..per {
                    let keycode = map[i * per + j];
                    if keycode != 0 && keycode == numlock {
                        mask = 1 << i;
                    }
                }
            }
            x11::xlib::XFreeModifiermap(modmap);
            Some(mask)
        }
    }

    pub fn map_window(display: &mut x11::xlib::Display, w: u64) {
        unsafe {
            x11::xlib::XMapWindow(display as *mut x11::xlib::Display, w);
        }
    }

    pub fn unmap_window(display: &mut x11::xlib::Display, w: u64) {
        unsafe {
            x11::xlib::XUnmapWindow(display as *mut x11::xlib::Display, w);
        }
    }

    pub fn move_resize_window(
        display: &mut x11::xlib::Display,
        w: u64,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) {
        unsafe {
            x11::xlib::XMoveResizeWindow(
                display as *mut x11::xlib::Display,
                w,
                x,
                y,
                width,
                height,
            );
        }
    }

    pub fn move_window(display: &mut x11::xlib::Display, w: u64, x: i32, y: i32) {
        unsafe {
            x11::xlib::XMoveWindow(display as *mut x11::xlib::Display, w, x, y);
        }
    }

    pub fn resize_window(display: &mut x11::xlib::Display, w: u64, width: u32, height: u32) {
        unsafe {
            x11::xlib::XResizeWindow(display as *mut x11::xlib::Display, w, width, height);
        }
    }

    pub fn raise_window(display: &mut x11::xlib::Display, w: u64) {
        unsafe {
            x11::xlib::XRaiseWindow(display as *mut x11::xlib::Display, w);
        }
    }

    pub fn set_window_border(display: &mut x11::xlib::Display, w: u64, border_pixel: u64) {
        unsafe {
            x11::xlib::XSetWindowBorder(display as *mut x11::xlib::Display, w, border_pixel);
        }
    }

    pub fn set_window_border_width(display: &mut x11::xlib::Display, w: u64, width: u32) {
        unsafe {
            x11::xlib::XSetWindowBorderWidth(display as *mut x11::xlib::Display, w, width);
        }
    }

    pub fn set_input_focus(
        display: &mut x11::xlib::Display,
        focus: u64,
        revert_to: i32,
        time: u64,
    ) {
        unsafe {
            x11::xlib::XSetInputFocus(display as *mut x11::xlib::Display, focus, revert_to, time);
        }
    }

    pub fn configure_window(
        display: &mut x11::xlib::Display,
        w: u64,
        valuemask: u32,
        values: &mut x11::xlib::XWindowChanges,
    ) {
        unsafe {
            x11::xlib::XConfigureWindow(
                display as *mut x11::xlib::Display,
                w,
                valuemask,
                values as *mut x11::xlib::XWindowChanges,
            );
        }
    }

    pub fn intern_atom(display: &mut x11::xlib::Display, atom_name: &str) -> Atom {
        unsafe {
            let name = std::ffi::CString::new(atom_name).unwrap();
            x11::xlib::XInternAtom(display as *mut x11::xlib::Display, name.as_ptr(), 0)
        }
    }

    pub fn change_property(
        display: &mut x11::xlib::Display,
        w: u64,
        property: Atom,
        type_: Atom,
        format: i32,
        mode: i32,
        data: *mut u8,
        nelements: i32,
    ) {
        unsafe {
            x11::xlib::XChangeProperty(
                display as *mut x11::xlib::Display,
                w,
                property,
                type_,
                format,
                mode,
                data,
                nelements,
            );
        }
    }

    pub fn delete_property(display: &mut x11::xlib::Display, w: u64, property: Atom) {
        unsafe {
            x11::xlib::XDeleteProperty(display as *mut x11::xlib::Display, w, property);
        }
    }

    /// Read the first 32-bit atom stored in `property`, if any.
    pub fn get_atom_property(display: &mut x11::xlib::Display, w: u64, property: Atom) -> Option<Atom> {
        unsafe {
            let mut actual_type: Atom = 0;
            let mut actual_format: i32 = 0;
            let mut nitems: u64 = 0;
            let mut bytes_after: u64 = 0;
            let mut prop: *mut u8 = std::ptr::null_mut();
            let status = x11::xlib::XGetWindowProperty(
                display as *mut x11::xlib::Display,
                w,
                property,
                0,
                std::mem::size_of::<Atom>() as i64,
                0,
                x11::xlib::XA_ATOM,
                &mut actual_type as *mut Atom,
                &mut actual_format as *mut i32,
                &mut nitems as *mut u64,
                &mut bytes_after as *mut u64,
                &mut prop as *mut *mut u8,
            );
            if status == x11::xlib::Success as i32 && !prop.is_null() {
                let atom = if nitems > 0 {
                    Some(*(prop as *mut Atom))
                } else {
                    None
                };
                x11::xlib::XFree(prop as *mut libc::c_void);
                atom
            } else {
                None
            }
        }
    }

    pub fn get_wm_protocols(display: &mut x11::xlib::Display, w: u64) -> Option<Vec<Atom>> {
        unsafe {
            let mut protocols: *mut Atom = std::ptr::null_mut::<u64>();
            let mut count: i32 = 0;
            if x11::xlib::XGetWMProtocols(
                display as *mut x11::xlib::Display,
                w,
                &mut protocols as *mut *mut Atom,
                &mut count as *mut i32,
            ) != 0
            {
                let list = std::slice::from_raw_parts(protocols, count as usize).to_vec();
                x11::xlib::XFree(protocols as *mut libc::c_void);
                Some(list)
            } else {
                None
            }
        }
    }

    pub fn get_transient_for_hint(display: &mut x11::xlib::Display, w: u64) -> Option<u64> {
        unsafe {
            let mut prop_window: u64 = 0;
            if x11::xlib::XGetTransientForHint(
                display as *mut x11::xlib::Display,
                w,
                &mut prop_window as *mut u64,
            ) != 0
            {
                Some(prop_window)
            } else {
                None
            }
        }
    }

    pub fn get_wm_hints(display: &mut x11::xlib::Display, w: u64) -> Option<x11::xlib::XWMHints> {
        unsafe {
            let hints = x11::xlib::XGetWMHints(display as *mut x11::xlib::Display, w);
            if hints.is_null() {
                return None;
            }
            let copy = *hints;
            x11::xlib::XFree(hints as *mut libc::c_void);
            Some(copy)
        }
    }

    /// WM_CLASS as (instance, class).
    pub fn get_class_hint(display: &mut x11::xlib::Display, w: u64) -> Option<(String, String)> {
        unsafe {
            let mut hint = x11::xlib::XClassHint {
                res_name: std::ptr::null_mut(),
                res_class: std::ptr::null_mut(),
            };
            if x11::xlib::XGetClassHint(
                display as *mut x11::xlib::Display,
                w,
                &mut hint as *mut x11::xlib::XClassHint,
            ) == 0
            {
                return None;
            }
            let take = |p: *mut i8| {
                if p.is_null() {
                    String::new()
                } else {
                    let s = std::ffi::CStr::from_ptr(p).to_string_lossy().into_owned();
                    x11::xlib::XFree(p as *mut libc::c_void);
                    s
                }
            };
            Some((take(hint.res_name), take(hint.res_class)))
        }
    }

    pub fn get_geometry(display: &mut x11::xlib::Display, w: u64) -> Option<(i32, i32, u32, u32)> {
        unsafe {
            let mut root: u64 = 0;
            let mut x: i32 = 0;
            let mut y: i32 = 0;
            let mut width: u32 = 0;
            let mut height: u32 = 0;
            let mut border: u32 = 0;
            let mut depth: u32 = 0;
            if x11::xlib::XGetGeometry(
                display as *mut x11::xlib::Display,
                w,
                &mut root as *mut u64,
                &mut x as *mut i32,
                &mut y as *mut i32,
                &mut width as *mut u32,
                &mut height as *mut u32,
                &mut border as *mut u32,
                &mut depth as *mut u32,
            ) != 0
            {
                Some((x, y, width, height))
            } else {
                None
            }
        }
    }

    pub fn get_window_attributes(
        display: &mut x11::xlib::Display,
        w: u64,
    ) -> Option<x11::xlib::XWindowAttributes> {
        unsafe {
            let mut wa: x11::xlib::XWindowAttributes =
                std::mem::MaybeUninit::zeroed().assume_init();
            if x11::xlib::XGetWindowAttributes(
                display as *mut x11::xlib::Display,
                w,
                &mut wa as *mut x11::xlib::XWindowAttributes,
            ) != 0
            {
                Some(wa)
            } else {
                None
            }
        }
    }

    pub fn send_client_message(
        display: &mut x11::xlib::Display,
        w: u64,
        message_type: Atom,
        data0: i64,
        data1: i64,
    ) -> bool {
        unsafe {
            let mut xe = XEvent { type_: 0 };
            xe.client_message = x11::xlib::XClientMessageEvent {
                type_: ClientMessage,
                serial: 0,
                send_event: 0,
                display: std::ptr::null_mut(),
                window: w,
                message_type,
                format: 32,
                data: {
                    let mut d = x11::xlib::ClientMessageData::new();
                    d.set_long(0, data0);
                    d.set_long(1, data1);
                    d
                },
            };
            x11::xlib::XSendEvent(
                display as *mut x11::xlib::Display,
                w,
                0,
                x11::xlib::NoEventMask,
                &mut xe as *mut XEvent,
            ) != 0
        }
    }

    pub fn grab_server(display: &mut x11::xlib::Display) {
        unsafe {
            x11::xlib::XGrabServer(display as *mut x11::xlib::Display);
        }
    }

    pub fn ungrab_server(display: &mut x11::xlib::Display) {
        unsafe {
            x11::xlib::XUngrabServer(display as *mut x11::xlib::Display);
        }
    }

    pub fn set_close_down_mode(display: &mut x11::xlib::Display, mode: i32) {
        unsafe {
            x11::xlib::XSetCloseDownMode(display as *mut x11::xlib::Display, mode);
        }
    }

    pub fn x_kill_client(display: &mut x11::xlib::Display, w: u64) {
        unsafe {
            x11::xlib::XKillClient(display as *mut x11::xlib::Display, w);
        }
    }

    /// Allocate a pixel for a 16-bit-per-channel color on the default
    /// colormap.
    pub fn alloc_color(
        display: &mut x11::xlib::Display,
        screen: i32,
        (red, green, blue): (u16, u16, u16),
    ) -> Option<u64> {
        unsafe {
            let colormap = x11::xlib::XDefaultColormap(display as *mut x11::xlib::Display, screen);
            let mut color = x11::xlib::XColor {
                pixel: 0,
                red,
                green,
                blue,
                flags: 0,
                pad: 0,
            };
            if x11::xlib::XAllocColor(
                display as *mut x11::xlib::Display,
                colormap,
                &mut color as *mut x11::xlib::XColor,
            ) != 0
            {
                Some(color.pixel)
            } else {
                None
            }
        }
    }

    pub fn next_event(display: &mut x11::xlib::Display) -> EEvent {
        unsafe {
            let mut ev: XEvent = XEvent { type_: 0 };
            x11::xlib::XNextEvent(display as *mut x11::xlib::Display, &mut ev as *mut XEvent);
            match ev.type_ {
                KeyPress => EEvent::KeyPress { key: ev.key },
                KeyRelease => EEvent::KeyRelease { key: ev.key },
                ButtonPress => EEvent::ButtonPress { button: ev.button },
                ButtonRelease => EEvent::ButtonRelease { button: ev.button },
                MotionNotify => EEvent::MotionNotify { motion: ev.motion },
                MapRequest => EEvent::MapRequest {
                    map_request: ev.map_request,
                },
                EnterNotify => EEvent::EnterNotify {
                    crossing: ev.crossing,
                },
                DestroyNotify => EEvent::DestroyNotify {
                    destroy_window: ev.destroy_window,
                },
                UnmapNotify => EEvent::UnmapNotify { unmap: ev.unmap },
                PropertyNotify => EEvent::PropertyNotify {
                    property: ev.property,
                },
                ClientMessage => EEvent::ClientMessage {
                    client_message: ev.client_message,
                },
                ConfigureRequest => EEvent::ConfigureRequest {
                    configure_request: ev.configure_request,
                },
                _ => EEvent::Unmanaged { type_: ev.type_ },
            }
        }
    }

    pub enum EEvent {
        KeyPress {
            key: x11::xlib::XKeyEvent,
        },
        KeyRelease {
            key: x11::xlib::XKeyEvent,
        },
        ButtonPress {
            button: x11::xlib::XButtonEvent,
        },
        ButtonRelease {
            button: x11::xlib::XButtonEvent,
        },
        MotionNotify {
            motion: x11::xlib::XMotionEvent,
        },
        MapRequest {
            map_request: x11::xlib::XMapRequestEvent,
        },
        EnterNotify {
            crossing: x11::xlib::XCrossingEvent,
        },
        DestroyNotify {
            destroy_window: x11::xlib::XDestroyWindowEvent,
        },
        UnmapNotify {
            unmap: x11::xlib::XUnmapEvent,
        },
        PropertyNotify {
            property: x11::xlib::XPropertyEvent,
        },
        ClientMessage {
            client_message: x11::xlib::XClientMessageEvent,
        },
        ConfigureRequest {
            configure_request: x11::xlib::XConfigureRequestEvent,
        },
        Unmanaged {
            type_: i32,
        },
    }
}

pub mod xinerama {
    pub fn xinerama_query_screens(
        display: &mut x11::xlib::Display,
    ) -> Option<Vec<x11::xinerama::XineramaScreenInfo>> {
        unsafe {
            let mut screens_amount: i32 = 0;
            let info = x11::xinerama::XineramaQueryScreens(
                display as *mut x11::xlib::Display,
                &mut screens_amount as *mut i32,
            );
            let screens = info
                .as_mut()
                .map(|xqs| std::slice::from_raw_parts_mut(xqs, screens_amount as usize).to_vec());
            if !info.is_null() {
                x11::xlib::XFree(info as *mut libc::c_void);
            }
            screens
        }
    }
}
