//! Some utility functions without much logic in them

use std::ffi::CString;

use tracing::debug;

use crate::structs::{Application, Runtime};

/// Parse a "#rrggbb" color into 16-bit-per-channel values suitable for
/// color allocation.
pub fn parse_color(hex: &str) -> Option<(u16, u16, u16)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u16::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u16::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u16::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r * 257, g * 257, b * 257))
}

/// Render the panel status line: one record per (monitor, desktop) pair,
/// seven colon-separated integers each, records separated by spaces.
pub fn format_status(rt: &Runtime) -> String {
    let mut out = String::new();
    for (m, monitor) in rt.monitors.iter().enumerate() {
        for (d, desktop) in monitor.desktops.iter().enumerate() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!(
                "{}:{}:{}:{}:{}:{}:{}",
                m,
                u8::from(m == rt.current_monitor),
                d,
                desktop.clients.len(),
                desktop.mode as u8,
                u8::from(d == monitor.current_desktop),
                u8::from(desktop.has_urgent()),
            ));
        }
    }
    out
}

/// Disown spawned commands: with SIGCHLD ignored under SA_NOCLDWAIT the
/// kernel reaps terminated children itself, so none linger as zombies.
pub fn disown_children() {
    use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};

    let flags = SaFlags::SA_NOCLDSTOP | SaFlags::SA_NOCLDWAIT | SaFlags::SA_RESTART;
    let action = SigAction::new(SigHandler::SigIgn, flags, SigSet::empty());
    if unsafe { sigaction(Signal::SIGCHLD, &action) }.is_err() {
        debug!("failed to install the SIGCHLD disposition");
    }
}

/// Run a user command in its own session, detached from the X connection.
pub fn spawn(app: &mut Application, cmd: &[&str]) {
    let args: Vec<CString> = cmd
        .iter()
        .filter_map(|s| CString::new(*s).ok())
        .collect();
    if args.is_empty() {
        return;
    }
    unsafe {
        match nix::unistd::fork() {
            Ok(nix::unistd::ForkResult::Parent { child: _ }) => {}
            Ok(nix::unistd::ForkResult::Child) => {
                let fd =
                    x11::xlib::XConnectionNumber(app.core.display as *mut x11::xlib::Display);
                let _ = nix::unistd::close(fd);
                let _ = nix::unistd::setsid();
                let _ = nix::unistd::execvp(&args[0], &args);
                std::process::exit(1);
            }
            Err(e) => {
                debug!("fork failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::{Client, Desktop, Mode, Monitor};

    #[test]
    fn color_parsing() {
        assert_eq!(parse_color("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_color("#ffffff"), Some((65535, 65535, 65535)));
        assert_eq!(parse_color("#ff950e"), Some((255 * 257, 149 * 257, 14 * 257)));
        assert_eq!(parse_color("ff950e"), None);
        assert_eq!(parse_color("#ff950"), None);
        assert_eq!(parse_color("#gg0000"), None);
    }

    #[test]
    fn status_line_covers_every_desktop_in_order() {
        let desktops = |n: usize| -> Vec<Desktop> {
            (0..n).map(|_| Desktop::new(Mode::Tile, 400, true)).collect()
        };
        let mut m0 = Monitor {
            x: 0,
            y: 0,
            w: 1280,
            h: 800,
            desktops: desktops(2),
            current_desktop: 1,
            previous_desktop: 0,
        };
        m0.desktops[1].clients.push(Client::new(7));
        m0.desktops[1].clients.push(Client::new(8));
        m0.desktops[1].clients[0].urgent = true;
        m0.desktops[0].mode = Mode::Grid;
        let m1 = Monitor {
            x: 1280,
            y: 0,
            w: 1280,
            h: 800,
            desktops: desktops(2),
            current_desktop: 0,
            previous_desktop: 0,
        };
        let rt = Runtime {
            monitors: vec![m0, m1],
            current_monitor: 1,
            previous_monitor: 0,
        };
        assert_eq!(
            format_status(&rt),
            "0:0:0:0:3:0:0 0:0:1:2:0:1:1 1:1:0:0:0:1:0 1:1:1:0:0:0:0"
        );
    }
}
