//! A dynamic tiling window manager for X11, in the lineage of
//! [monsterwm](https://github.com/c00kiemon5ter/monsterwm).
//!
//! Features:
//! - Four tiling modes: vertical stack, monocle, bottom stack and grid
//! - Per-monitor virtual desktops with independent layouts
//! - Multi monitor setups via Xinerama
//! - Mouse-driven move and resize
//! - Panel support through a line-oriented status feed on stdout

pub mod config;
pub mod errors;
pub mod events;
pub mod layout;
pub mod logic;
pub mod mouse;
pub mod setup;
pub mod structs;
pub mod utils;
pub mod wrap;

use std::process::exit;

use libc::LC_CTYPE;
use tracing::trace;
use tracing_subscriber::EnvFilter;

use crate::structs::Application;
use crate::wrap::xlib::*;

/// Main event loop: block for one event, dispatch it, flush the wire.
fn run(app: &mut Application) {
    while app.core.running {
        flush(app.core.display);
        match next_event(app.core.display) {
            EEvent::KeyPress { key } => events::key_press(app, key),
            EEvent::ButtonPress { button } => events::button_press(app, button),
            EEvent::MapRequest { map_request } => events::map_request(app, map_request),
            EEvent::UnmapNotify { unmap } => events::unmap_notify(app, unmap),
            EEvent::DestroyNotify { destroy_window } => {
                events::destroy_notify(app, destroy_window)
            }
            EEvent::EnterNotify { crossing } => events::enter_notify(app, crossing),
            EEvent::MotionNotify { motion } => events::motion_notify(app, motion),
            EEvent::PropertyNotify { property } => events::property_notify(app, property),
            EEvent::ClientMessage { client_message } => {
                events::client_message(app, client_message)
            }
            EEvent::ConfigureRequest { configure_request } => {
                events::configure_request(app, configure_request)
            }
            EEvent::Unmanaged { type_ } => trace!("dropped event of type {type_}"),
            _ => {}
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    match args.len() {
        1 => {}
        2 if args[1] == "-v" => {
            println!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            return;
        }
        _ => {
            eprintln!("usage: {} [-v]", env!("CARGO_PKG_NAME"));
            exit(2);
        }
    }

    // diagnostics go to stderr; stdout belongs to the status feed
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    set_locale(LC_CTYPE, "");
    utils::disown_children();

    let mut app = match setup::setup() {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    };

    logic::desktopinfo(&mut app);
    run(&mut app);
    setup::cleanup(&mut app);
    exit(app.core.exit_code);
}
