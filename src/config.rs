//! Configuration file for editing user defined settings

use crate::structs::{Action, AppRule, ButtonBinding, KeyBinding, Mode, NEXT, PREV};
use x11::keysym::*;
use x11::xlib::Mod1Mask as ModKey;
use x11::xlib::{Button1, Button3, ShiftMask};

/// Virtual desktops per monitor.
pub const DESKTOPS: usize = 4;
pub const DEFAULT_DESKTOP: usize = 0;
pub const DEFAULT_MONITOR: usize = 0;
pub const DEFAULT_MODE: Mode = Mode::Tile;

/// Fraction of the primary axis occupied by the master area.
pub const MASTER_SIZE: f32 = 0.52;
pub const BORDER_WIDTH: u32 = 2;

/// Space reserved for an external panel process, and on which edge.
pub const PANEL_HEIGHT: i32 = 18;
pub const TOP_PANEL: bool = true;
pub const SHOW_PANEL: bool = true;

/// Smallest size a window can be resized to, and the smallest either area
/// of a master-stack split may shrink to.
pub const MINWSZ: i32 = 50;

pub const FOCUS: &str = "#ff950e";
pub const UNFOCUS: &str = "#444444";

/// New clients are appended to the tail of the stack instead of becoming
/// the new master.
pub const ATTACH_ASIDE: bool = true;
pub const FOLLOW_MOUSE: bool = false;
pub const FOLLOW_MONITOR: bool = true;
pub const FOLLOW_WINDOW: bool = false;
pub const CLICK_TO_FOCUS: bool = true;

const TERM_CMD: &[&str] = &["xterm"];
const MENU_CMD: &[&str] = &["dmenu_run"];

pub fn rules() -> Vec<AppRule> {
    vec![
        AppRule {
            class: "MPlayer",
            desktop: None,
            follow: false,
            floating: true,
        },
        AppRule {
            class: "Gimp",
            desktop: Some(3),
            follow: false,
            floating: false,
        },
    ]
}

pub fn keys() -> Vec<KeyBinding> {
    let mut keys = vec![
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_Return,
            action: Action::Spawn(TERM_CMD),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_v,
            action: Action::Spawn(MENU_CMD),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_c,
            action: Action::KillClient,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_j,
            action: Action::NextWin,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_k,
            action: Action::PrevWin,
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_j,
            action: Action::MoveDown,
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_k,
            action: Action::MoveUp,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_Return,
            action: Action::SwapMaster,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_h,
            action: Action::ResizeMaster(-10),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_l,
            action: Action::ResizeMaster(10),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_o,
            action: Action::ResizeStack(-10),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_p,
            action: Action::ResizeStack(10),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_t,
            action: Action::SwitchMode(Mode::Tile),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_m,
            action: Action::SwitchMode(Mode::Monocle),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_b,
            action: Action::SwitchMode(Mode::BStack),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_g,
            action: Action::SwitchMode(Mode::Grid),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_b,
            action: Action::TogglePanel,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_BackSpace,
            action: Action::FocusUrgent,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_Tab,
            action: Action::LastDesktop,
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_Right,
            action: Action::RotateDesktop(NEXT),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_Left,
            action: Action::RotateDesktop(PREV),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_Right,
            action: Action::RotateFilled(NEXT),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_Left,
            action: Action::RotateFilled(PREV),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_period,
            action: Action::RotateMonitor(NEXT),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_comma,
            action: Action::RotateMonitor(PREV),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_period,
            action: Action::ClientToMonitor(NEXT),
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_comma,
            action: Action::ClientToMonitor(PREV),
        },
        KeyBinding {
            modifier: ModKey,
            keysym: XK_grave,
            action: Action::LastMonitor,
        },
        KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: XK_q,
            action: Action::Quit(0),
        },
    ];

    let desktop_keysyms = [XK_1, XK_2, XK_3, XK_4];
    for (i, keysym) in desktop_keysyms.iter().take(DESKTOPS).enumerate() {
        keys.push(KeyBinding {
            modifier: ModKey,
            keysym: *keysym,
            action: Action::ChangeDesktop(i),
        });
        keys.push(KeyBinding {
            modifier: ModKey | ShiftMask,
            keysym: *keysym,
            action: Action::ClientToDesktop(i),
        });
    }

    keys
}

pub fn buttons() -> Vec<ButtonBinding> {
    vec![
        ButtonBinding {
            modifier: ModKey,
            button: Button1,
            action: Action::MouseMove,
        },
        ButtonBinding {
            modifier: ModKey,
            button: Button3,
            action: Action::MouseResize,
        },
    ]
}
