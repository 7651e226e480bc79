//! All newly defined structs used by the window manager

/// Tiling layout of one desktop. The discriminants are part of the status
/// line format consumed by external panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Tile = 0,
    Monocle = 1,
    BStack = 2,
    Grid = 3,
}

/// Direction argument for the rotate actions.
pub const PREV: i32 = -1;
pub const NEXT: i32 = 1;

pub struct Application {
    pub core: WmCore,
    pub runtime: Runtime,
    pub atoms: Atoms,
}

pub struct WmCore {
    pub display: &'static mut x11::xlib::Display,
    pub root: u64,
    pub screen: i32,
    pub running: bool,
    pub exit_code: i32,
    pub numlock_mask: u32,
    pub win_focus: u64,
    pub win_unfocus: u64,
}

impl std::fmt::Debug for WmCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WmCore")
            .field("display", &"<connection>")
            .field("root", &self.root)
            .field("running", &self.running)
            .finish()
    }
}

#[derive(Debug)]
pub struct Atoms {
    pub wm_protocols: u64,
    pub wm_delete: u64,
    pub net_supported: u64,
    pub net_wm_state: u64,
    pub net_fullscreen: u64,
    pub net_active: u64,
}

/// A key binding: modifier mask + keysym resolved against `Action`.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub modifier: u32,
    pub keysym: u32,
    pub action: Action,
}

/// A pointer binding, matched on the grabbed client windows.
#[derive(Debug, Clone)]
pub struct ButtonBinding {
    pub modifier: u32,
    pub button: u32,
    pub action: Action,
}

/// Behavior override for windows matching a WM_CLASS string.
/// `desktop == None` keeps the window on the current desktop.
#[derive(Debug, Clone)]
pub struct AppRule {
    pub class: &'static str,
    pub desktop: Option<usize>,
    pub follow: bool,
    pub floating: bool,
}

#[derive(Debug, Clone)]
pub enum Action {
    ChangeDesktop(usize),
    ClientToDesktop(usize),
    LastDesktop,
    RotateDesktop(i32),
    RotateFilled(i32),
    RotateMonitor(i32),
    LastMonitor,
    ClientToMonitor(i32),
    NextWin,
    PrevWin,
    MoveDown,
    MoveUp,
    SwapMaster,
    ResizeMaster(i32),
    ResizeStack(i32),
    SwitchMode(Mode),
    TogglePanel,
    FocusUrgent,
    KillClient,
    MouseMove,
    MouseResize,
    Spawn(&'static [&'static str]),
    Quit(i32),
}

/// One managed top-level window.
///
/// `transient` is separate from `floating` as floating windows can be reset
/// to their tiling positions, while transients will always be floating.
#[derive(Debug, Default, Clone)]
pub struct Client {
    pub window: u64,
    pub urgent: bool,
    pub transient: bool,
    pub fullscreen: bool,
    pub floating: bool,
}

impl Client {
    pub fn new(window: u64) -> Self {
        Client {
            window,
            ..Client::default()
        }
    }

    /// A client participates in tiling only when none of the three
    /// out-of-flow flags is set.
    pub fn tileable(&self) -> bool {
        !(self.fullscreen || self.floating || self.transient)
    }
}

/// A virtual workspace on one monitor.
///
/// `clients` is ordered; the order is the tiling order. `current` and
/// `prevfocus` index into `clients` and are rebound by window id on every
/// structural change so they never dangle.
#[derive(Debug, Clone)]
pub struct Desktop {
    pub mode: Mode,
    pub master_size: i32,
    pub growth: i32,
    pub show_panel: bool,
    pub clients: Vec<Client>,
    pub current: Option<usize>,
    pub prevfocus: Option<usize>,
}

impl Desktop {
    pub fn new(mode: Mode, master_size: i32, show_panel: bool) -> Self {
        Desktop {
            mode,
            master_size,
            growth: 0,
            show_panel,
            clients: Vec::new(),
            current: None,
            prevfocus: None,
        }
    }

    pub fn window_of(&self, index: Option<usize>) -> Option<u64> {
        index.and_then(|i| self.clients.get(i)).map(|c| c.window)
    }

    pub fn index_of(&self, window: u64) -> Option<usize> {
        self.clients.iter().position(|c| c.window == window)
    }

    pub fn has_urgent(&self) -> bool {
        self.clients.iter().any(|c| c.urgent)
    }

    /// List-order predecessor with wrap-around, the fallback target when
    /// cycling focus backwards. None when fewer than two clients exist.
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        if self.clients.len() < 2 {
            return None;
        }
        Some(if index == 0 {
            self.clients.len() - 1
        } else {
            index - 1
        })
    }

    fn rebind(&mut self, current: Option<u64>, prevfocus: Option<u64>) {
        self.current = current.and_then(|w| self.index_of(w));
        self.prevfocus = prevfocus.and_then(|w| self.index_of(w));
    }

    /// Insert a client at the head, or at the tail when `aside` is set.
    /// Returns the index of the inserted client.
    pub fn attach(&mut self, client: Client, aside: bool) -> usize {
        let cur = self.window_of(self.current);
        let prev = self.window_of(self.prevfocus);
        let at = if aside { self.clients.len() } else { 0 };
        self.clients.insert(at, client);
        self.rebind(cur, prev);
        at
    }

    /// Unlink and return the client at `index`. Focus handles naming other
    /// clients survive; a handle naming the removed client becomes None.
    pub fn detach(&mut self, index: usize) -> Client {
        let cur = self.window_of(self.current);
        let prev = self.window_of(self.prevfocus);
        let client = self.clients.remove(index);
        self.rebind(cur, prev);
        client
    }

    /// Swap the current client with its successor, wrapping the tail back
    /// to the head.
    pub fn move_down(&mut self) {
        let Some(i) = self.current else { return };
        if self.clients.len() < 2 {
            return;
        }
        let prev = self.window_of(self.prevfocus);
        if i + 1 < self.clients.len() {
            self.clients.swap(i, i + 1);
            self.current = Some(i + 1);
        } else {
            self.clients.rotate_right(1);
            self.current = Some(0);
        }
        self.prevfocus = prev.and_then(|w| self.index_of(w));
    }

    /// Inverse of `move_down`: swap the current client with its
    /// predecessor, the head wrapping to the tail.
    pub fn move_up(&mut self) {
        let Some(i) = self.current else { return };
        if self.clients.len() < 2 {
            return;
        }
        let prev = self.window_of(self.prevfocus);
        if i > 0 {
            self.clients.swap(i - 1, i);
            self.current = Some(i - 1);
        } else {
            self.clients.rotate_left(1);
            self.current = Some(self.clients.len() - 1);
        }
        self.prevfocus = prev.and_then(|w| self.index_of(w));
    }

    /// Make the current client the head; if it already is, swap it with
    /// the next one. The new head becomes the current client.
    pub fn swap_master(&mut self) {
        let Some(i) = self.current else { return };
        if self.clients.len() < 2 {
            return;
        }
        let prev = self.window_of(self.prevfocus);
        if i == 0 {
            self.clients.swap(0, 1);
        } else {
            let client = self.clients.remove(i);
            self.clients.insert(0, client);
        }
        self.current = Some(0);
        self.prevfocus = prev.and_then(|w| self.index_of(w));
    }
}

/// One physical output. `h` is already reduced by the panel reservation.
/// Monitors are discovered once at startup and never added or removed.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub desktops: Vec<Desktop>,
    pub current_desktop: usize,
    pub previous_desktop: usize,
}

impl Monitor {
    pub fn current(&self) -> &Desktop {
        &self.desktops[self.current_desktop]
    }

    pub fn current_mut(&mut self) -> &mut Desktop {
        &mut self.desktops[self.current_desktop]
    }

    /// Strict containment, matching the pointer-to-monitor lookup.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x < x && x < self.x + self.w && self.y < y && y < self.y + self.h
    }
}

#[derive(Debug)]
pub struct Runtime {
    pub monitors: Vec<Monitor>,
    pub current_monitor: usize,
    pub previous_monitor: usize,
}

impl Runtime {
    pub fn monitor(&self) -> &Monitor {
        &self.monitors[self.current_monitor]
    }

    pub fn monitor_mut(&mut self) -> &mut Monitor {
        &mut self.monitors[self.current_monitor]
    }

    pub fn desktop(&self) -> &Desktop {
        self.monitor().current()
    }

    pub fn desktop_mut(&mut self) -> &mut Desktop {
        self.monitor_mut().current_mut()
    }

    /// Monitor whose rectangle contains the point, falling back to the
    /// current monitor.
    pub fn monitor_at(&self, x: i32, y: i32) -> usize {
        self.monitors
            .iter()
            .position(|m| m.contains(x, y))
            .unwrap_or(self.current_monitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desktop_with(windows: &[u64]) -> Desktop {
        let mut d = Desktop::new(Mode::Tile, 400, true);
        for &w in windows {
            d.clients.push(Client::new(w));
        }
        d
    }

    fn order(d: &Desktop) -> Vec<u64> {
        d.clients.iter().map(|c| c.window).collect()
    }

    #[test]
    fn attach_head_and_aside() {
        let mut d = desktop_with(&[1, 2]);
        d.current = Some(1);
        let at = d.attach(Client::new(3), false);
        assert_eq!(at, 0);
        assert_eq!(order(&d), vec![3, 1, 2]);
        // the old current client keeps its handle through the shift
        assert_eq!(d.window_of(d.current), Some(2));

        let at = d.attach(Client::new(4), true);
        assert_eq!(at, 3);
        assert_eq!(order(&d), vec![3, 1, 2, 4]);
    }

    #[test]
    fn detach_rebinds_focus_handles() {
        let mut d = desktop_with(&[1, 2, 3]);
        d.current = Some(2);
        d.prevfocus = Some(0);
        let gone = d.detach(0);
        assert_eq!(gone.window, 1);
        assert_eq!(d.window_of(d.current), Some(3));
        assert_eq!(d.prevfocus, None);
    }

    #[test]
    fn move_down_swaps_and_wraps() {
        let mut d = desktop_with(&[1, 2, 3]);
        d.current = Some(0);
        d.move_down();
        assert_eq!(order(&d), vec![2, 1, 3]);
        assert_eq!(d.window_of(d.current), Some(1));

        // tail wraps back to head
        let mut d = desktop_with(&[1, 2, 3]);
        d.current = Some(2);
        d.move_down();
        assert_eq!(order(&d), vec![3, 1, 2]);
        assert_eq!(d.window_of(d.current), Some(3));
    }

    #[test]
    fn move_up_inverts_move_down() {
        for start in 0..3 {
            let mut d = desktop_with(&[1, 2, 3]);
            d.current = Some(start);
            d.prevfocus = Some((start + 1) % 3);
            let before = order(&d);
            let focus = d.window_of(d.current);
            let prev = d.window_of(d.prevfocus);
            d.move_down();
            d.move_up();
            assert_eq!(order(&d), before);
            assert_eq!(d.window_of(d.current), focus);
            assert_eq!(d.window_of(d.prevfocus), prev);
        }
    }

    #[test]
    fn swap_master_from_stack_and_from_head() {
        let mut d = desktop_with(&[1, 2, 3, 4]);
        d.current = Some(2);
        d.swap_master();
        assert_eq!(order(&d), vec![3, 1, 2, 4]);
        assert_eq!(d.current, Some(0));

        // current already head: swap with the next window instead
        let mut d = desktop_with(&[1, 2, 3]);
        d.current = Some(0);
        d.swap_master();
        assert_eq!(order(&d), vec![2, 1, 3]);
        assert_eq!(d.current, Some(0));
    }

    #[test]
    fn prev_index_wraps() {
        let d = desktop_with(&[1, 2, 3]);
        assert_eq!(d.prev_index(0), Some(2));
        assert_eq!(d.prev_index(2), Some(1));
        let lone = desktop_with(&[1]);
        assert_eq!(lone.prev_index(0), None);
    }

    #[test]
    fn monitor_containment_is_strict() {
        let m = Monitor {
            x: 1280,
            y: 0,
            w: 1280,
            h: 800,
            desktops: Vec::new(),
            current_desktop: 0,
            previous_desktop: 0,
        };
        assert!(m.contains(1300, 400));
        assert!(!m.contains(1280, 400));
        assert!(!m.contains(2560, 400));
    }

    #[test]
    fn monitor_at_falls_back_to_current() {
        let mons = vec![
            Monitor {
                x: 0,
                y: 0,
                w: 1280,
                h: 800,
                desktops: Vec::new(),
                current_desktop: 0,
                previous_desktop: 0,
            },
            Monitor {
                x: 1280,
                y: 0,
                w: 1280,
                h: 800,
                desktops: Vec::new(),
                current_desktop: 0,
                previous_desktop: 0,
            },
        ];
        let rt = Runtime {
            monitors: mons,
            current_monitor: 0,
            previous_monitor: 0,
        };
        assert_eq!(rt.monitor_at(1300, 400), 1);
        assert_eq!(rt.monitor_at(5000, 5000), 0);
    }
}
