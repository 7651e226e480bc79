//! Pure geometry for the tiling modes.
//!
//! Given a work area and the number of tileable clients, compute one frame
//! per client in list order. Floating, transient and fullscreen windows
//! never reach these functions; the caller pairs the returned frames with
//! the tileable clients of the desktop.

use crate::config;
use crate::structs::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Geometry plus the border width the window should carry with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub rect: Rect,
    pub border: u32,
}

/// Initial/reset master area size: a fraction of the mode's primary axis.
pub fn master_size_for(mode: Mode, w: i32, h: i32) -> i32 {
    let axis = if mode == Mode::BStack { h } else { w };
    (axis as f32 * config::MASTER_SIZE).round() as i32
}

/// Compute frames for `n` tileable clients inside `area`.
///
/// A lone client always fills the whole work area borderless, whatever the
/// mode.
pub fn arrange(mode: Mode, area: Rect, n: usize, master_size: i32, growth: i32) -> Vec<Frame> {
    match n {
        0 => Vec::new(),
        1 => vec![Frame {
            rect: area,
            border: 0,
        }],
        _ => match mode {
            Mode::Monocle => monocle(area, n),
            Mode::Tile => stack(area, n, master_size, growth, false),
            Mode::BStack => stack(area, n, master_size, growth, true),
            Mode::Grid => grid(area, n),
        },
    }
}

/// Every client is stacked over the full work area, borderless.
fn monocle(area: Rect, n: usize) -> Vec<Frame> {
    vec![
        Frame {
            rect: area,
            border: 0,
        };
        n
    ]
}

/// Master-stack tiling. `b` selects the bottom-stack variant, which is the
/// same arrangement transposed: the master area becomes a top band of
/// height `master_size` and the stack grows to the right underneath it.
///
/// The stack splits the secondary axis minus `growth` evenly; the division
/// remainder plus `growth` goes to the first stack window so no gap is left
/// at the far edge.
fn stack(area: Rect, n: usize, master_size: i32, growth: i32, b: bool) -> Vec<Frame> {
    let bw = config::BORDER_WIDTH as i32;
    let ns = (n - 1) as i32;
    let z = ((if b { area.w } else { area.h }) - growth) / ns;
    let d = ((if b { area.w } else { area.h }) - growth) % ns + growth;

    let mut frames = Vec::with_capacity(n);
    frames.push(Frame {
        rect: if b {
            Rect {
                x: area.x,
                y: area.y,
                w: area.w - 2 * bw,
                h: master_size - bw,
            }
        } else {
            Rect {
                x: area.x,
                y: area.y,
                w: master_size - bw,
                h: area.h - 2 * bw,
            }
        },
        border: config::BORDER_WIDTH,
    });

    // the stack column (or row) holds what the master leaves over
    let breadth = (if b { area.h } else { area.w }) - 2 * bw - master_size;
    let mut pos = if b { area.x } else { area.y };
    for i in 0..ns {
        let span = z - 2 * bw + if i == 0 { d } else { 0 };
        frames.push(Frame {
            rect: if b {
                Rect {
                    x: pos,
                    y: area.y + master_size,
                    w: span,
                    h: breadth,
                }
            } else {
                Rect {
                    x: area.x + master_size,
                    y: pos,
                    w: breadth,
                    h: span,
                }
            },
            border: config::BORDER_WIDTH,
        });
        pos += span + bw;
    }
    frames
}

/// Column-major grid. `cols` is the smallest integer whose square holds
/// all clients (five clients make two columns); the remainder of clients
/// over columns lands one per column starting from the left, so the first
/// columns are the taller ones.
fn grid(area: Rect, n: usize) -> Vec<Frame> {
    let bw = config::BORDER_WIDTH as i32;
    let mut cols = 1;
    while cols * cols < n {
        cols += 1;
    }
    if n == 5 {
        cols = 2;
    }
    let base_rows = n / cols;
    let extra = n % cols;

    let cw = (area.w - bw) / cols as i32;
    let mut frames = Vec::with_capacity(n);
    for col in 0..cols {
        let rows = base_rows + usize::from(col < extra);
        let ch = (area.h - bw) / rows as i32;
        for row in 0..rows {
            frames.push(Frame {
                rect: Rect {
                    x: area.x + col as i32 * cw,
                    y: area.y + row as i32 * ch,
                    w: cw - bw,
                    h: ch - bw,
                },
                border: config::BORDER_WIDTH,
            });
        }
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 0,
        w: 1280,
        h: 800,
    };

    fn rects(frames: &[Frame]) -> Vec<Rect> {
        frames.iter().map(|f| f.rect).collect()
    }

    #[test]
    fn master_size_rounds_to_nearest() {
        // 1280 * 0.52 = 665.6
        assert_eq!(master_size_for(Mode::Tile, 1280, 800), 666);
        assert_eq!(master_size_for(Mode::BStack, 1280, 800), 416);
    }

    #[test]
    fn tile_three_clients() {
        let frames = arrange(Mode::Tile, AREA, 3, 666, 0);
        assert_eq!(
            rects(&frames),
            vec![
                Rect {
                    x: 0,
                    y: 0,
                    w: 664,
                    h: 796
                },
                Rect {
                    x: 666,
                    y: 0,
                    w: 610,
                    h: 396
                },
                Rect {
                    x: 666,
                    y: 398,
                    w: 610,
                    h: 396
                },
            ]
        );
        assert!(frames.iter().all(|f| f.border == config::BORDER_WIDTH));
    }

    #[test]
    fn tile_after_master_resize() {
        let frames = arrange(Mode::Tile, AREA, 3, 686, 0);
        assert_eq!(frames[0].rect.w, 684);
        assert_eq!(frames[1].rect.w, 590);
        assert_eq!(frames[2].rect.w, 590);
    }

    #[test]
    fn tile_growth_goes_to_first_stack_window() {
        let grown = arrange(Mode::Tile, AREA, 3, 666, 20);
        let even = arrange(Mode::Tile, AREA, 3, 666, 0);
        assert_eq!(grown[1].rect.h, 406);
        assert_eq!(grown[2].rect.h, 386);
        // the stack column still ends where it did without growth
        assert_eq!(
            grown[2].rect.y + grown[2].rect.h,
            even[2].rect.y + even[2].rect.h
        );
    }

    #[test]
    fn bstack_is_tile_transposed() {
        let frames = arrange(Mode::BStack, AREA, 3, 416, 0);
        assert_eq!(
            frames[0].rect,
            Rect {
                x: 0,
                y: 0,
                w: 1276,
                h: 414
            }
        );
        // stack row below the master band
        assert_eq!(frames[1].rect.y, 416);
        assert_eq!(frames[2].rect.y, 416);
        assert_eq!(frames[1].rect.h, 800 - 4 - 416);
        assert_eq!(frames[1].rect.w + frames[2].rect.w + 3 * 4, 1280 + 4);
    }

    #[test]
    fn lone_client_fills_work_area_borderless() {
        for mode in [Mode::Tile, Mode::Monocle, Mode::BStack, Mode::Grid] {
            let frames = arrange(mode, AREA, 1, 666, 0);
            assert_eq!(frames, vec![Frame { rect: AREA, border: 0 }]);
        }
    }

    #[test]
    fn monocle_stacks_everything_fullsize() {
        let frames = arrange(Mode::Monocle, AREA, 3, 666, 0);
        assert_eq!(frames.len(), 3);
        for f in frames {
            assert_eq!(f.rect, AREA);
            assert_eq!(f.border, 0);
        }
    }

    #[test]
    fn grid_of_four_is_two_by_two() {
        let frames = arrange(Mode::Grid, AREA, 4, 666, 0);
        assert_eq!(frames.len(), 4);
        let xs: Vec<i32> = frames.iter().map(|f| f.rect.x).collect();
        let ys: Vec<i32> = frames.iter().map(|f| f.rect.y).collect();
        assert_eq!(xs, vec![0, 0, 639, 639]);
        assert_eq!(ys, vec![0, 399, 0, 399]);
        for f in &frames {
            assert_eq!(f.rect.w, 637);
            assert_eq!(f.rect.h, 397);
        }
    }

    #[test]
    fn grid_of_five_fills_first_column_with_three() {
        let frames = arrange(Mode::Grid, AREA, 5, 666, 0);
        assert_eq!(frames.len(), 5);
        let first_col: Vec<&Frame> = frames.iter().filter(|f| f.rect.x == 0).collect();
        let second_col: Vec<&Frame> = frames.iter().filter(|f| f.rect.x == 639).collect();
        assert_eq!(first_col.len(), 3);
        assert_eq!(second_col.len(), 2);
    }

    // adjacent borders may share up to one border width of screen
    #[test]
    fn tile_frames_do_not_overlap() {
        let bw = config::BORDER_WIDTH as i32;
        for n in 2..8 {
            let frames = arrange(Mode::Tile, AREA, n, 666, 0);
            assert_eq!(frames.len(), n);
            for (i, a) in frames.iter().enumerate() {
                for b in frames.iter().skip(i + 1) {
                    let (ra, rb) = (a.rect, b.rect);
                    let disjoint = ra.x + ra.w + bw <= rb.x
                        || rb.x + rb.w + bw <= ra.x
                        || ra.y + ra.h + bw <= rb.y
                        || rb.y + rb.h + bw <= ra.y;
                    assert!(disjoint, "{ra:?} overlaps {rb:?} with {n} clients");
                }
            }
        }
    }
}
