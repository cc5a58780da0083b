// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge chasing: a four-state automaton that decides whether a mask pixel
// starts a long, nearly straight foreground line running in a given direction.
//
// The chaser tolerates one-pixel lateral drift (camera skew) and short breaks
// in the line, bridged by extrapolating the line fitted so far.

use folio_core::config::FrameConfig;
use folio_core::error::Result;
use folio_core::{ChaseMode, ChaseOutcome, Direction};

use crate::image::GrayView;

/// A pixel position as `(row, col)`, signed so probes may fall outside the mask.
pub type Point = (isize, isize);

// -- Direction strategies -----------------------------------------------------

/// Per-direction movement: the unit step along the travel direction and the
/// unit vector across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stride {
    along: Point,
    lateral: Point,
}

impl Stride {
    const fn of(direction: Direction) -> Self {
        match direction {
            Direction::NorthSouth => Self {
                along: (1, 0),
                lateral: (0, 1),
            },
            Direction::SouthNorth => Self {
                along: (-1, 0),
                lateral: (0, 1),
            },
            Direction::WestEast => Self {
                along: (0, 1),
                lateral: (1, 0),
            },
            Direction::EastWest => Self {
                along: (0, -1),
                lateral: (1, 0),
            },
        }
    }

    /// One pixel further along the travel direction.
    fn step(&self, (row, col): Point) -> Point {
        (row + self.along.0, col + self.along.1)
    }

    /// One pixel to the side of `p`; `side` is -1 or +1.
    fn aside(&self, (row, col): Point, side: isize) -> Point {
        (row + side * self.lateral.0, col + side * self.lateral.1)
    }

    /// Split the displacement from `start` to `p` into the distance travelled
    /// along the direction and the lateral offset.
    fn decompose(&self, start: Point, p: Point) -> (isize, isize) {
        let (dr, dc) = (p.0 - start.0, p.1 - start.1);
        (
            dr * self.along.0 + dc * self.along.1,
            dr * self.lateral.0 + dc * self.lateral.1,
        )
    }

    /// The pixel `distance` steps from `start` on a line whose lateral offset
    /// grows by `slope` per step.
    fn line_fit(&self, start: Point, distance: isize, slope: f64) -> Point {
        let offset = (slope * distance as f64).round() as isize;
        (
            start.0 + distance * self.along.0 + offset * self.lateral.0,
            start.1 + distance * self.along.1 + offset * self.lateral.1,
        )
    }
}

// -- Automaton ----------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChaseState {
    KeepChasing,
    /// Probing the `-1` lateral neighbour of the gap pixel.
    LookAside0,
    /// Probing the `+1` lateral neighbour of the gap pixel.
    LookAside1,
    LookAhead,
}

/// Follows foreground lines in a binary edge mask.
///
/// A chase counts the foreground pixels it visits; reaching
/// [`FrameConfig::chase_depth`] of them means the start pixel sits on a
/// page-like edge. The cost of one chase is bounded by
/// `chase_depth + look_ahead_budget` probes per visited pixel at worst.
#[derive(Debug, Clone, Copy)]
pub struct CornerChaser<'m, 'c> {
    mask: GrayView<'m>,
    config: &'c FrameConfig,
}

impl<'m, 'c> CornerChaser<'m, 'c> {
    pub fn new(mask: GrayView<'m>, config: &'c FrameConfig) -> Self {
        Self { mask, config }
    }

    pub fn mask(&self) -> &GrayView<'m> {
        &self.mask
    }

    /// Chase from `(row, col)` and collapse the outcome into a verdict using
    /// the configured border policy.
    pub fn is_edge(&self, row: usize, col: usize, direction: Direction) -> bool {
        self.config
            .border_policy
            .verdict(self.chase(row, col, direction))
    }

    /// Chase using a textual direction code (`N_S`, `S_N`, `W_E`, `E_W`).
    pub fn chase_code(&self, row: usize, col: usize, code: &str) -> Result<ChaseOutcome> {
        let direction: Direction = code.parse()?;
        Ok(self.chase(row, col, direction))
    }

    /// Run the automaton from `(row, col)` towards `direction`.
    ///
    /// * `KeepChasing` steps one pixel. Foreground extends the run. On
    ///   background the chaser moves onto the gap pixel and, if at least
    ///   `allow_shift` steps have passed since the last lateral shift, looks
    ///   aside; otherwise it looks ahead.
    /// * `LookAside0` / `LookAside1` probe the two lateral neighbours of the
    ///   gap pixel and shift onto the first foreground one.
    /// * `LookAhead` extrapolates the line through the start pixel and the
    ///   gap pixel for up to `look_ahead_budget` pixels and resumes at the
    ///   first foreground pixel on it.
    ///
    /// Background start pixels and unbridgeable gaps are
    /// [`ChaseOutcome::Rejected`]; a step or look-ahead probe that leaves the
    /// mask is [`ChaseOutcome::ReachedBorder`].
    pub fn chase(&self, row: usize, col: usize, direction: Direction) -> ChaseOutcome {
        let start: Point = (row as isize, col as isize);
        if !self.mask.is_foreground(start.0, start.1) {
            return ChaseOutcome::Rejected;
        }

        let stride = Stride::of(direction);
        let depth = self.config.chase_depth;
        let allow_shift = self.config.allow_shift;
        let budget = self.config.look_ahead_budget() as isize;
        let exact = self.config.chase_mode == ChaseMode::Exact;

        let mut pos = start;
        let mut run = 1usize;
        let mut since_shift = 0usize;
        let mut state = ChaseState::KeepChasing;

        loop {
            match state {
                ChaseState::KeepChasing => {
                    let next = stride.step(pos);
                    match self.mask.get(next.0, next.1) {
                        None => return ChaseOutcome::ReachedBorder,
                        Some(0) => {
                            if exact {
                                return ChaseOutcome::Rejected;
                            }
                            pos = next;
                            state = if since_shift >= allow_shift {
                                ChaseState::LookAside0
                            } else {
                                ChaseState::LookAhead
                            };
                        }
                        Some(_) => {
                            pos = next;
                            run += 1;
                            since_shift += 1;
                            if run >= depth {
                                return ChaseOutcome::Edge;
                            }
                        }
                    }
                }
                ChaseState::LookAside0 | ChaseState::LookAside1 => {
                    let side = if state == ChaseState::LookAside0 { -1 } else { 1 };
                    let probe = stride.aside(pos, side);
                    if self.mask.is_foreground(probe.0, probe.1) {
                        pos = probe;
                        run += 1;
                        since_shift = 0;
                        if run >= depth {
                            return ChaseOutcome::Edge;
                        }
                        state = ChaseState::KeepChasing;
                    } else if state == ChaseState::LookAside0 {
                        state = ChaseState::LookAside1;
                    } else {
                        state = ChaseState::LookAhead;
                    }
                }
                ChaseState::LookAhead => {
                    let (travelled, offset) = stride.decompose(start, pos);
                    let slope = offset as f64 / travelled.max(1) as f64;

                    let mut resumed = None;
                    for distance in travelled + 1..=travelled + budget {
                        let probe = stride.line_fit(start, distance, slope);
                        match self.mask.get(probe.0, probe.1) {
                            None => return ChaseOutcome::ReachedBorder,
                            Some(0) => continue,
                            Some(_) => {
                                resumed = Some(probe);
                                break;
                            }
                        }
                    }

                    let Some(probe) = resumed else {
                        return ChaseOutcome::Rejected;
                    };
                    pos = probe;
                    run += 1;
                    since_shift += 1;
                    if run >= depth {
                        return ChaseOutcome::Edge;
                    }
                    state = ChaseState::KeepChasing;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::BorderPolicy;
    use image::{GrayImage, Luma};

    const FG: Luma<u8> = Luma([255]);

    /// Depth 100, look-ahead budget 5.
    fn config() -> FrameConfig {
        FrameConfig {
            chase_depth: 100,
            tolerance_factor: 20,
            allow_shift: 4,
            ..Default::default()
        }
    }

    /// A vertical line in a 40x150 mask; `col_at(row)` gives its column or
    /// `None` for a gap.
    fn vertical_line(col_at: impl Fn(u32) -> Option<u32>) -> GrayImage {
        let mut img = GrayImage::new(40, 150);
        for row in 0..150 {
            if let Some(col) = col_at(row) {
                img.put_pixel(col, row, FG);
            }
        }
        img
    }

    #[test]
    fn background_mask_never_chases() {
        let img = GrayImage::new(30, 30);
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        for dir in Direction::ALL {
            for (row, col) in [(0, 0), (15, 15), (29, 29), (0, 29)] {
                assert!(!chaser.is_edge(row, col, dir));
                assert_eq!(chaser.chase(row, col, dir), ChaseOutcome::Rejected);
            }
        }
    }

    #[test]
    fn straight_run_succeeds_in_every_direction() {
        let mut img = GrayImage::new(150, 150);
        for i in 0..150 {
            img.put_pixel(i, 70, FG);
            img.put_pixel(70, i, FG);
        }
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 70, Direction::NorthSouth), ChaseOutcome::Edge);
        assert_eq!(chaser.chase(149, 70, Direction::SouthNorth), ChaseOutcome::Edge);
        assert_eq!(chaser.chase(70, 0, Direction::WestEast), ChaseOutcome::Edge);
        assert_eq!(chaser.chase(70, 149, Direction::EastWest), ChaseOutcome::Edge);
    }

    #[test]
    fn lateral_drift_is_followed() {
        // The line moves one column right every 10 rows.
        let img = vertical_line(|row| Some(5 + row / 10));
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 5, Direction::NorthSouth), ChaseOutcome::Edge);

        // Drifting left works too (probed first).
        let img = vertical_line(|row| Some(30 - row / 10));
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 30, Direction::NorthSouth), ChaseOutcome::Edge);
    }

    #[test]
    fn drift_faster_than_allow_shift_is_rejected() {
        // A shift every 3 rows arrives before 4 clean steps have passed.
        let img = vertical_line(|row| Some(5 + row / 3).filter(|&c| c < 40));
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 5, Direction::NorthSouth), ChaseOutcome::Rejected);
    }

    #[test]
    fn gaps_within_the_look_ahead_budget_are_bridged() {
        let gap = |len: u32| move |row: u32| (!(40..40 + len).contains(&row)).then_some(10);
        let cfg = config();
        assert_eq!(cfg.look_ahead_budget(), 5);

        let img = vertical_line(gap(5));
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 10, Direction::NorthSouth), ChaseOutcome::Edge);

        let img = vertical_line(gap(6));
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 10, Direction::NorthSouth), ChaseOutcome::Rejected);
    }

    #[test]
    fn look_ahead_follows_the_fitted_slope() {
        // One column right every 5 rows, with rows 50..54 missing. Right
        // after the gap the line has drifted a column, so only a sloped
        // projection lands on it.
        let img = vertical_line(|row| (!(50..54).contains(&row)).then_some(5 + row / 5));
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 5, Direction::NorthSouth), ChaseOutcome::Edge);
    }

    #[test]
    fn leaving_the_mask_is_a_distinct_outcome() {
        let img = vertical_line(|row| (row >= 100).then_some(8));
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(
            chaser.chase(100, 8, Direction::NorthSouth),
            ChaseOutcome::ReachedBorder
        );
        assert!(!chaser.is_edge(100, 8, Direction::NorthSouth));

        let accepting = FrameConfig {
            border_policy: BorderPolicy::Accept,
            ..config()
        };
        let chaser = CornerChaser::new(GrayView::new(&img), &accepting);
        assert!(chaser.is_edge(100, 8, Direction::NorthSouth));
    }

    #[test]
    fn exact_mode_rejects_any_break() {
        let img = vertical_line(|row| (row != 40).then_some(10));
        let cfg = FrameConfig {
            chase_mode: ChaseMode::Exact,
            ..config()
        };
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase(0, 10, Direction::NorthSouth), ChaseOutcome::Rejected);
        assert_eq!(chaser.chase(41, 10, Direction::NorthSouth), ChaseOutcome::Edge);
    }

    #[test]
    fn direction_codes_are_parsed() {
        let img = vertical_line(|_| Some(10));
        let cfg = config();
        let chaser = CornerChaser::new(GrayView::new(&img), &cfg);
        assert_eq!(chaser.chase_code(0, 10, "N_S").unwrap(), ChaseOutcome::Edge);
        assert!(chaser.chase_code(0, 10, "NW").is_err());
    }

    #[test]
    fn line_fit_projects_across_the_direction() {
        let s = Stride::of(Direction::NorthSouth);
        assert_eq!(s.line_fit((10, 10), 4, 0.5), (14, 12));
        let s = Stride::of(Direction::EastWest);
        assert_eq!(s.line_fit((10, 10), 4, -0.25), (9, 6));
        assert_eq!(s.decompose((10, 10), (9, 6)), (4, -1));
    }
}
