// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner resolution: merging the two directional candidates found for each
// page corner, then reconciling the four corners into one rectangle.

use folio_core::{Corner, CornerCandidate, Rect, TieBreak};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which input value an axis takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    First,
    Second,
    TieBreak,
}

/// One row of the per-axis decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableEntry {
    /// No information on either axis: the target keeps its value.
    Untouched,
    Resolve { pick: Pick, confident: bool },
}

const fn resolve(pick: Pick, confident: bool) -> TableEntry {
    TableEntry::Resolve { pick, confident }
}

/// Decision table indexed by `(a1 << 3) | (a2 << 2) | (o1 << 1) | o2`, where
/// `a1`/`a2` are the candidates' confidence on the axis being resolved and
/// `o1`/`o2` their confidence on the other axis.
///
/// * both confident on this axis: tie-break, confident;
/// * exactly one confident on this axis: that value, confident;
/// * neither, both confident on the other axis: tie-break, not confident;
/// * neither, one confident on the other axis: that candidate's value, not
///   confident;
/// * no confidence anywhere: untouched.
const AXIS_TABLE: [TableEntry; 16] = [
    // a1=0 a2=0
    TableEntry::Untouched,
    resolve(Pick::Second, false),
    resolve(Pick::First, false),
    resolve(Pick::TieBreak, false),
    // a1=0 a2=1
    resolve(Pick::Second, true),
    resolve(Pick::Second, true),
    resolve(Pick::Second, true),
    resolve(Pick::Second, true),
    // a1=1 a2=0
    resolve(Pick::First, true),
    resolve(Pick::First, true),
    resolve(Pick::First, true),
    resolve(Pick::First, true),
    // a1=1 a2=1
    resolve(Pick::TieBreak, true),
    resolve(Pick::TieBreak, true),
    resolve(Pick::TieBreak, true),
    resolve(Pick::TieBreak, true),
];

fn table_index(a1: bool, a2: bool, o1: bool, o2: bool) -> usize {
    (usize::from(a1) << 3) | (usize::from(a2) << 2) | (usize::from(o1) << 1) | usize::from(o2)
}

fn apply(entry: TableEntry, v1: u32, v2: u32, tie: TieBreak) -> Option<(u32, bool)> {
    match entry {
        TableEntry::Untouched => None,
        TableEntry::Resolve { pick, confident } => {
            let value = match pick {
                Pick::First => v1,
                Pick::Second => v2,
                Pick::TieBreak => tie.apply(v1, v2),
            };
            Some((value, confident))
        }
    }
}

/// Resolve `target`'s column from two candidates.
pub fn pick_col(target: &mut CornerCandidate, c1: &CornerCandidate, c2: &CornerCandidate, tie: TieBreak) {
    let idx = table_index(c1.col_confident, c2.col_confident, c1.row_confident, c2.row_confident);
    if let Some((col, confident)) = apply(AXIS_TABLE[idx], c1.col, c2.col, tie) {
        target.col = col;
        target.col_confident = confident;
    }
}

/// Resolve `target`'s row from two candidates.
pub fn pick_row(target: &mut CornerCandidate, c1: &CornerCandidate, c2: &CornerCandidate, tie: TieBreak) {
    let idx = table_index(c1.row_confident, c2.row_confident, c1.col_confident, c2.col_confident);
    if let Some((row, confident)) = apply(AXIS_TABLE[idx], c1.row, c2.row, tie) {
        target.row = row;
        target.row_confident = confident;
    }
}

/// Merge the row-major and column-major candidates for `corner` into a
/// target that starts at the image extreme.
pub fn resolve_corner(
    corner: Corner,
    width: u32,
    height: u32,
    row_major: &CornerCandidate,
    col_major: &CornerCandidate,
) -> CornerCandidate {
    let (col, row) = corner.image_extreme(width, height);
    let mut target = CornerCandidate::unresolved(col, row);
    pick_col(&mut target, row_major, col_major, corner.col_tie_break());
    pick_row(&mut target, row_major, col_major, corner.row_tie_break());
    target
}

// -- Rectangle reconciliation --------------------------------------------------

/// The four resolved corners of a page frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCorners {
    pub top_left: CornerCandidate,
    pub top_right: CornerCandidate,
    pub bottom_left: CornerCandidate,
    pub bottom_right: CornerCandidate,
}

impl FrameCorners {
    /// Corners of an existing rectangle, all fully confident.
    pub fn from_rect(rect: Rect) -> Self {
        let (left, top) = (rect.x, rect.y);
        let (right, bottom) = (rect.right(), rect.bottom());
        let at = |col, row| CornerCandidate::new(col, row, true, true);
        Self {
            top_left: at(left, top),
            top_right: at(right, top),
            bottom_left: at(left, bottom),
            bottom_right: at(right, bottom),
        }
    }

    pub fn get(&self, corner: Corner) -> &CornerCandidate {
        match corner {
            Corner::TopLeft => &self.top_left,
            Corner::TopRight => &self.top_right,
            Corner::BottomLeft => &self.bottom_left,
            Corner::BottomRight => &self.bottom_right,
        }
    }

    /// Whether any corner was observed at all.
    pub fn any_resolved(&self) -> bool {
        Corner::ALL.iter().any(|&c| self.get(c).is_resolved())
    }

    /// Force the four corners onto one axis-aligned rectangle that contains
    /// them all: the outermost left, right, top and bottom win.
    pub fn reconcile(&self) -> Self {
        let mut tl = self.top_left;
        let mut br = self.bottom_right;
        pick_col(&mut tl, &self.top_left, &self.bottom_left, TieBreak::Min);
        pick_col(&mut br, &self.bottom_right, &self.top_right, TieBreak::Max);
        pick_row(&mut tl, &self.top_left, &self.top_right, TieBreak::Min);
        pick_row(&mut br, &self.bottom_right, &self.bottom_left, TieBreak::Max);

        let mut tr = self.top_right;
        let mut bl = self.bottom_left;
        (tr.col, tr.row) = (br.col, tl.row);
        (bl.col, bl.row) = (tl.col, br.row);
        Self {
            top_left: tl,
            top_right: tr,
            bottom_left: bl,
            bottom_right: br,
        }
    }

    /// The reconciled rectangle `(left, top, right - left, bottom - top)`,
    /// clamped to a `width` x `height` image. A frame with no observed corner,
    /// or a degenerate one, falls back to the full image.
    pub fn to_rect(&self, width: u32, height: u32) -> Rect {
        if !self.any_resolved() {
            warn!("No page corner observed; using the full image");
            return Rect::full(width, height);
        }
        let r = self.reconcile();
        let (left, top) = (r.top_left.col, r.top_left.row);
        let (right, bottom) = (r.bottom_right.col, r.bottom_right.row);
        if right <= left || bottom <= top {
            warn!(left, top, right, bottom, "degenerate page frame; using the full image");
            return Rect::full(width, height);
        }
        Rect::new(left, top, right - left, bottom - top).clamp_to(width, height)
    }
}
