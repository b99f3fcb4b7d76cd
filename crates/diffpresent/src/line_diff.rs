//! Line-level edit scripts.
//!
//! Implements Myers' greedy O((N+M)·D) shortest edit script search. Each edit
//! distance `d` has a frontier: the furthest-reaching x on every diagonal the
//! search can touch after `d` edits. When two scripts are equally short,
//! deletions are taken before insertions, so a line that moved down is shown
//! as removed from its old position and inserted at its new one.
//!
//! Recovering the script walks the frontiers backwards. Rather than keeping
//! all of them, the walk splits the distance range in halves and recomputes
//! each half's frontiers from its first one, so only a logarithmic number of
//! frontiers is alive at any time.

/// Largest distance range whose frontiers are all kept while walking back.
const SEGMENT_LEVELS: isize = 64;

/// A single step of an edit script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOp<'a> {
    /// A line present in both inputs.
    Keep(&'a str),
    /// A line only present in the old input.
    Delete(&'a str),
    /// A line only present in the new input.
    Insert(&'a str),
}

impl<'a> EditOp<'a> {
    /// The line text.
    pub fn line(&self) -> &'a str {
        match *self {
            EditOp::Keep(line) | EditOp::Delete(line) | EditOp::Insert(line) => line,
        }
    }

    /// Returns `true` for deletions and insertions.
    pub fn is_change(&self) -> bool {
        !matches!(self, EditOp::Keep(_))
    }

    /// The unified-diff prefix character.
    pub fn prefix(&self) -> char {
        match self {
            EditOp::Keep(_) => ' ',
            EditOp::Delete(_) => '-',
            EditOp::Insert(_) => '+',
        }
    }
}

/// Compute a shortest edit script turning `old` into `new`.
pub fn diff_lines<'a, S: AsRef<str>>(old: &'a [S], new: &'a [S]) -> Vec<EditOp<'a>> {
    diff_lines_segmented(old, new, SEGMENT_LEVELS)
}

/// [`diff_lines`] with an explicit segment length for the backward walk.
/// The script does not depend on `segment`; only memory and time do.
pub(crate) fn diff_lines_segmented<'a, S: AsRef<str>>(
    old: &'a [S],
    new: &'a [S],
    segment: isize,
) -> Vec<EditOp<'a>> {
    let old: Vec<&'a str> = old.iter().map(|line| line.as_ref()).collect();
    let new: Vec<&'a str> = new.iter().map(|line| line.as_ref()).collect();

    if old == new {
        return old.into_iter().map(EditOp::Keep).collect();
    }

    let search = Search {
        old: &old,
        new: &new,
    };
    let origin = search.origin();
    let distance = search.distance(&origin);

    let mut ops = Vec::with_capacity(old.len().max(new.len()));
    let end = (old.len() as isize, new.len() as isize);
    let (mut x, _) = search.walk_back(0, &origin, distance, end, segment.max(1), &mut ops);

    // Whatever remains is the common prefix matched before the first edit.
    while x > 0 {
        x -= 1;
        ops.push(EditOp::Keep(old[x as usize]));
    }

    ops.reverse();
    ops
}

/// The x reached on diagonal `k` in the frontier for distance `d`.
///
/// A frontier for `d` holds the diagonals `-d, -d + 2, ..., d` in order.
fn reach(frontier: &[isize], d: isize, k: isize) -> isize {
    frontier[((k + d) / 2) as usize]
}

/// Whether the path to diagonal `k` at distance `d` comes down from `k + 1`
/// (an insertion) rather than across from `k - 1` (a deletion).
fn comes_down(previous: &[isize], d: isize, k: isize) -> bool {
    k == -d || (k != d && reach(previous, d - 1, k - 1) < reach(previous, d - 1, k + 1))
}

struct Search<'s, 'a> {
    old: &'s [&'a str],
    new: &'s [&'a str],
}

impl<'a> Search<'_, 'a> {
    fn snake(&self, mut x: isize, mut y: isize) -> isize {
        let (n, m) = (self.old.len() as isize, self.new.len() as isize);
        while x < n && y < m && self.old[x as usize] == self.new[y as usize] {
            x += 1;
            y += 1;
        }
        x
    }

    fn origin(&self) -> Vec<isize> {
        vec![self.snake(0, 0)]
    }

    /// The frontier for distance `d` given the one for `d - 1`, and whether
    /// it reaches the end of both inputs.
    fn step(&self, previous: &[isize], d: isize) -> (Vec<isize>, bool) {
        let (n, m) = (self.old.len() as isize, self.new.len() as isize);
        let mut frontier = Vec::with_capacity(d as usize + 1);
        let mut done = false;
        for k in (-d..=d).step_by(2) {
            let start = if comes_down(previous, d, k) {
                reach(previous, d - 1, k + 1)
            } else {
                reach(previous, d - 1, k - 1) + 1
            };
            let x = self.snake(start, start - k);
            done |= x >= n && x - k >= m;
            frontier.push(x);
        }
        (frontier, done)
    }

    /// Length of the shortest edit script.
    fn distance(&self, origin: &[isize]) -> isize {
        let max = (self.old.len() + self.new.len()) as isize;
        let mut frontier = origin.to_vec();
        for d in 1..=max {
            let (next, done) = self.step(&frontier, d);
            if done {
                return d;
            }
            frontier = next;
        }
        max
    }

    /// Walk back from `end`, a point on the frontier for `hi`, to the
    /// frontier for `lo`, pushing ops in reverse order. Returns the point
    /// reached.
    fn walk_back(
        &self,
        lo: isize,
        lo_frontier: &[isize],
        hi: isize,
        end: (isize, isize),
        segment: isize,
        ops: &mut Vec<EditOp<'a>>,
    ) -> (isize, isize) {
        if hi - lo <= segment {
            return self.walk_segment(lo, lo_frontier, hi, end, ops);
        }
        let mid = lo + (hi - lo) / 2;
        let middle = {
            let mut frontier = lo_frontier.to_vec();
            for d in lo + 1..=mid {
                frontier = self.step(&frontier, d).0;
            }
            self.walk_back(mid, &frontier, hi, end, segment, ops)
        };
        self.walk_back(lo, lo_frontier, mid, middle, segment, ops)
    }

    fn walk_segment(
        &self,
        lo: isize,
        lo_frontier: &[isize],
        hi: isize,
        (mut x, mut y): (isize, isize),
        ops: &mut Vec<EditOp<'a>>,
    ) -> (isize, isize) {
        let mut frontiers = vec![lo_frontier.to_vec()];
        for d in lo + 1..hi {
            let next = self.step(&frontiers[frontiers.len() - 1], d).0;
            frontiers.push(next);
        }

        for d in (lo + 1..=hi).rev() {
            let previous = &frontiers[(d - 1 - lo) as usize];
            let k = x - y;
            let prev_k = if comes_down(previous, d, k) { k + 1 } else { k - 1 };
            let prev_x = reach(previous, d - 1, prev_k);
            let prev_y = prev_x - prev_k;

            while x > prev_x && y > prev_y {
                x -= 1;
                y -= 1;
                ops.push(EditOp::Keep(self.old[x as usize]));
            }
            if x == prev_x {
                y -= 1;
                ops.push(EditOp::Insert(self.new[y as usize]));
            } else {
                x -= 1;
                ops.push(EditOp::Delete(self.old[x as usize]));
            }
        }
        (x, y)
    }
}
