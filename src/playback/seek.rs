//! Keyboard-driven seeking over the global merged interval view.
//!
//! Seeking is a priority-ordered decision tree over the two-valued
//! [`IndexLookup`] contract: edge positions are first normalized with the
//! epsilon tolerance, then the snap/plain arms pick a target, and finally
//! the clock bounds are expanded (plain) or respected (snap) before the
//! commit. Snap never creates new timeline range; only plain stepping can
//! widen the bounds.

use crate::core::index::{IndexLookup, IntervalIndex};
use crate::core::time::{edges_touch, from_seconds, Time};
use crate::playback::clock::Clock;

/// Seek direction, decoupled from the clock's playback direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Back,
    Forward,
}

/// Fixed step applied by plain (non-snap) seeks, before rate scaling.
pub const DEFAULT_STEP_SECONDS: f64 = 10.0;

/// Compute and commit the next clock time.
///
/// Returns the committed target. The caller triggers the manual tick so
/// dependent components react immediately; that tick must not re-enter
/// this function.
pub fn seek(
    clock: &mut Clock,
    index: &IntervalIndex,
    direction: SeekDirection,
    snap: bool,
    step_seconds: f64,
) -> Time {
    let current = clock.current_time;
    let step = from_seconds(step_seconds * clock.multiplier());

    let lookup = normalize_edges(index, current, direction);
    let target = match lookup {
        IndexLookup::Found(i) => target_inside(index, i, current, direction, snap, step),
        IndexLookup::NotFound(ins) => target_outside(clock, index, ins, current, direction, snap, step),
    };
    let target = match target {
        Some(target) => target,
        // plain step left its interval: discarded, re-treated as not-found
        None => plain_step(current, direction, step),
    };

    let target = if snap {
        // snap only ever moves to an existing boundary or bound: re-check
        // the landing spot, then stay inside the current bounds
        clamp_to_near_edge(index, target, current, direction)
            .clamp(clock.start_bound, clock.stop_bound)
    } else {
        clock.expand_to(target);
        target
    };

    clock.set_current_time(target);
    target
}

/// Rules 2 and 3: treat epsilon-close edge positions predictably.
///
/// Sitting on an interval's start while seeking back (or its stop while
/// seeking forward) counts as being just outside it; conversely a gap
/// position abutting the neighbor in the seek direction counts as inside
/// that neighbor.
fn normalize_edges(index: &IntervalIndex, current: Time, direction: SeekDirection) -> IndexLookup {
    let mut lookup = index.find(current);

    if let IndexLookup::Found(i) = lookup {
        let interval = index.get(i);
        match direction {
            SeekDirection::Back if edges_touch(current, interval.start) => {
                lookup = IndexLookup::NotFound(i);
            }
            SeekDirection::Forward if edges_touch(current, interval.stop) => {
                lookup = IndexLookup::NotFound(i + 1);
            }
            _ => {}
        }
    }

    if let IndexLookup::NotFound(ins) = lookup {
        match direction {
            SeekDirection::Back if ins > 0 && edges_touch(current, index.get(ins - 1).stop) => {
                lookup = IndexLookup::Found(ins - 1);
            }
            SeekDirection::Forward
                if ins < index.len() && edges_touch(current, index.get(ins).start) =>
            {
                lookup = IndexLookup::Found(ins);
            }
            _ => {}
        }
    }

    lookup
}

/// Rule 4: the position is inside interval `i`.
///
/// Returns `None` when a plain step would leave the interval; the caller
/// falls through to the not-found arm with the step re-applied from the
/// current time.
fn target_inside(
    index: &IntervalIndex,
    i: usize,
    current: Time,
    direction: SeekDirection,
    snap: bool,
    step: Time,
) -> Option<Time> {
    let interval = index.get(i);
    if snap {
        return Some(match direction {
            SeekDirection::Back => interval.start,
            SeekDirection::Forward => interval.stop,
        });
    }

    let stepped = plain_step(current, direction, step);
    if interval.contains(stepped) {
        Some(stepped)
    } else {
        None
    }
}

/// Rule 5: the position is in a gap; `ins` is the insertion point.
fn target_outside(
    clock: &Clock,
    index: &IntervalIndex,
    ins: usize,
    current: Time,
    direction: SeekDirection,
    snap: bool,
    step: Time,
) -> Option<Time> {
    if !snap {
        return Some(plain_step(current, direction, step));
    }
    Some(match direction {
        SeekDirection::Back => {
            if ins > 0 {
                index.get(ins - 1).stop
            } else {
                clock.start_bound
            }
        }
        SeekDirection::Forward => {
            if ins < index.len() {
                index.get(ins).start
            } else {
                clock.stop_bound
            }
        }
    })
}

fn plain_step(current: Time, direction: SeekDirection, step: Time) -> Time {
    match direction {
        SeekDirection::Back => current - step,
        SeekDirection::Forward => current + step,
    }
}

/// Rule 6, defensive: a snap target that lands strictly inside some
/// interval (possible in the overlapping merged view) clamps to that
/// interval's near edge, the one faced first coming from `current`.
fn clamp_to_near_edge(
    index: &IntervalIndex,
    target: Time,
    current: Time,
    direction: SeekDirection,
) -> Time {
    if let IndexLookup::Found(i) = index.find(target) {
        let interval = index.get(i);
        let on_edge =
            edges_touch(target, interval.start) || edges_touch(target, interval.stop);
        if !on_edge {
            return match direction {
                SeekDirection::Back if interval.stop < current => interval.stop,
                SeekDirection::Forward if interval.start > current => interval.start,
                _ => target,
            };
        }
    }
    target
}
