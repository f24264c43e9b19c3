//! Single-hand playability check for chord shapes.
//!
//! Up to four fretted notes always fit under the fingers. Five or six fretted
//! notes need a bar: one fret value shared by at least two (five fretted) or
//! three (six fretted) of the positions. The scan walks fret values upward and
//! gives up at the first value that occurs exactly once, so it can reject
//! shapes a player would still manage.

use crate::fretboard::{FretPosition, FRET_COUNT};

/// Fretted notes that never need a bar
pub const MAX_UNBARRED_FRETTED: usize = 4;

/// Notes a single bar must cover for a shape with `fretted` fretted notes
pub fn required_bar_size(fretted: usize) -> usize {
    if fretted <= 5 {
        2
    } else {
        3
    }
}

pub fn is_playable(solution: &[FretPosition]) -> bool {
    let fretted: Vec<u8> = solution
        .iter()
        .filter(|p| !p.is_open())
        .map(|p| p.fret)
        .collect();
    if fretted.len() <= MAX_UNBARRED_FRETTED {
        return true;
    }

    let needed = required_bar_size(fretted.len());
    for fret in 1..=FRET_COUNT {
        let count = fretted.iter().filter(|&&f| f == fret).count();
        if count >= needed {
            return true;
        }
        if count == 1 {
            return false;
        }
    }
    false
}

/// Index of the solution with the lowest mean string index, earliest on ties
fn lowest_strings<'a, I>(solutions: I) -> Option<usize>
where
    I: Iterator<Item = (usize, &'a Vec<FretPosition>)>,
{
    // Every solution covers the same variables, so the sum orders like the mean
    solutions
        .min_by_key(|(_, solution)| solution.iter().map(|p| p.string).sum::<usize>())
        .map(|(idx, _)| idx)
}

/// Pick the preferred solution: playable ones first, falling back to all of them
pub fn select(solutions: &[Vec<FretPosition>]) -> Option<&Vec<FretPosition>> {
    let playable = solutions.iter().enumerate().filter(|(_, s)| is_playable(s));
    lowest_strings(playable)
        .or_else(|| lowest_strings(solutions.iter().enumerate()))
        .map(|idx| &solutions[idx])
}
