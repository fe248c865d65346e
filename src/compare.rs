//! Level-by-level comparison of CE sequences.
//!
//! This is the order sort keys are built to reproduce byte for byte.

use std::cmp::Ordering;

use crate::ce_ty::{Ce, MERGE_SEPARATOR_PRIMARY, NO_CE_PRIMARY, NO_CE_WEIGHT16};
use crate::settings::{CaseFirst, CollationSettings, Strength};

/// CEs up to the first [`Ce::NO_CE`], variable CEs reduced to their primary,
/// primary ignorables after them zeroed, and a closing `NO_CE`.
fn prepare(ces: &[Ce], variable_top: u32) -> (Vec<u64>, bool) {
    let mut out = Vec::with_capacity(ces.len() + 1);
    let mut any_variable = false;
    let mut after_variable = false;
    for &ce in ces.iter().take_while(|&&ce| ce != Ce::NO_CE) {
        if is_variable(ce.primary(), variable_top) {
            any_variable = true;
            after_variable = true;
            out.push(ce.0 & 0xffff_ffff_0000_0000);
        } else if ce.primary() == 0 && after_variable {
            out.push(0);
        } else {
            after_variable = false;
            out.push(ce.0);
        }
    }
    out.push(Ce::NO_CE.0);
    (out, any_variable)
}

#[inline]
fn is_variable(p: u32, variable_top: u32) -> bool {
    p < variable_top && p > MERGE_SEPARATOR_PRIMARY
}

#[inline]
fn primary(ce: u64) -> u32 {
    (ce >> 32) as u32
}

#[inline]
fn lower32(ce: u64) -> u32 {
    ce as u32
}

/// Next index at or after `i` whose weight is non-zero.
fn next_nonzero(ces: &[u64], i: &mut usize, weight: impl Fn(u64) -> u32) -> u32 {
    loop {
        let w = weight(ces[*i]);
        *i += 1;
        if w != 0 {
            return w;
        }
    }
}

/// Compare two CE sequences up to the quaternary level.
///
/// Either sequence may end with [`Ce::NO_CE`]; CEs after it are ignored.
pub fn compare_ces(settings: &CollationSettings, left: &[Ce], right: &[Ce]) -> Ordering {
    let options = settings.options();
    // +1 so that primary ignorables fail `p < variable_top` early
    let variable_top = if settings.is_shifted() {
        settings.variable_top() + 1
    } else {
        0
    };
    let (left, left_variable) = prepare(left, variable_top);
    let (right, right_variable) = prepare(right, variable_top);
    let any_variable = left_variable || right_variable;

    // shifted CEs keep their primary for the quaternary level only
    let non_variable_primary = |ce: u64| {
        let p = primary(ce);
        if is_variable(p, variable_top) {
            0
        } else {
            p
        }
    };
    let (mut li, mut ri) = (0, 0);
    loop {
        let lp = next_nonzero(&left, &mut li, non_variable_primary);
        let rp = next_nonzero(&right, &mut ri, non_variable_primary);
        if lp != rp {
            return settings.reorder(lp).cmp(&settings.reorder(rp));
        }
        if lp == NO_CE_PRIMARY {
            break;
        }
    }

    if options.strength >= Strength::Secondary {
        let ordering = if options.backward_secondary {
            compare_secondaries_backward(&left, &right)
        } else {
            let (mut li, mut ri) = (0, 0);
            loop {
                let ls = next_nonzero(&left, &mut li, |ce| lower32(ce) >> 16);
                let rs = next_nonzero(&right, &mut ri, |ce| lower32(ce) >> 16);
                if ls != rs {
                    break ls.cmp(&rs);
                }
                if ls == NO_CE_WEIGHT16 {
                    break Ordering::Equal;
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    if options.case_level {
        let ordering = compare_case_level(&left, &right, options.strength, options.case_first);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    if options.strength <= Strength::Secondary {
        return Ordering::Equal;
    }

    let tertiary_mask = settings.tertiary_mask();
    let upper_first_tertiary = !options.case_level && options.case_first == CaseFirst::UpperFirst;
    let (mut li, mut ri) = (0, 0);
    let mut any_quaternaries = 0;
    loop {
        let (ll, mut lt) = next_tertiary(&left, &mut li, tertiary_mask);
        let (rl, mut rt) = next_tertiary(&right, &mut ri, tertiary_mask);
        any_quaternaries |= ll | rl;
        if lt != rt {
            if upper_first_tertiary {
                // NO_CE passes through; tertiary CEs keep their artificial uppercase bits
                lt = upper_first_tertiary_weight(ll, lt);
                rt = upper_first_tertiary_weight(rl, rt);
            }
            return lt.cmp(&rt);
        }
        if lt == NO_CE_WEIGHT16 {
            break;
        }
    }
    if options.strength <= Strength::Tertiary {
        return Ordering::Equal;
    }

    if !any_variable && any_quaternaries & 0xc0 == 0 {
        return Ordering::Equal;
    }
    let (mut li, mut ri) = (0, 0);
    loop {
        let lq = next_nonzero(&left, &mut li, quaternary);
        let rq = next_nonzero(&right, &mut ri, quaternary);
        if lq != rq {
            return settings.reorder(lq).cmp(&settings.reorder(rq));
        }
        if lq == NO_CE_PRIMARY {
            return Ordering::Equal;
        }
    }
}

fn next_tertiary(ces: &[u64], i: &mut usize, mask: u32) -> (u32, u32) {
    loop {
        let lower = lower32(ces[*i]);
        *i += 1;
        let t = lower & mask;
        if t != 0 {
            return (lower, t);
        }
    }
}

fn upper_first_tertiary_weight(lower: u32, t: u32) -> u32 {
    if t <= NO_CE_WEIGHT16 {
        t
    } else if lower > 0xffff {
        t ^ 0xc000
    } else {
        t + 0x4000
    }
}

/// Quaternary weight: the primary of variable, ignorable and NO_CE entries,
/// otherwise the quaternary bits above everything a primary can be.
fn quaternary(ce: u64) -> u32 {
    let q = lower32(ce) & 0xffff;
    if q <= NO_CE_WEIGHT16 {
        primary(ce)
    } else {
        q | 0xffff_ff3f
    }
}

/// Secondaries compared from the end, segment by segment between merge separators.
fn compare_secondaries_backward(left: &[u64], right: &[u64]) -> Ordering {
    let (mut left_start, mut right_start) = (0, 0);
    loop {
        let left_limit = segment_limit(left, left_start);
        let right_limit = segment_limit(right, right_start);
        let (mut li, mut ri) = (left_limit, right_limit);
        loop {
            let ls = previous_secondary(left, left_start, &mut li);
            let rs = previous_secondary(right, right_start, &mut ri);
            if ls != rs {
                return ls.cmp(&rs);
            }
            if ls == 0 {
                break;
            }
        }
        // equal primaries put the separators at matching places
        if primary(left[left_limit]) == NO_CE_PRIMARY {
            return Ordering::Equal;
        }
        left_start = left_limit + 1;
        right_start = right_limit + 1;
    }
}

fn segment_limit(ces: &[u64], start: usize) -> usize {
    let mut limit = start;
    loop {
        let p = primary(ces[limit]);
        if p > MERGE_SEPARATOR_PRIMARY || p == 0 {
            limit += 1;
        } else {
            return limit;
        }
    }
}

fn previous_secondary(ces: &[u64], start: usize, i: &mut usize) -> u32 {
    let mut s = 0;
    while s == 0 && *i > start {
        *i -= 1;
        s = lower32(ces[*i]) >> 16;
    }
    s
}

fn compare_case_level(left: &[u64], right: &[u64], strength: Strength, case_first: CaseFirst) -> Ordering {
    // with primary strength case weights of primary ignorables do not count,
    // otherwise those of secondary ignorables
    let skip = |ce: u64| {
        if strength == Strength::Primary {
            primary(ce) == 0 || lower32(ce) == 0
        } else {
            lower32(ce) <= 0xffff
        }
    };
    let next = |ces: &[u64], i: &mut usize| loop {
        let ce = ces[*i];
        *i += 1;
        if !skip(ce) {
            return lower32(ce);
        }
    };
    let (mut li, mut ri) = (0, 0);
    loop {
        let left_lower = next(left, &mut li);
        let right_lower = next(right, &mut ri);
        let (lc, rc) = (left_lower & 0xc000, right_lower & 0xc000);
        if lc != rc {
            return if case_first == CaseFirst::UpperFirst {
                rc.cmp(&lc)
            } else {
                lc.cmp(&rc)
            };
        }
        if left_lower >> 16 == NO_CE_WEIGHT16 {
            return Ordering::Equal;
        }
    }
}
