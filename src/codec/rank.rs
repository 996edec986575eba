//! Two-symbol multinomial rank/unrank.
//!
//! A layer is a binary string: symbol 0 is "empty", symbol 1 is "occupied".
//! For a string of length `n` with `k` ones the rank is in `[0, C(n, k))` and
//! both directions run in O(n) once the Pascal table is built.
//!
//! These are not general multiset-permutation routines; the two-symbol case
//! is hardwired (the multinomial coefficient degenerates to one binomial).

use crate::codec::pascal::Pascal;

/// Rank of the binary string `symbols` among all strings with the same
/// number of ones, in lexicographic order (0 before 1).
pub fn rank(pas: &Pascal, symbols: &[u8]) -> u64 {
    let ones = symbols.iter().filter(|&&s| s == 1).count();
    let mut left = [symbols.len() - ones, ones];
    let mut r = 0u64;
    for &sym in symbols {
        debug_assert!(sym <= 1);
        if sym == 1 && left[0] > 0 {
            // Count the strings that place a 0 here instead; they all sort
            // before this one.
            r = r.wrapping_add(pas.choose(left[0] - 1 + left[1], left[0] - 1));
        }
        left[sym as usize] -= 1;
    }
    r
}

/// Inverse of [`rank`]: write the `zeros + ones` long string with the given
/// rank into `out`.
pub fn unrank(pas: &Pascal, mut rank: u64, zeros: usize, ones: usize, out: &mut Vec<u8>) {
    let mut left = [zeros, ones];
    out.clear();
    for _ in 0..zeros + ones {
        let mut run = 0u64;
        for sym in 0..2usize {
            if left[sym] == 0 {
                continue;
            }
            left[sym] -= 1;
            let strings = pas.choose(left[0] + left[1], left[0]);
            let next = run.wrapping_add(strings);
            if next > rank {
                out.push(sym as u8);
                rank -= run;
                break;
            }
            left[sym] += 1;
            run = next;
        }
    }
    debug_assert_eq!(out.len(), zeros + ones);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_strings(len: usize, ones: usize) -> Vec<Vec<u8>> {
        // Lexicographic enumeration by counting.
        let mut out = Vec::new();
        for mask in 0u32..1 << len {
            if mask.count_ones() as usize != ones {
                continue;
            }
            // Bit i of the counter is position i of the string; iterate so the
            // result comes out in string-lexicographic order.
            let s: Vec<u8> = (0..len).map(|i| ((mask >> i) & 1) as u8).collect();
            out.push(s);
        }
        out.sort();
        out
    }

    #[test]
    fn ranks_are_dense_and_ordered() {
        let pas = Pascal::new(16);
        for len in 1..=8usize {
            for ones in 0..=len {
                let strings = all_strings(len, ones);
                assert_eq!(strings.len() as u64, pas.choose(len, ones));
                for (expect, s) in strings.iter().enumerate() {
                    assert_eq!(rank(&pas, s), expect as u64, "string {s:?}");
                }
            }
        }
    }

    #[test]
    fn unrank_inverts_rank() {
        let pas = Pascal::new(16);
        let mut buf = Vec::new();
        for len in 1..=8usize {
            for ones in 0..=len {
                for r in 0..pas.choose(len, ones) {
                    unrank(&pas, r, len - ones, ones, &mut buf);
                    assert_eq!(rank(&pas, &buf), r);
                }
            }
        }
    }
}
