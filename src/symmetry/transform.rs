//! Position × color relabeling transforms
//!
//! The group acting on codes is every pairing of a position permutation (4! of
//! them) with a color permutation (6! of them), 17,280 elements in total. Scores
//! are invariant under the group, which is what makes symmetric guesses
//! interchangeable.
//!
//! Permutations are generated in lexicographic order, so index 0 is the
//! identity for both components.

use crate::core::{Code, NCODES, NCOLORS, NPOSITIONS};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of position permutations
pub const NPOSPERMS: usize = 24;

/// Number of color permutations
pub const NCOLORPERMS: usize = 720;

/// Number of transforms in the group
pub const NTRANSFORMS: usize = NPOSPERMS * NCOLORPERMS;

/// A group element: indexes into the position and color permutation tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Transform {
    pub pp: u8,
    pub cp: u16,
}

impl Transform {
    pub const IDENTITY: Self = Self { pp: 0, cp: 0 };

    #[inline]
    #[must_use]
    pub const fn is_identity(self) -> bool {
        self.pp == 0 && self.cp == 0
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transform(pp={}, cp={})", self.pp, self.cp)
    }
}

/// All permutations of `0..N` in lexicographic order
fn permutations<const N: usize>() -> Vec<[u8; N]> {
    fn extend<const N: usize>(prefix: &mut Vec<u8>, out: &mut Vec<[u8; N]>) {
        if prefix.len() == N {
            let mut perm = [0u8; N];
            perm.copy_from_slice(prefix);
            out.push(perm);
            return;
        }
        for item in 0..N as u8 {
            if !prefix.contains(&item) {
                prefix.push(item);
                extend(prefix, out);
                prefix.pop();
            }
        }
    }

    let mut out = Vec::new();
    extend(&mut Vec::with_capacity(N), &mut out);
    out
}

/// Lookup tables for applying transforms to numeric codes
///
/// Built once, immutable afterwards; share it behind an `Arc`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformTable {
    position_perms: Vec<[u8; NPOSITIONS]>,
    color_perms: Vec<[u8; NCOLORS]>,
    /// `position_lookup[code * NPOSPERMS + pp]`
    position_lookup: Vec<u16>,
    /// `color_lookup[code * NCOLORPERMS + cp]`
    color_lookup: Vec<u16>,
    all: Vec<Transform>,
}

impl TransformTable {
    #[must_use]
    pub fn new() -> Self {
        let position_perms = permutations::<NPOSITIONS>();
        let color_perms = permutations::<NCOLORS>();

        let position_lookup = (0..NCODES)
            .into_par_iter()
            .flat_map_iter(|index| {
                let v = Code::from_index(index).colors();
                position_perms
                    .iter()
                    .map(move |p| encode_index(&p.map(|i| v[usize::from(i)])))
            })
            .collect();

        let color_lookup = (0..NCODES)
            .into_par_iter()
            .flat_map_iter(|index| {
                let v = Code::from_index(index).colors();
                color_perms
                    .iter()
                    .map(move |p| encode_index(&v.map(|c| p[usize::from(c)])))
            })
            .collect();

        let all = (0..NPOSPERMS as u8)
            .flat_map(|pp| (0..NCOLORPERMS as u16).map(move |cp| Transform { pp, cp }))
            .collect();

        Self {
            position_perms,
            color_perms,
            position_lookup,
            color_lookup,
            all,
        }
    }

    /// The whole group, sorted, identity first
    #[must_use]
    pub fn all(&self) -> &[Transform] {
        &self.all
    }

    /// Position permutation by index
    #[must_use]
    pub fn position_perm(&self, pp: u8) -> [u8; NPOSITIONS] {
        self.position_perms[usize::from(pp)]
    }

    /// Color permutation by index
    #[must_use]
    pub fn color_perm(&self, cp: u16) -> [u8; NCOLORS] {
        self.color_perms[usize::from(cp)]
    }

    /// Apply a transform: recolor, then permute positions
    #[inline]
    #[must_use]
    pub fn apply(&self, t: Transform, code: Code) -> Code {
        let recolored = self.color_lookup[code.index() * NCOLORPERMS + usize::from(t.cp)];
        let moved = self.position_lookup[usize::from(recolored) * NPOSPERMS + usize::from(t.pp)];
        Code::from_index(usize::from(moved))
    }

    /// Transforms in `seed` that fix every code of `prefix`
    ///
    /// The result only shrinks as the prefix grows. Scanning stops once the set
    /// reaches its floor: the identity alone when the seed contains it, empty
    /// otherwise.
    #[must_use]
    pub fn preserving(&self, prefix: &[Code], seed: &[Transform]) -> Vec<Transform> {
        let floor = usize::from(seed.contains(&Transform::IDENTITY));

        let mut preserved = seed.to_vec();
        for &code in prefix {
            if preserved.len() <= floor {
                break;
            }
            preserved.retain(|&t| self.apply(t, code) == code);
        }
        preserved
    }

    /// Transforms in `seed` that map the code set `codes` onto itself
    #[must_use]
    pub fn stabilizer(&self, codes: &[Code], seed: &[Transform]) -> Vec<Transform> {
        let mut members = vec![false; NCODES];
        for code in codes {
            members[code.index()] = true;
        }

        seed.par_iter()
            .copied()
            .filter(|&t| codes.iter().all(|&c| members[self.apply(t, c).index()]))
            .collect()
    }

    /// Canonical orbit representative of `code` under `transforms`
    ///
    /// The smallest numeric image; an empty set leaves the code alone.
    #[must_use]
    pub fn representative(&self, transforms: &[Transform], code: Code) -> Code {
        transforms
            .iter()
            .map(|&t| self.apply(t, code))
            .min()
            .unwrap_or(code)
    }

    /// Check table dimensions and lookup ranges, used after loading from cache
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.position_perms.len() == NPOSPERMS
            && self.color_perms.len() == NCOLORPERMS
            && self.position_lookup.len() == NCODES * NPOSPERMS
            && self.color_lookup.len() == NCODES * NCOLORPERMS
            && self.all.len() == NTRANSFORMS
            && self.position_lookup.iter().all(|&v| usize::from(v) < NCODES)
            && self.color_lookup.iter().all(|&v| usize::from(v) < NCODES)
    }
}

impl Default for TransformTable {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_index(colors: &[u8; NPOSITIONS]) -> u16 {
    colors
        .iter()
        .rev()
        .fold(0u16, |acc, &c| acc * NCOLORS as u16 + u16::from(c))
}
