// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Bit flags recording which optional arguments a call supplied.
//!
//! Parameter `p` of `N` maps to word `p / 32`, bit `p % 32`. A set bit means
//! the argument was written at the call site.
//!
//! ```text
//! N = 40                       word 0 (flag1)            word 1 (flag2)
//! params  0 ..= 31   ──►  bits 0 ..= 31
//! params 32 ..= 39   ──►                          bits 0 ..= 7
//! ```
//!
//! One word is named `flag`; several are `flag1`, `flag2`, and so on.

use std::collections::BTreeSet;

/// Bits per flag word.
pub const WORD_BITS: usize = 32;

/// Flag layout for a function with a fixed number of optional parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmaskEncoding {
    parameters: usize
}

impl BitmaskEncoding {
    /// Layout for `parameters` optional parameters.
    #[must_use]
    pub const fn new(parameters: usize) -> Self {
        Self {
            parameters
        }
    }

    /// Number of optional parameters.
    #[must_use]
    pub const fn parameters(&self) -> usize {
        self.parameters
    }

    /// `ceil(N / 32)`.
    #[must_use]
    pub const fn word_count(&self) -> usize {
        self.parameters.div_ceil(WORD_BITS)
    }

    /// Word index and bit index of parameter `index`.
    #[must_use]
    pub const fn locate(index: usize) -> (usize, u32) {
        (index / WORD_BITS, (index % WORD_BITS) as u32)
    }

    /// Names of the trailing flag parameters.
    #[must_use]
    pub fn flag_names(&self) -> Vec<String> {
        match self.word_count() {
            1 => vec!["flag".to_string()],
            n => (1..=n).map(|i| format!("flag{i}")).collect()
        }
    }

    /// Flag words for the supplied parameter indices.
    ///
    /// Indices outside the layout are ignored.
    #[must_use]
    pub fn encode<I>(&self, supplied: I) -> Vec<u32>
    where
        I: IntoIterator<Item = usize>
    {
        let mut words = vec![0u32; self.word_count()];
        for index in supplied.into_iter().filter(|&i| i < self.parameters) {
            let (word, bit) = Self::locate(index);
            words[word] |= 1 << bit;
        }
        words
    }

    /// Supplied parameter indices recorded in `words`.
    #[must_use]
    pub fn decode(&self, words: &[u32]) -> BTreeSet<usize> {
        (0..self.parameters)
            .filter(|&index| Self::is_supplied(words, index))
            .collect()
    }

    /// Is the bit of parameter `index` set?
    #[must_use]
    pub fn is_supplied(words: &[u32], index: usize) -> bool {
        let (word, bit) = Self::locate(index);
        words.get(word).is_some_and(|w| w & (1 << bit) != 0)
    }
}
