// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use tablegen::{implementation_fn, virtual_fn};

pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[virtual_fn]
#[allow(non_snake_case, unused_variables)]
pub fn Point(x: i32, y: i32) -> Point {
    unreachable!("calls to `Point` are rewritten")
}

#[implementation_fn]
#[allow(non_snake_case)]
pub fn __impl_Point(x: Option<i32>, y: Option<i32>, flag: u32) -> Point {
    Point {
        x: if flag & 1 != 0 { x.unwrap_or_default() } else { -1 },
        y: if flag & 2 != 0 { y.unwrap_or_default() } else { -1 },
    }
}

fn main() {
    let point = __impl_Point(Some(3), None, 1);
    assert_eq!(point.x, 3);
    assert_eq!(point.y, -1);
}
