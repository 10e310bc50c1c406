//! Cube orientation ("spin"): which color is up, which is front. There
//! are 24 valid (up, front) pairs -- the 6 choices of up face times the
//! 4 faces perpendicular to it that can be front.

use std::collections::VecDeque;

use ahash::HashMap;
use enum_iterator::all;
use lazy_static::lazy_static;

use crate::moves::{Amount, Face, Move, Turn};

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Spin {
    pub up: Face,
    pub front: Face,
}

impl Spin {
    pub const SOLVED: Spin = Spin {
        up: Face::U,
        front: Face::F,
    };

    pub fn is_valid(self) -> bool {
        self.up.axis() != self.front.axis()
    }
}

/// Unit basis vector for a face, used to rotate spins with integer
/// arithmetic (every whole-cube rotation is a multiple of 90 degrees, so
/// components always land back on {-1, 0, 1}).
fn face_vec(f: Face) -> (i8, i8, i8) {
    match f {
        Face::U => (0, 1, 0),
        Face::D => (0, -1, 0),
        Face::F => (0, 0, 1),
        Face::B => (0, 0, -1),
        Face::R => (1, 0, 0),
        Face::L => (-1, 0, 0),
    }
}

fn vec_face(v: (i8, i8, i8)) -> Face {
    match v {
        (0, 1, 0) => Face::U,
        (0, -1, 0) => Face::D,
        (0, 0, 1) => Face::F,
        (0, 0, -1) => Face::B,
        (1, 0, 0) => Face::R,
        (-1, 0, 0) => Face::L,
        other => unreachable!("rotation produced a non-axis-aligned vector: {other:?}"),
    }
}

/// One quarter-turn step of the rotation matrix for `turn`'s axis.
fn rotate_quarter(v: (i8, i8, i8), turn: Turn) -> (i8, i8, i8) {
    let (x, y, z) = v;
    match turn {
        Turn::X => (x, -z, y),
        Turn::Y => (z, y, -x),
        Turn::Z => (-y, x, z),
    }
}

fn rotate_vec(mut v: (i8, i8, i8), turn: Turn, amount: Amount) -> (i8, i8, i8) {
    for _ in 0..amount.quarter_repeats() {
        v = rotate_quarter(v, turn);
    }
    v
}

pub fn rotate_spin(spin: Spin, turn: Turn, amount: Amount) -> Spin {
    Spin {
        up: vec_face(rotate_vec(face_vec(spin.up), turn, amount)),
        front: vec_face(rotate_vec(face_vec(spin.front), turn, amount)),
    }
}

fn all_spins() -> Vec<Spin> {
    let mut out = Vec::with_capacity(24);
    for up in all::<Face>() {
        for front in all::<Face>() {
            let s = Spin { up, front };
            if s.is_valid() {
                out.push(s);
            }
        }
    }
    out
}

fn all_turn_moves() -> Vec<Move> {
    let mut out = Vec::with_capacity(9);
    for turn in all::<Turn>() {
        for amount in all::<Amount>() {
            out.push(Move::Rotation(turn, amount));
        }
    }
    out
}

/// Breadth-first search from every spin to every other spin over the
/// nine whole-cube rotation moves, recording the shortest path (at most
/// two moves -- any reorientation of a cube is reachable in two whole
/// -cube turns).
fn build_reorient_table() -> HashMap<(Spin, Spin), Vec<Move>> {
    let turn_moves = all_turn_moves();
    let mut table = HashMap::default();

    for &start in &all_spins() {
        table.insert((start, start), Vec::new());
        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(cur) = queue.pop_front() {
            let path_so_far = table.get(&(start, cur)).cloned().unwrap_or_default();
            if path_so_far.len() >= 2 {
                continue;
            }
            for &mv in &turn_moves {
                let (Move::Rotation(turn, amount)) = mv else {
                    unreachable!()
                };
                let next = rotate_spin(cur, turn, amount);
                if table.contains_key(&(start, next)) {
                    continue;
                }
                let mut next_path = path_so_far.clone();
                next_path.push(mv);
                table.insert((start, next), next_path);
                queue.push_back(next);
            }
        }
    }

    table
}

lazy_static! {
    static ref REORIENT_TABLE: HashMap<(Spin, Spin), Vec<Move>> = build_reorient_table();
}

/// The sequence of whole-cube rotations (at most two) that takes `from`
/// to `to`. Empty if they're already equal.
pub fn reorient_path(from: Spin, to: Spin) -> Vec<Move> {
    REORIENT_TABLE
        .get(&(from, to))
        .cloned()
        .unwrap_or_else(|| panic!("no reorientation path from {from:?} to {to:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_spins_count_is_24() {
        assert_eq!(all_spins().len(), 24);
    }

    #[test]
    fn reorient_table_covers_every_pair() {
        let spins = all_spins();
        for &a in &spins {
            for &b in &spins {
                let path = reorient_path(a, b);
                assert!(path.len() <= 2);
            }
        }
    }

    #[test]
    fn reorient_same_spin_is_empty() {
        assert!(reorient_path(Spin::SOLVED, Spin::SOLVED).is_empty());
    }
}
