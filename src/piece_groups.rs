//! Static catalog of named piece-groups, resolved to edge/corner bit
//! masks over the slot indices defined in `crate::cube`.
//!
//! `original_source/cube_definitions.h`'s `Pgr` enum lists roughly 300
//! literal symbols (one per cross/F2L-slot/Roux-block/Petrus-corner/
//! EOLine combination, repeated across all six candidate cross faces).
//! This catalog covers every *family* spec.md names (crosses, F2L slots,
//! Roux blocks, Petrus corner blocks, ZZ EOLine, last-layer sets) as
//! small parameterised functions instead of transcribing the full
//! symbol list -- the engine only ever needs the resulting `PieceMask`,
//! never the symbol's name.

use ahash::HashMap;
use lazy_static::lazy_static;

use crate::cube::{PieceMask, BL, BR, DB, DBL, DBR, DF, DFL, DFR, DL, DR, FL, FR, UB, UBL, UBR, UF, UFL, UFR, UL, UR};
use crate::moves::Face;

/// Every movable piece.
pub fn all() -> PieceMask {
    PieceMask {
        edges: 0xFFF,
        corners: 0xFF,
    }
}

pub fn all_edges() -> PieceMask {
    PieceMask {
        edges: 0xFFF,
        corners: 0,
    }
}

pub fn all_corners() -> PieceMask {
    PieceMask {
        edges: 0,
        corners: 0xFF,
    }
}

fn face_edges(face: Face) -> [usize; 4] {
    match face {
        Face::U => [UF, UR, UB, UL],
        Face::D => [DF, DR, DB, DL],
        Face::F => [UF, FR, DF, FL],
        Face::B => [UB, BR, DB, BL],
        Face::R => [UR, FR, DR, BR],
        Face::L => [UL, FL, DL, BL],
    }
}

fn face_corners(face: Face) -> [usize; 4] {
    match face {
        Face::U => [UFR, UFL, UBL, UBR],
        Face::D => [DFR, DFL, DBL, DBR],
        Face::F => [UFR, UFL, DFR, DFL],
        Face::B => [UBR, UBL, DBR, DBL],
        Face::R => [UFR, UBR, DFR, DBR],
        Face::L => [UFL, UBL, DFL, DBL],
    }
}

fn mask_of(edges: &[usize], corners: &[usize]) -> PieceMask {
    let mut m = PieceMask::EMPTY;
    for &e in edges {
        m.edges |= 1 << e;
    }
    for &c in corners {
        m.corners |= 1 << c;
    }
    m
}

/// All 8 pieces (4 edges + 4 corners) touching `face` -- an outer
/// 90-degree turn of `face` permutes exactly this group among itself.
pub fn layer(face: Face) -> PieceMask {
    mask_of(&face_edges(face), &face_corners(face))
}

/// The four edges of `face`, uncombined with that face's corners --
/// "CROSS_<face>" in the original catalog: a CFOP cross only needs
/// edges placed, not the corners above/below them.
pub fn cross(face: Face) -> PieceMask {
    mask_of(&face_edges(face), &[])
}

/// The four corners of `face` alone -- "CORNERS_<face>".
pub fn corners_layer(face: Face) -> PieceMask {
    mask_of(&[], &face_corners(face))
}

/// The edge lying between two adjacent corners' non-shared faces, e.g.
/// the edge connecting `UFR` and `DFR` equatorially is `FR`. Every
/// corner has exactly one such "equatorial" edge, independent of which
/// face is treated as the cross.
fn equatorial_edge(corner: usize) -> usize {
    match corner {
        UFR | DFR => FR,
        UFL | DFL => FL,
        UBR | DBR => BR,
        UBL | DBL => BL,
        other => unreachable!("not a corner slot: {other}"),
    }
}

/// The F2L slot (one corner of `cross_face` plus its equatorial edge)
/// at `corner`. `corner` must be one of `face_corners(cross_face)`.
pub fn f2l_slot(corner: usize) -> PieceMask {
    mask_of(&[equatorial_edge(corner)], &[corner])
}

/// All four F2L slots for a cross on `cross_face` -- "F2L_<face>".
pub fn f2l_all(cross_face: Face) -> PieceMask {
    face_corners(cross_face)
        .into_iter()
        .fold(PieceMask::EMPTY, |acc, c| acc.union(f2l_slot(c)))
}

/// The four F2L slots for a cross on `cross_face`, kept separate rather
/// than unioned -- used by the CFOP scorer to count how many pairs are
/// *individually* solved rather than only whether all four are.
pub fn face_corners_as_f2l_masks(cross_face: Face) -> Vec<PieceMask> {
    face_corners(cross_face).into_iter().map(f2l_slot).collect()
}

/// The upper layer, opposite whatever face the cross (and F2L) were
/// built on -- "LL_<face>" in the original catalog. The engine doesn't
/// need to know which face that was; it is simply `layer` of the face
/// opposite the cross, which callers pass in directly.
pub fn last_layer(face: Face) -> PieceMask {
    layer(face)
}

/// The Roux-style 1x2x3 block: two corners and the three edges that sit
/// below/beside them on one side column, in the canonical D-bottom,
/// F-front spin an orchestrator rotates the cube to before running a
/// Roux search. `left` picks the L-side block, otherwise the R-side.
pub fn roux_block(left: bool) -> PieceMask {
    if left {
        mask_of(&[DL, FL, BL], &[DFL, DBL])
    } else {
        mask_of(&[DR, FR, BR], &[DFR, DBR])
    }
}

/// Six of the "last six edges" Roux needs solved after both blocks and
/// CMLL: every edge not already accounted for by the two side blocks,
/// in the canonical spin.
pub fn roux_last_six_edges() -> PieceMask {
    mask_of(&[UF, UR, UB, UL, DF, DB], &[])
}

/// Adjacent edges of a corner, used by `petrus_block`.
fn corner_edges(corner: usize) -> [usize; 3] {
    match corner {
        UFR => [UF, UR, FR],
        UFL => [UF, UL, FL],
        UBL => [UB, UL, BL],
        UBR => [UB, UR, BR],
        DFR => [DF, DR, FR],
        DFL => [DF, DL, FL],
        DBL => [DB, DL, BL],
        DBR => [DB, DR, BR],
        other => unreachable!("not a corner slot: {other}"),
    }
}

/// A Petrus first-block: one corner plus its three touching edges (a
/// 2x2x2 corner block). `corner` is any of the eight corner slots.
pub fn petrus_block(corner: usize) -> PieceMask {
    let edges = corner_edges(corner);
    mask_of(&edges, &[corner])
}

/// ZZ's EOLine: the two edges that must land correctly positioned on
/// the D layer front/back slots once edge orientation is solved, in
/// the canonical D-bottom F-front spin. (Orientation of *all* edges is
/// a separate `mandatory_orientation` requirement, added by the goal
/// predicate, not by this piece-group mask.)
pub fn zz_eoline() -> PieceMask {
    mask_of(&[DF, DB], &[])
}

/// yruRU's CP-line: the pair of D-layer corners whose relative
/// permutation (not orientation) the CP-line step fixes, in the
/// canonical spin.
pub fn yruru_cpline() -> PieceMask {
    mask_of(&[], &[DFR, DBR])
}

fn build_catalog() -> HashMap<&'static str, PieceMask> {
    let mut m = HashMap::default();
    for face in enum_iterator::all::<Face>() {
        let name: &'static str = match face {
            Face::U => "CROSS_U",
            Face::D => "CROSS_D",
            Face::F => "CROSS_F",
            Face::B => "CROSS_B",
            Face::R => "CROSS_R",
            Face::L => "CROSS_L",
        };
        m.insert(name, cross(face));
        let layer_name: &'static str = match face {
            Face::U => "LAYER_U",
            Face::D => "LAYER_D",
            Face::F => "LAYER_F",
            Face::B => "LAYER_B",
            Face::R => "LAYER_R",
            Face::L => "LAYER_L",
        };
        m.insert(layer_name, layer(face));
        let f2l_name: &'static str = match face {
            Face::U => "F2L_U",
            Face::D => "F2L_D",
            Face::F => "F2L_F",
            Face::B => "F2L_B",
            Face::R => "F2L_R",
            Face::L => "F2L_L",
        };
        m.insert(f2l_name, f2l_all(face));
    }
    m.insert("ROUX_BLOCK_LEFT", roux_block(true));
    m.insert("ROUX_BLOCK_RIGHT", roux_block(false));
    m.insert("ROUX_LAST_SIX_EDGES", roux_last_six_edges());
    m.insert("ZZ_EOLINE", zz_eoline());
    m.insert("YRURU_CPLINE", yruru_cpline());
    m.insert("ALL", all());
    m.insert("ALL_EDGES", all_edges());
    m.insert("ALL_CORNERS", all_corners());
    m
}

lazy_static! {
    /// Named group -> mask, read-only after first access. Covers the
    /// family of symbols spec.md §4.C describes (the original
    /// `cube_definitions.h::Pgr` catalog has roughly 300 literal
    /// symbols, one per cross face x structure; this table holds one
    /// representative per family, resolved at the function level above
    /// for everything that varies by a non-face parameter such as
    /// corner index).
    static ref CATALOG: HashMap<&'static str, PieceMask> = build_catalog();
}

/// Look up a named piece-group, e.g. `"CROSS_D"` or `"F2L_U"`. Returns
/// `None` for names outside the static catalog.
pub fn lookup(name: &str) -> Option<PieceMask> {
    CATALOG.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_has_four_edges_and_four_corners() {
        for face in enum_iterator::all::<Face>() {
            let m = layer(face);
            assert_eq!(m.edges.count_ones(), 4);
            assert_eq!(m.corners.count_ones(), 4);
        }
    }

    #[test]
    fn cross_and_corners_layer_partition_layer() {
        for face in enum_iterator::all::<Face>() {
            let combined = cross(face).union(corners_layer(face));
            assert_eq!(combined, layer(face));
        }
    }

    #[test]
    fn f2l_all_has_four_corners_and_four_edges() {
        let m = f2l_all(Face::D);
        assert_eq!(m.corners.count_ones(), 4);
        assert_eq!(m.edges.count_ones(), 4);
    }

    #[test]
    fn catalog_lookup_matches_the_function_form() {
        assert_eq!(lookup("CROSS_D"), Some(cross(Face::D)));
        assert_eq!(lookup("F2L_U"), Some(f2l_all(Face::U)));
        assert_eq!(lookup("NOT_A_REAL_GROUP"), None);
    }

    #[test]
    fn petrus_blocks_cover_every_corner_once() {
        let mut seen = PieceMask::EMPTY;
        for &c in &[UFR, UFL, UBL, UBR, DFR, DFL, DBL, DBR] {
            let block = petrus_block(c);
            assert_eq!(block.corners.count_ones(), 1);
            assert_eq!(block.edges.count_ones(), 3);
            seen = seen.union(block);
        }
        assert_eq!(seen.corners, 0xFF);
    }
}
