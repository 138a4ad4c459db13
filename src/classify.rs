use crate::{
    tables::{CORNER_POINT_INDICES, EDGE_TABLE, TRI_END, TRI_TABLE},
    types::Value,
};

/// Sign configuration of one cell: its case index and crossed-edge mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellCase {
    /// 8-bit case index, bit `b` set when corner `b` is inside.
    pub index: usize,
    /// 12-bit mask from [`EDGE_TABLE`], bit `e` set when edge `e` is crossed.
    pub edges: u16,
}

impl CellCase {
    /// Classifies a cell from its 8 corner samples.
    #[inline]
    pub fn classify(corners: &[Value; 8], iso_level: Value) -> Self {
        let index = case_index(corners, iso_level);
        Self {
            index,
            edges: EDGE_TABLE[index],
        }
    }

    /// `true` for cases 0 and 255, which never produce triangles.
    #[inline]
    pub fn is_uniform(&self) -> bool {
        self.edges == 0
    }

    /// Whether edge `edge` of this cell is crossed by the surface.
    #[inline]
    pub fn crosses(&self, edge: usize) -> bool {
        self.edges & (1 << edge) != 0
    }

    /// Iterates the triangles of this case as triples of cell edge indices,
    /// wound so their normal points from inside to outside.
    #[inline]
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        triangle_edges(self.index)
    }
}

/// Computes the marching cubes case index for a cell.
///
/// Each of the 8 corners maps to one bit. A bit is set when the corner's value
/// is **strictly below** the iso level (i.e. "inside" the surface):
///
/// ```text
/// corner index:  7  6  5  4  3  2  1  0
/// state bits:   [_][_][_][_][_][_][_][_]
///                                      ^-- corner 0 inside?
/// ```
///
/// Non-finite samples count as outside. A cell whose 8 samples are all
/// non-finite is reported as case 255, which emits nothing.
#[inline]
pub fn case_index(corners: &[Value; 8], iso_level: Value) -> usize {
    if corners.iter().all(|v| !v.is_finite()) {
        return 255;
    }

    let mut state: usize = 0;
    for (i, &v) in corners.iter().enumerate() {
        if v < iso_level {
            state |= 1 << i;
        }
    }
    state
}

/// The two corners joined by cell edge `edge`.
#[inline]
pub fn edge_corners(edge: usize) -> [usize; 2] {
    let [a, b] = CORNER_POINT_INDICES[edge];
    [a as usize, b as usize]
}

/// Triangles for case `state` as triples of edge indices.
///
/// `TRI_TABLE[state]` contains edge indices in groups of three, terminated by `-1`:
/// ```text
/// TRI_TABLE[state] = [e0, e1, e2,  e3, e4, e5,  -1, ...]
///                     \___tri0__/   \___tri1__/
/// ```
#[inline]
pub fn triangle_edges(state: usize) -> impl Iterator<Item = [usize; 3]> {
    TRI_TABLE[state]
        .chunks_exact(3)
        .take_while(|tri| tri[0] != TRI_END)
        .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_cells_are_early_exits() {
        let outside = CellCase::classify(&[1.; 8], 0.);
        let inside = CellCase::classify(&[-1.; 8], 0.);
        assert_eq!(outside.index, 0);
        assert_eq!(inside.index, 255);
        assert!(outside.is_uniform() && inside.is_uniform());
        assert_eq!(outside.triangles().count(), 0);
        assert_eq!(inside.triangles().count(), 0);
    }

    #[test]
    fn single_inside_corner() {
        let mut corners = [1.; 8];
        corners[0] = -1.;
        let case = CellCase::classify(&corners, 0.);
        assert_eq!(case.index, 1);
        assert!(case.crosses(0) && case.crosses(3) && case.crosses(8));
        assert_eq!(case.edges.count_ones(), 3);
        assert_eq!(case.triangles().collect::<Vec<_>>(), vec![[0, 3, 8]]);
    }

    #[test]
    fn zero_is_outside() {
        let mut corners = [0.; 8];
        corners[6] = -0.5;
        assert_eq!(case_index(&corners, 0.), 1 << 6);
    }

    #[test]
    fn iso_level_shifts_the_split() {
        let corners = [0.2, 0.2, 0.2, 0.2, 0.8, 0.8, 0.8, 0.8];
        assert_eq!(case_index(&corners, 0.5), 0x0f);
    }

    #[test]
    fn non_finite_corners_are_outside() {
        let mut corners = [-1.; 8];
        corners[2] = Value::NAN;
        assert_eq!(case_index(&corners, 0.), 255 & !(1 << 2));
    }

    #[test]
    fn all_non_finite_cell_is_case_255() {
        let case = CellCase::classify(&[Value::NAN; 8], 0.);
        assert_eq!(case.index, 255);
        assert_eq!(case.triangles().count(), 0);
    }

    #[test]
    fn edge_corner_pairs() {
        assert_eq!(edge_corners(0), [0, 1]);
        assert_eq!(edge_corners(7), [7, 4]);
        assert_eq!(edge_corners(11), [3, 7]);
    }

    #[test]
    fn at_most_five_triangles_per_case() {
        for state in 0..256 {
            assert!(triangle_edges(state).count() <= 5);
        }
    }
}
