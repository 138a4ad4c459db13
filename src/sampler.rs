use ndarray::Array3;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, info_span, warn};

use crate::{
    config::MarchConfig,
    error::{MarchingCubesError, Result},
    grid::Grid,
    types::{Value, Vector3Like},
};

/// Dense scalar samples of a field over a [`Grid`], indexed `[z, y, x]`.
///
/// Non-finite samples are stored as `NaN`; every consumer treats them as
/// "outside". The lattice is written once by [`sample`] and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SampleLattice {
    values: Array3<Value>,
    invalid: usize,
}

impl SampleLattice {
    /// Wraps an existing array of samples, indexed `[z, y, x]`.
    ///
    /// Non-finite entries are normalised to `NaN`.
    pub fn from_array(mut values: Array3<Value>) -> Self {
        let mut invalid = 0;
        values.iter_mut().filter(|v| !v.is_finite()).for_each(|v| {
            *v = Value::NAN;
            invalid += 1;
        });
        Self { values, invalid }
    }

    /// Returns the sample at lattice point `(x, y, z)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Value {
        self.values[[z, y, x]]
    }

    /// Returns the sample with linear lattice index `index`.
    #[inline]
    pub fn value(&self, index: usize) -> Value {
        let (_, ny, nx) = self.values.dim();
        self.values[[index / (nx * ny), (index / nx) % ny, index % nx]]
    }

    /// Gathers the samples at the given lattice indices.
    #[inline]
    pub fn corner_values(&self, corners: &[usize; 8]) -> [Value; 8] {
        corners.map(|i| self.value(i))
    }

    /// Number of samples whose field value was not finite.
    pub fn invalid_count(&self) -> usize {
        self.invalid
    }

    /// Lattice points per axis as `[nx, ny, nz]`.
    pub fn resolution(&self) -> [usize; 3] {
        let (nz, ny, nx) = self.values.dim();
        [nx, ny, nz]
    }

    pub fn values(&self) -> &Array3<Value> {
        &self.values
    }
}

/// Evaluates `field` once at every lattice point of `grid`.
///
/// Each non-finite result is logged and stored as "outside". With
/// [`MarchConfig::strict`] set the first one (in lattice order) is returned as
/// [`MarchingCubesError::FieldEvaluation`] instead.
pub fn sample<V, F>(grid: &Grid<V>, field: &F, config: &MarchConfig) -> Result<SampleLattice>
where
    V: Vector3Like,
    F: Fn(V) -> Value + Sync + ?Sized,
{
    let _span = info_span!("sample", points = grid.point_count()).entered();

    let count = grid.point_count();
    let raw: Vec<Value> = if config.parallel {
        (0..count)
            .into_par_iter()
            .map(|i| field(grid.point_at_index(i)))
            .collect()
    } else {
        (0..count).map(|i| field(grid.point_at_index(i))).collect()
    };

    let mut invalid = 0;
    let mut values = Vec::with_capacity(count);
    for (index, value) in raw.into_iter().enumerate() {
        if value.is_finite() {
            values.push(value);
            continue;
        }

        let point = grid.point_at_index(index).to_array();
        if config.strict {
            return Err(MarchingCubesError::FieldEvaluation { point, value });
        }
        warn!(?point, value, "field is not finite, treating sample as outside");
        invalid += 1;
        values.push(Value::NAN);
    }

    let [nx, ny, nz] = grid.resolution();
    let values = Array3::from_shape_vec((nz, ny, nx), values)?;
    debug!(invalid, "sampled lattice");

    Ok(SampleLattice { values, invalid })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::Point;

    fn grid() -> Grid {
        Grid::new([3, 4, 5], Point::new(0., 0., 0.), Point::new(2., 3., 4.)).unwrap()
    }

    #[test]
    fn samples_every_point_exactly_once() {
        let calls = AtomicUsize::new(0);
        let field = |p: Point| {
            calls.fetch_add(1, Ordering::Relaxed);
            p.x + 10. * p.y + 100. * p.z
        };
        let lattice = sample(&grid(), &field, &MarchConfig::default()).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 60);
        assert_eq!(lattice.resolution(), [3, 4, 5]);
        assert_eq!(lattice.get(2, 3, 4), 2. + 30. + 400.);
        assert_eq!(lattice.value(grid().lattice_index(1, 2, 3)), 1. + 20. + 300.);
        assert_eq!(lattice.invalid_count(), 0);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let field = |p: Point| (p.x * 1.3).sin() + p.y * p.z;
        let a = sample(&grid(), &field, &MarchConfig::default()).unwrap();
        let b = sample(&grid(), &field, &MarchConfig::default().with_parallel(false)).unwrap();
        assert_eq!(a.values(), b.values());
    }

    #[test]
    fn non_finite_samples_become_nan() {
        let field = |p: Point| if p.x == 1. { Value::INFINITY } else { -1. };
        let lattice = sample(&grid(), &field, &MarchConfig::default()).unwrap();
        assert_eq!(lattice.invalid_count(), 4 * 5);
        assert!(lattice.get(1, 0, 0).is_nan());
        assert_eq!(lattice.get(0, 0, 0), -1.);
    }

    #[test]
    fn strict_mode_reports_the_first_bad_point() {
        let field = |p: Point| if p.y >= 1. { Value::NAN } else { 1. };
        let err = sample(&grid(), &field, &MarchConfig::default().with_strict(true)).unwrap_err();
        match err {
            MarchingCubesError::FieldEvaluation { point, value } => {
                assert_eq!(point, [0., 1., 0.]);
                assert!(value.is_nan());
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn from_array_normalises_infinities() {
        let mut values = Array3::<Value>::zeros((2, 2, 2));
        values[[1, 0, 1]] = Value::NEG_INFINITY;
        let lattice = SampleLattice::from_array(values);
        assert_eq!(lattice.invalid_count(), 1);
        assert!(lattice.get(1, 0, 1).is_nan());
    }
}
