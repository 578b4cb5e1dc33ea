//! 2D simplex noise over a shuffled permutation table.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Skewing factor for 2D simplex: `0.5 * (sqrt(3) - 1)`.
const F2: f64 = 0.366_025_403_784_438_6;
/// Unskewing factor for 2D simplex: `(3 - sqrt(3)) / 6`.
const G2: f64 = 0.211_324_865_405_187_1;

/// Scales the summed corner contributions into roughly [-1, 1].
const OUTPUT_SCALE: f64 = 70.0;

/// Fixed gradient directions, indexed by the precomputed `perm % 12` value.
///
/// Diagonals occupy both halves of the table with the axis directions in
/// between, so the mapping is 12-way rather than a folded 4- or 8-way one.
pub const GRADIENTS_2D: [(f64, f64); 12] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
];

/// A 512-entry permutation (the base 256 shuffle mirrored into the upper
/// half) plus the parallel table of each entry modulo 12.
///
/// Immutable once built. A fresh table is created for every generator.
#[derive(Clone)]
pub struct PermutationTable {
    perm: [u8; 512],
    perm_mod12: [u8; 512],
}

impl PermutationTable {
    /// Builds a table from a Fisher–Yates shuffle of 0..=255 driven by `rng`.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut p = [0u8; 256];
        for (i, v) in p.iter_mut().enumerate() {
            *v = i as u8;
        }
        for i in (1..256).rev() {
            let r = rng.random_range(0..=i);
            p.swap(i, r);
        }
        Self::from_permutation(p)
    }

    /// Builds a table from an explicit base permutation.
    ///
    /// `base` should contain every value of 0..=255 exactly once; the table
    /// is still well-formed if it does not, it just stops being a permutation.
    pub fn from_permutation(base: [u8; 256]) -> Self {
        let mut perm = [0u8; 512];
        let mut perm_mod12 = [0u8; 512];
        for i in 0..512 {
            perm[i] = base[i & 255];
            perm_mod12[i] = perm[i] % 12;
        }
        Self { perm, perm_mod12 }
    }

    /// The shuffled base permutation (first half of the table).
    pub fn base(&self) -> &[u8] {
        &self.perm[..256]
    }

    /// Full 512-entry table.
    pub fn entries(&self) -> &[u8; 512] {
        &self.perm
    }

    #[inline]
    fn gradient_index(&self, i: usize, j: usize) -> usize {
        self.perm_mod12[i + self.perm[j] as usize] as usize
    }
}

impl std::fmt::Debug for PermutationTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermutationTable")
            .field("head", &&self.perm[..8])
            .finish_non_exhaustive()
    }
}

/// Deterministic 2D gradient noise generator.
///
/// Sampling is a pure function of the owned [`PermutationTable`] and the
/// input coordinates; regenerating terrain means constructing a new
/// generator, never mutating an existing one.
#[derive(Debug, Clone)]
pub struct GradientNoiseGenerator {
    table: PermutationTable,
}

impl GradientNoiseGenerator {
    /// Creates a generator whose table is shuffled by `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            table: PermutationTable::shuffled(rng),
        }
    }

    /// Creates a reproducible generator from a 64-bit seed.
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::new(&mut rng)
    }

    /// Creates a generator from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::new(&mut rand::rng())
    }

    /// Wraps an existing table.
    pub fn with_table(table: PermutationTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &PermutationTable {
        &self.table
    }

    /// Samples 2D simplex noise at `(x, y)`.
    ///
    /// Returns a value in approximately [-1, 1]. Non-finite coordinates
    /// sample as 0.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        if !(x.is_finite() && y.is_finite()) {
            return 0.0;
        }

        // Skew into the triangular lattice and find the containing cell.
        let s = (x + y) * F2;
        let i = (x + s).floor();
        let j = (y + s).floor();

        let t = (i + j) * G2;
        let x0 = x - (i - t);
        let y0 = y - (j - t);

        // Strictly greater: on the diagonal the upper triangle wins.
        let (i1, j1) = if x0 > y0 { (1usize, 0usize) } else { (0, 1) };

        let x1 = x0 - i1 as f64 + G2;
        let y1 = y0 - j1 as f64 + G2;
        let x2 = x0 - 1.0 + 2.0 * G2;
        let y2 = y0 - 1.0 + 2.0 * G2;

        let ii = (i as i64 & 255) as usize;
        let jj = (j as i64 & 255) as usize;

        let n0 = self.corner(x0, y0, ii, jj);
        let n1 = self.corner(x1, y1, ii + i1, jj + j1);
        let n2 = self.corner(x2, y2, ii + 1, jj + 1);

        OUTPUT_SCALE * (n0 + n1 + n2)
    }

    #[inline]
    fn corner(&self, x: f64, y: f64, i: usize, j: usize) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            return 0.0;
        }
        let (gx, gy) = GRADIENTS_2D[self.table.gradient_index(i, j)];
        let t2 = t * t;
        t2 * t2 * (gx * x + gy * y)
    }
}
