/// Rectangular grid of candidate offsets, in fractional lattice index units
/// relative to the expected position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchBox {
    pub center: (f64, f64),
    pub half: (f64, f64),
    pub size: usize,
}

impl SearchBox {
    pub fn new(center: (f64, f64), half: (f64, f64), size: usize) -> Self {
        Self { center, half, size }
    }

    /// Spacing between neighbouring candidates per axis.
    pub fn step(&self) -> (f64, f64) {
        let n = self.size.max(2) as f64 - 1.0;
        (2.0 * self.half.0 / n, 2.0 * self.half.1 / n)
    }

    /// Candidate offsets, row by row, the centre included.
    pub fn candidates(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let (sx, sy) = self.step();
        let n = self.size;
        let (x0, y0) = (self.center.0 - self.half.0, self.center.1 - self.half.1);
        (0..n).flat_map(move |j| (0..n).map(move |i| (x0 + i as f64 * sx, y0 + j as f64 * sy)))
    }

    /// Same grid, half the radius, centred on `center`.
    pub fn zoom(&self, center: (f64, f64)) -> Self {
        Self::new(center, (self.half.0 * 0.5, self.half.1 * 0.5), self.size)
    }

    /// Whether `p` lies strictly inside the box extent.
    pub fn contains_strictly(&self, p: (f64, f64)) -> bool {
        const EPS: f64 = 1e-9;
        (p.0 - self.center.0).abs() < self.half.0 - EPS
            && (p.1 - self.center.1).abs() < self.half.1 - EPS
    }
}
