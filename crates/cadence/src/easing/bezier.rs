//! Unit cubic bezier solver.
//!
//! The curve runs from (0, 0) to (1, 1) through two control points. Solving
//! for y at a given x first inverts x(t) with Newton's method, falling back
//! to bisection when the derivative flattens out.

/// Polynomial coefficients of a unit cubic bezier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
    start_gradient: f64,
    end_gradient: f64,
}

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_LIMIT: usize = 256;
const FLAT_DERIVATIVE: f64 = 1e-6;

impl UnitBezier {
    /// Build the solver for control points `(x1, y1)` and `(x2, y2)`.
    #[must_use]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;

        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;

        // Tangents used to extend the curve linearly outside [0, 1].
        let start_gradient = if x1 > 0.0 {
            y1 / x1
        } else if y1 == 0.0 && x2 > 0.0 {
            y2 / x2
        } else {
            0.0
        };
        let end_gradient = if x2 < 1.0 {
            (y2 - 1.0) / (x2 - 1.0)
        } else if x2 == 1.0 && x1 < 1.0 {
            (y1 - 1.0) / (x1 - 1.0)
        } else {
            0.0
        };

        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
            start_gradient,
            end_gradient,
        }
    }

    /// x(t)
    #[must_use]
    pub fn sample_curve_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    /// y(t)
    #[must_use]
    pub fn sample_curve_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    /// dx/dt
    #[must_use]
    pub fn sample_curve_derivative_x(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    /// Find t such that x(t) is within `epsilon` of `x`, for `x` in `[0, 1]`.
    #[must_use]
    pub fn solve_curve_x(&self, x: f64, epsilon: f64) -> f64 {
        let mut t2 = x;
        for _ in 0..NEWTON_ITERATIONS {
            let x2 = self.sample_curve_x(t2) - x;
            if x2.abs() < epsilon {
                return t2;
            }
            let d2 = self.sample_curve_derivative_x(t2);
            if d2.abs() < FLAT_DERIVATIVE {
                break;
            }
            t2 -= x2 / d2;
        }

        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t2 = x;
        if t2 < t0 {
            return t0;
        }
        if t2 > t1 {
            return t1;
        }

        for _ in 0..BISECTION_LIMIT {
            if t0 >= t1 {
                break;
            }
            let x2 = self.sample_curve_x(t2);
            if (x2 - x).abs() < epsilon {
                return t2;
            }
            if x > x2 {
                t0 = t2;
            } else {
                t1 = t2;
            }
            t2 = (t1 - t0) * 0.5 + t0;
        }
        t2
    }

    /// y for a given x. Outside `[0, 1]` the curve continues along its end tangents.
    #[must_use]
    pub fn solve(&self, x: f64, epsilon: f64) -> f64 {
        if x < 0.0 {
            return self.start_gradient * x;
        }
        if x > 1.0 {
            return 1.0 + self.end_gradient * (x - 1.0);
        }
        self.sample_curve_y(self.solve_curve_x(x, epsilon))
    }
}
