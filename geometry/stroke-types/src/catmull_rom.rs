//! Uniform Catmull-Rom splines over key sequences.
//!
//! Keys are addressed through an accessor `key(i)` rather than a slice so
//! callers can spline any attribute of their own key type without copying
//! it out first. Endpoints are clamped: the control point before the first
//! key and after the last key repeat those keys, so the curve interpolates
//! every key including both ends.
//!
//! The segment between keys `i` and `i + 1` covers parameters `[i, i + 1]`.
//! Parameters outside `[0, len - 1]` are clamped.

use std::ops::{Add, Mul, Sub};

use nalgebra::Vector3;

/// Maximum number of bisections per key interval in [`subdivide_by`].
pub const MAX_SUBDIVISION_DEPTH: u32 = 12;

/// A value that can be splined: anything closed under addition,
/// subtraction and scaling by `f32`.
pub trait SplineValue: Copy + Add<Output = Self> + Sub<Output = Self> + Mul<f32, Output = Self> {}

impl<T> SplineValue for T where T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T> {}

/// Gather the four control points of the segment containing `parameter`,
/// plus the local parameter within that segment.
fn control_points<T: SplineValue>(
    len: usize,
    key: &impl Fn(usize) -> T,
    parameter: f32,
) -> ([T; 4], f32) {
    let last = len - 1;
    let parameter = parameter.clamp(0.0, last as f32);
    let segment = if last == 0 {
        0
    } else {
        (parameter.floor() as usize).min(last - 1)
    };
    let u = parameter - segment as f32;

    let at = |i: isize| key(i.clamp(0, last as isize) as usize);
    let i = segment as isize;
    ([at(i - 1), at(i), at(i + 1), at(i + 2)], u)
}

/// Evaluate the spline through `len` keys at `parameter`.
///
/// # Panics
///
/// Panics if `len` is zero.
///
/// # Example
///
/// ```
/// use stroke_types::catmull_rom::evaluate_by;
///
/// let keys = [0.0_f32, 1.0, 4.0];
/// assert_eq!(evaluate_by(keys.len(), |i| keys[i], 1.0), 1.0);
/// ```
pub fn evaluate_by<T: SplineValue>(len: usize, key: impl Fn(usize) -> T, parameter: f32) -> T {
    assert!(len > 0, "cannot evaluate a spline with no keys");
    let ([p0, p1, p2, p3], u) = control_points(len, &key, parameter);

    let u2 = u * u;
    let u3 = u2 * u;
    let c1 = p2 - p0;
    let c2 = p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3;
    let c3 = p1 * 3.0 - p0 - p2 * 3.0 + p3;

    (p1 * 2.0 + c1 * u + c2 * u2 + c3 * u3) * 0.5
}

/// Evaluate the spline's first derivative (per unit parameter) at `parameter`.
///
/// A single key yields the zero value.
///
/// # Panics
///
/// Panics if `len` is zero.
pub fn derivative_by<T: SplineValue>(len: usize, key: impl Fn(usize) -> T, parameter: f32) -> T {
    assert!(len > 0, "cannot evaluate a spline with no keys");
    let ([p0, p1, p2, p3], u) = control_points(len, &key, parameter);

    let c1 = p2 - p0;
    let c2 = p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3;
    let c3 = p1 * 3.0 - p0 - p2 * 3.0 + p3;

    (c1 + c2 * (2.0 * u) + c3 * (3.0 * u * u)) * 0.5
}

/// Slice convenience for [`evaluate_by`].
pub fn evaluate<T: SplineValue>(keys: &[T], parameter: f32) -> T {
    evaluate_by(keys.len(), |i| keys[i], parameter)
}

/// Slice convenience for [`derivative_by`].
pub fn derivative<T: SplineValue>(keys: &[T], parameter: f32) -> T {
    derivative_by(keys.len(), |i| keys[i], parameter)
}

/// Choose parameters in `(start, end]` so that the polyline through the
/// spline at those parameters deviates from the spline by at most
/// `flatness`.
///
/// The range is first split at integer parameters so every key inside it is
/// emitted as a landmark. Each piece is then bisected until the spline
/// stays within `flatness` of its chord (checked at the quarter points), up
/// to [`MAX_SUBDIVISION_DEPTH`] levels. Returned parameters are strictly
/// increasing and always end with `end` when `end > start`.
///
/// Smaller `flatness` never yields fewer parameters for the same keys.
///
/// # Panics
///
/// Panics if `flatness` is not positive or `len` is zero.
///
/// # Example
///
/// ```
/// use stroke_types::catmull_rom::subdivide_by;
/// use nalgebra::Vector3;
///
/// let keys = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)];
/// let params = subdivide_by(keys.len(), |i| keys[i], 0.0, 1.0, 0.001);
/// // A straight segment needs only its end point.
/// assert_eq!(params, vec![1.0]);
/// ```
pub fn subdivide_by(
    len: usize,
    key: impl Fn(usize) -> Vector3<f32>,
    start: f32,
    end: f32,
    flatness: f32,
) -> Vec<f32> {
    assert!(flatness > 0.0, "flatness must be positive, got {flatness}");
    assert!(len > 0, "cannot subdivide a spline with no keys");

    let mut parameters = Vec::new();
    let point = |t: f32| evaluate_by(len, &key, t);

    let mut a = start;
    while a < end {
        let b = (a.floor() + 1.0).min(end);
        if b <= a {
            break;
        }
        bisect(&point, a, b, flatness, MAX_SUBDIVISION_DEPTH, &mut parameters);
        a = b;
    }

    parameters
}

/// Slice convenience for [`subdivide_by`].
pub fn subdivide(keys: &[Vector3<f32>], start: f32, end: f32, flatness: f32) -> Vec<f32> {
    subdivide_by(keys.len(), |i| keys[i], start, end, flatness)
}

/// Push the parameters subdividing `(a, b]`, in order.
fn bisect(
    point: &impl Fn(f32) -> Vector3<f32>,
    a: f32,
    b: f32,
    flatness: f32,
    depth: u32,
    out: &mut Vec<f32>,
) {
    let mid = 0.5 * (a + b);
    if depth > 0 && mid > a && mid < b && chord_deviation(point, a, b) > flatness {
        bisect(point, a, mid, flatness, depth - 1, out);
        bisect(point, mid, b, flatness, depth - 1, out);
    } else {
        out.push(b);
    }
}

/// Largest distance from the spline to the chord `[point(a), point(b)]`,
/// probed at the quarter points.
fn chord_deviation(point: &impl Fn(f32) -> Vector3<f32>, a: f32, b: f32) -> f32 {
    let start = point(a);
    let end = point(b);

    [0.25, 0.5, 0.75]
        .iter()
        .map(|&s| distance_to_segment(&point(a + (b - a) * s), &start, &end))
        .fold(0.0, f32::max)
}

fn distance_to_segment(p: &Vector3<f32>, a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f32::EPSILON {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}
