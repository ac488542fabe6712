/// Exact coordinates in Q(√3) with a fixed denominator of six
///
/// Every coordinate of the FD3 embedding is built from `a = 1/(2√3)`,
/// `b = 1/2`, `c = 1/√3` and small integers, so all of them have the form
/// `(p + q√3) / 6` with integer `p` and `q`. Keeping them in that form makes
/// equality, mirroring and distinctness exact; floats appear only when the
/// geometry is realized.
use nalgebra::Point3;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// The number `(rational + radical·√3) / 6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Surd {
    pub rational: i64,
    pub radical: i64,
}

impl Surd {
    pub const ZERO: Surd = Surd::new(0, 0);
    pub const ONE: Surd = Surd::new(6, 0);

    pub const fn new(rational: i64, radical: i64) -> Self {
        Self { rational, radical }
    }

    pub const fn integer(n: i64) -> Self {
        Self::new(6 * n, 0)
    }

    pub fn to_f64(self) -> f64 {
        (self.rational as f64 + self.radical as f64 * 3f64.sqrt()) / 6.0
    }

    /// Exact sign of `p + q√3`
    pub fn signum(self) -> Ordering {
        let (p, q) = (self.rational, self.radical);
        match (p.cmp(&0), q.cmp(&0)) {
            (Ordering::Equal, s) | (s, Ordering::Equal) => s,
            (sp, sq) if sp == sq => sp,
            // Opposite signs: the term with the larger square wins
            (sp, sq) => {
                let (p2, q2) = (i128::from(p) * i128::from(p), 3 * i128::from(q) * i128::from(q));
                if p2 > q2 {
                    sp
                } else {
                    sq
                }
            }
        }
    }
}

/// Numeric order
impl Ord for Surd {
    fn cmp(&self, other: &Self) -> Ordering {
        (*self - *other).signum()
    }
}

impl PartialOrd for Surd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// `1/(2√3)`
pub const A: Surd = Surd::new(0, 1);
/// `1/2`
pub const B: Surd = Surd::new(3, 0);
/// `1/√3`
pub const C: Surd = Surd::new(0, 2);

impl Add for Surd {
    type Output = Surd;

    fn add(self, rhs: Surd) -> Surd {
        Surd::new(self.rational + rhs.rational, self.radical + rhs.radical)
    }
}

impl Sub for Surd {
    type Output = Surd;

    fn sub(self, rhs: Surd) -> Surd {
        Surd::new(self.rational - rhs.rational, self.radical - rhs.radical)
    }
}

impl Neg for Surd {
    type Output = Surd;

    fn neg(self) -> Surd {
        Surd::new(-self.rational, -self.radical)
    }
}

/// Integer scaling
impl Mul<Surd> for i64 {
    type Output = Surd;

    fn mul(self, rhs: Surd) -> Surd {
        Surd::new(self * rhs.rational, self * rhs.radical)
    }
}

impl fmt::Display for Surd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.rational, self.radical) {
            (0, 0) => write!(f, "0"),
            (p, 0) => write!(f, "{p}/6"),
            (0, q) => write!(f, "{q}√3/6"),
            (p, q) if q < 0 => write!(f, "({p} - {}√3)/6", -q),
            (p, q) => write!(f, "({p} + {q}√3)/6"),
        }
    }
}

/// A point with exact coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExactPoint {
    pub x: Surd,
    pub y: Surd,
    pub z: Surd,
}

impl ExactPoint {
    pub const ORIGIN: ExactPoint = ExactPoint::new(Surd::ZERO, Surd::ZERO, Surd::ZERO);

    pub const fn new(x: Surd, y: Surd, z: Surd) -> Self {
        Self { x, y, z }
    }

    /// Reflection in the plane z = 0
    pub fn mirror_z(self) -> Self {
        Self::new(self.x, self.y, -self.z)
    }

    /// Floating point realization
    pub fn realize(self) -> Point3<f64> {
        Point3::new(self.x.to_f64(), self.y.to_f64(), self.z.to_f64())
    }
}

impl fmt::Display for ExactPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
