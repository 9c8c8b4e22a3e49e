use crate::math::Point2;

/// One contiguous, already-flattened polyline.
///
/// A closed subpath implicitly connects its last point back to the first;
/// an open subpath has two free ends.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Subpath {
    pub points: Vec<Point2>,
    pub closed: bool,
}

impl Subpath {
    /// Creates a subpath from its points.
    #[must_use]
    pub fn new(points: Vec<Point2>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Creates an open subpath.
    #[must_use]
    pub fn open(points: Vec<Point2>) -> Self {
        Self::new(points, false)
    }

    /// Creates a closed subpath.
    #[must_use]
    pub fn closed(points: Vec<Point2>) -> Self {
        Self::new(points, true)
    }

    /// Creates a subpath from `(x, y)` pairs.
    #[must_use]
    pub fn from_xy(coords: &[(f64, f64)], closed: bool) -> Self {
        let points = coords.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        Self::new(points, closed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// An ordered list of subpaths.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serialization", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub subpaths: Vec<Subpath>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a subpath.
    pub fn push(&mut self, subpath: Subpath) {
        self.subpaths.push(subpath);
    }

    /// Builder-style variant of [`Path::push`].
    #[must_use]
    pub fn with(mut self, subpath: Subpath) -> Self {
        self.push(subpath);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subpath> {
        self.subpaths.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subpaths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }
}

impl From<Subpath> for Path {
    fn from(subpath: Subpath) -> Self {
        Self {
            subpaths: vec![subpath],
        }
    }
}

impl FromIterator<Subpath> for Path {
    fn from_iter<I: IntoIterator<Item = Subpath>>(iter: I) -> Self {
        Self {
            subpaths: iter.into_iter().collect(),
        }
    }
}
