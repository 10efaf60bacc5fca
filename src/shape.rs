//! Background outline descriptors and the geometry used to morph between them.

use std::collections::HashMap;

use kurbo::{BezPath, CubicBez, Line, ParamCurve, PathEl, Point};

use crate::error::{PortfolioError, Result};
use crate::section::SectionId;

/// Outlines drawn in a 100x100 view box.
const BUILTIN_OUTLINES: [(SectionId, &str); 5] = [
    (
        SectionId::Profile,
        "M50 30 C40 30 35 40 35 50 L35 60 C35 70 40 80 50 80 S65 70 65 60 L65 50 C65 40 60 30 50 30Z",
    ),
    (
        SectionId::SkillSet,
        "M50,25 L55.9,42.5 L74.5,42.5 L60.2,54.2 L65.5,71.5 L50,60.5 L34.5,71.5 L39.8,54.2 L25.5,42.5 L44.1,42.5 Z",
    ),
    (
        SectionId::Timeline,
        "M50 20 L50 50 L75 65 M50 10 C77.6 10 100 32.4 100 60 C100 87.6 77.6 110 50 110 C22.4 110 0 87.6 0 60 C0 32.4 22.4 10 50 10 Z",
    ),
    (
        SectionId::Project,
        "M30 20 L70 20 L70 80 L30 80 Z M40 30 L60 30 M40 40 L60 40 M40 50 L50 50",
    ),
    (SectionId::Contact, "M15 25 L85 25 L85 75 L15 75 Z M15 25 L50 55 L85 25"),
];

/// Immutable section -> outline lookup, validated once at startup.
#[derive(Clone, Debug)]
pub struct ShapeTable {
    outlines: HashMap<SectionId, BezPath>,
}

impl ShapeTable {
    /// Parses every descriptor and checks that each section has one.
    ///
    /// A gap here means the section list and the outline table drifted
    /// apart; that is a startup error, never a runtime one.
    pub fn from_descriptors<'a>(
        descriptors: impl IntoIterator<Item = (SectionId, &'a str)>,
    ) -> Result<Self> {
        let mut outlines = HashMap::new();
        for (section, descriptor) in descriptors {
            let path = BezPath::from_svg(descriptor).map_err(|e| PortfolioError::InvalidOutline {
                section,
                reason: e.to_string(),
            })?;
            if path.elements().is_empty() {
                return Err(PortfolioError::InvalidOutline { section, reason: "empty path".into() });
            }
            outlines.insert(section, path);
        }
        if let Some(missing) = SectionId::ALL.into_iter().find(|s| !outlines.contains_key(s)) {
            return Err(PortfolioError::MissingOutline(missing));
        }
        Ok(Self { outlines })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_descriptors(BUILTIN_OUTLINES)
    }

    /// Built-in table with per-section replacements applied.
    pub fn with_overrides<'a>(
        overrides: impl IntoIterator<Item = (&'a SectionId, &'a String)>,
    ) -> Result<Self> {
        let mut descriptors: HashMap<SectionId, &str> = BUILTIN_OUTLINES.into_iter().collect();
        for (section, descriptor) in overrides {
            descriptors.insert(*section, descriptor.as_str());
        }
        Self::from_descriptors(descriptors)
    }

    pub fn outline(&self, section: SectionId) -> &BezPath {
        // from_descriptors guarantees every section is present
        &self.outlines[&section]
    }
}

/// True when both paths have the same element sequence, so they can be
/// interpolated point by point.
pub fn compatible(a: &BezPath, b: &BezPath) -> bool {
    let (a, b) = (a.elements(), b.elements());
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| std::mem::discriminant(x) == std::mem::discriminant(y))
}

/// Element-wise interpolation of two compatible paths.
pub fn lerp_compatible(a: &BezPath, b: &BezPath, t: f64) -> BezPath {
    let mut out = BezPath::new();
    for (x, y) in a.elements().iter().zip(b.elements()) {
        let el = match (*x, *y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(q1, t), p2.lerp(q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(p1.lerp(q1, t), p2.lerp(q2, t), p3.lerp(q3, t))
            }
            _ => PathEl::ClosePath,
        };
        out.push(el);
    }
    out
}

#[derive(Clone, Debug)]
struct Subpath {
    segments: Vec<CubicBez>,
    closed: bool,
}

impl Subpath {
    fn point(p: Point) -> Self {
        Self { segments: vec![CubicBez::new(p, p, p, p)], closed: false }
    }

    fn end(&self) -> Point {
        self.segments.last().map(|s| s.p3).unwrap_or_default()
    }

    /// Splits the longest segment until there are `count` of them.
    fn split_to(&mut self, count: usize) {
        while self.segments.len() < count {
            let longest = self
                .segments
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| hull_length(a).total_cmp(&hull_length(b)))
                .map(|(idx, _)| idx)
                .unwrap_or(0);
            let (left, right) = self.segments[longest].subdivide();
            self.segments.splice(longest..=longest, [left, right]);
        }
    }
}

fn hull_length(c: &CubicBez) -> f64 {
    c.p0.distance(c.p1) + c.p1.distance(c.p2) + c.p2.distance(c.p3)
}

fn line_cubic(from: Point, to: Point) -> CubicBez {
    let line = Line::new(from, to);
    CubicBez::new(from, line.eval(1.0 / 3.0), line.eval(2.0 / 3.0), to)
}

/// Path expressed as cubic segments only, one list per subpath.
#[derive(Clone, Debug)]
pub struct CubicOutline {
    subpaths: Vec<Subpath>,
}

impl CubicOutline {
    pub fn from_path(path: &BezPath) -> Self {
        let mut subpaths: Vec<Subpath> = Vec::new();
        let mut current: Option<(Point, Subpath)> = None;
        let mut pen = Point::ZERO;

        fn flush(current: &mut Option<(Point, Subpath)>, subpaths: &mut Vec<Subpath>) {
            if let Some((start, mut sub)) = current.take() {
                if sub.segments.is_empty() {
                    sub = Subpath::point(start);
                }
                subpaths.push(sub);
            }
        }

        fn open(current: &mut Option<(Point, Subpath)>, pen: Point) -> &mut Subpath {
            &mut current.get_or_insert_with(|| (pen, Subpath { segments: Vec::new(), closed: false })).1
        }

        for el in path.elements() {
            match *el {
                PathEl::MoveTo(p) => {
                    flush(&mut current, &mut subpaths);
                    current = Some((p, Subpath { segments: Vec::new(), closed: false }));
                    pen = p;
                }
                PathEl::LineTo(p) => {
                    let sub = open(&mut current, pen);
                    sub.segments.push(line_cubic(pen, p));
                    pen = p;
                }
                PathEl::QuadTo(p1, p2) => {
                    let sub = open(&mut current, pen);
                    sub.segments.push(kurbo::QuadBez::new(pen, p1, p2).raise());
                    pen = p2;
                }
                PathEl::CurveTo(p1, p2, p3) => {
                    let sub = open(&mut current, pen);
                    sub.segments.push(CubicBez::new(pen, p1, p2, p3));
                    pen = p3;
                }
                PathEl::ClosePath => {
                    if let Some((start, sub)) = current.as_mut() {
                        if pen.distance(*start) > 1e-9 {
                            sub.segments.push(line_cubic(pen, *start));
                        }
                        sub.closed = true;
                        pen = *start;
                    }
                    flush(&mut current, &mut subpaths);
                }
            }
        }
        flush(&mut current, &mut subpaths);
        Self { subpaths }
    }

    pub fn subpath_count(&self) -> usize {
        self.subpaths.len()
    }

    pub fn segment_counts(&self) -> Vec<usize> {
        self.subpaths.iter().map(|s| s.segments.len()).collect()
    }

    /// Pads and subdivides both outlines until they have the same shape
    /// structure. Missing subpaths collapse onto the last point of the
    /// shorter outline so they grow out of it.
    pub fn equalize(mut a: Self, mut b: Self) -> (Self, Self) {
        let anchor = |o: &Self| o.subpaths.last().map(Subpath::end).unwrap_or_default();
        let (pad_a, pad_b) = (anchor(&a), anchor(&b));
        while a.subpaths.len() < b.subpaths.len() {
            a.subpaths.push(Subpath::point(pad_a));
        }
        while b.subpaths.len() < a.subpaths.len() {
            b.subpaths.push(Subpath::point(pad_b));
        }
        for (x, y) in a.subpaths.iter_mut().zip(b.subpaths.iter_mut()) {
            let count = x.segments.len().max(y.segments.len());
            x.split_to(count);
            y.split_to(count);
        }
        (a, b)
    }

    /// Interpolates two equalized outlines.
    pub fn lerp(&self, other: &Self, t: f64) -> BezPath {
        let mut out = BezPath::new();
        for (x, y) in self.subpaths.iter().zip(&other.subpaths) {
            for (i, (s, e)) in x.segments.iter().zip(&y.segments).enumerate() {
                if i == 0 {
                    out.move_to(s.p0.lerp(e.p0, t));
                }
                out.curve_to(s.p1.lerp(e.p1, t), s.p2.lerp(e.p2, t), s.p3.lerp(e.p3, t));
            }
            let closed = if t < 0.5 { x.closed } else { y.closed };
            if closed {
                out.close_path();
            }
        }
        out
    }
}
