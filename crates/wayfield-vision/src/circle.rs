//! Midpoint-circle rasterization and angular membership.

use wayfield_core::Point;

/// Second-octant arc points of a circle of the given radius, from (0, r)
/// to the x == y diagonal, via the incremental midpoint algorithm.
///
/// Mirror each point with [`mirror_octant`] to cover the full circle.
pub fn midpoint_circle(radius: i32) -> Vec<Point> {
    let radius = radius.max(0);
    let mut points = Vec::with_capacity(radius as usize + 2);
    let mut x = 0;
    let mut y = radius;
    let mut f_m = 1 - radius;
    let mut d_e = 3;
    let mut d_ne = 5 - 2 * radius;
    points.push(Point::new(x, y));
    while x < y {
        if f_m < 0 {
            f_m += d_e;
            d_e += 2;
            d_ne += 2;
        } else {
            f_m += d_ne;
            d_e += 2;
            d_ne += 4;
            y -= 1;
        }
        x += 1;
        points.push(Point::new(x, y));
    }
    points
}

/// All 8-way mirror images of an octant offset `p` around `center`.
///
/// Degenerate offsets (on an axis or the diagonal) produce duplicates;
/// callers collect into a set.
pub fn mirror_octant(center: Point, p: Point) -> [Point; 8] {
    let (x, y) = (p.x, p.y);
    [
        Point::new(center.x + x, center.y + y),
        Point::new(center.x - x, center.y + y),
        Point::new(center.x + x, center.y - y),
        Point::new(center.x - x, center.y - y),
        Point::new(center.x + y, center.y + x),
        Point::new(center.x - y, center.y + x),
        Point::new(center.x + y, center.y - x),
        Point::new(center.x - y, center.y - x),
    ]
}

/// Whether `candidate` lies within the angular sector around `facing`.
///
/// The opening is clamped to [1, 360] degrees and membership holds iff the
/// angle between `candidate - center` and `facing` is at most half the
/// opening. A zero `facing` vector points along +x; the center itself is
/// always a member.
pub fn in_angle(center: Point, candidate: Point, facing: Point, opening_deg: f32) -> bool {
    let opening = f64::from(opening_deg).clamp(1.0, 360.0);

    let vx = f64::from(candidate.x - center.x);
    let vy = f64::from(candidate.y - center.y);
    if vx == 0.0 && vy == 0.0 {
        return true;
    }

    let (fx, fy) = if facing.x == 0 && facing.y == 0 {
        (1.0, 0.0)
    } else {
        (f64::from(facing.x), f64::from(facing.y))
    };

    let dot = vx * fx + vy * fy;
    let norm = (vx * vx + vy * vy).sqrt() * (fx * fx + fy * fy).sqrt();
    let cos = (dot / norm).clamp(-1.0, 1.0);
    let angle_deg = cos.acos().to_degrees();
    angle_deg <= opening / 2.0
}
