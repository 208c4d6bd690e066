/// Order four corners as top-left, top-right, bottom-right, bottom-left.
///
/// Corners are sorted by angle around their centroid, rotated so the corner
/// with the smallest `x + y` comes first, and the winding is flipped if needed
/// so the second corner lies clockwise of the first on screen.
pub fn order_quad(points: [(f32, f32); 4]) -> [(f32, f32); 4] {
    let cx = points.iter().map(|p| p.0).sum::<f32>() / 4.0;
    let cy = points.iter().map(|p| p.1).sum::<f32>() / 4.0;

    let mut pts = points;
    pts.sort_by(|a, b| {
        let ta = (a.1 - cy).atan2(a.0 - cx);
        let tb = (b.1 - cy).atan2(b.0 - cx);
        ta.total_cmp(&tb)
    });

    let first = pts
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.0 + a.1).total_cmp(&(b.0 + b.1)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    pts.rotate_left(first);

    let v1 = (pts[1].0 - pts[0].0, pts[1].1 - pts[0].1);
    let v2 = (pts[3].0 - pts[0].0, pts[3].1 - pts[0].1);
    if v1.0 * v2.1 - v1.1 * v2.0 < 0.0 {
        pts.swap(1, 3);
    }
    pts
}

/// Mean edge length of an ordered quad, used as the side of the target square.
pub fn square_side(quad: &[(f32, f32); 4]) -> f32 {
    let dist = |a: (f32, f32), b: (f32, f32)| (a.0 - b.0).hypot(a.1 - b.1);
    let top = dist(quad[1], quad[0]);
    let bottom = dist(quad[2], quad[3]);
    let left = dist(quad[3], quad[0]);
    let right = dist(quad[2], quad[1]);
    0.5 * (0.5 * (top + bottom) + 0.5 * (left + right))
}
