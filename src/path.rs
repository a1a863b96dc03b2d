/// Generate SVG path command for a straight segment
///
/// # Returns
/// SVG path command string (e.g., "M 10 20 L 140 80")
pub fn generate_line_path(start_x: f32, start_y: f32, end_x: f32, end_y: f32) -> String {
    format!("M {} {} L {} {}", start_x, start_y, end_x, end_y)
}

/// Generate SVG path command for a polyline through `points`
///
/// Returns an empty string for an empty slice. A single point yields a
/// zero-length segment so the renderer still draws a dot.
pub fn generate_polyline_path<I>(points: I) -> String
where
    I: IntoIterator<Item = (f32, f32)>,
{
    let mut points = points.into_iter();
    let Some((x0, y0)) = points.next() else {
        return String::new();
    };

    let mut commands = String::with_capacity(64);
    commands.push_str(&format!("M {} {}", x0, y0));

    let mut segments = 0usize;
    for (x, y) in points {
        commands.push_str(&format!(" L {} {}", x, y));
        segments += 1;
    }
    if segments == 0 {
        commands.push_str(&format!(" L {} {}", x0, y0));
    }
    commands
}

/// Calculate squared distance from a point to a line segment
pub fn distance_to_line_segment_sq(point: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let ab = (b.0 - a.0, b.1 - a.1);
    let ap = (point.0 - a.0, point.1 - a.1);

    let ab_len_sq = ab.0 * ab.0 + ab.1 * ab.1;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.0 * ap.0 + ap.1 * ap.1;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.0 * ab.0 + ap.1 * ab.1) / ab_len_sq).clamp(0.0, 1.0);

    let closest = (a.0 + t * ab.0, a.1 + t * ab.1);

    let dx = point.0 - closest.0;
    let dy = point.1 - closest.1;
    dx * dx + dy * dy
}

/// Minimum distance from a point to a polyline
///
/// Returns `f32::MAX` for an empty polyline. A single vertex is treated as a
/// degenerate segment.
pub fn distance_to_polyline(point: (f32, f32), polyline: &[(f32, f32)]) -> f32 {
    match polyline {
        [] => f32::MAX,
        [only] => distance_to_line_segment_sq(point, *only, *only).sqrt(),
        _ => polyline
            .windows(2)
            .map(|w| distance_to_line_segment_sq(point, w[0], w[1]))
            .fold(f32::MAX, f32::min)
            .sqrt(),
    }
}
