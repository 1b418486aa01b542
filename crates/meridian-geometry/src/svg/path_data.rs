//! The `d` attribute of `<path>`.

use glam::Vec2;

use super::arc::append_arc;
use super::numbers::{ARC_FLAGS, parse_floats};
use crate::error::NumberSyntaxError;
use crate::shape_path::ShapePath;

/// Split path data into `(command, arguments)` pairs.
///
/// Any ASCII letter except `e`/`E` starts a command. Text before the first
/// command is ignored.
fn split_commands(d: &str) -> Vec<(char, &str)> {
    let mut commands = Vec::new();
    let mut current: Option<(char, usize)> = None;

    for (index, c) in d.char_indices() {
        if c.is_ascii_alphabetic() && c != 'e' && c != 'E' {
            if let Some((command, start)) = current {
                commands.push((command, d[start..index].trim()));
            }
            current = Some((c, index + c.len_utf8()));
        }
    }
    if let Some((command, start)) = current {
        commands.push((command, d[start..].trim()));
    }

    commands
}

/// Mirror `control` through `point`.
fn reflect(point: Vec2, control: Vec2) -> Vec2 {
    point - (control - point)
}

/// Pen state while interpreting path commands.
struct Cursor {
    point: Vec2,
    /// Last control point, used by the smooth curve commands.
    control: Vec2,
    /// Start of the current subpath, restored by `Z`.
    first: Vec2,
}

/// Interpret SVG path data into a [`ShapePath`].
///
/// Returns `Ok(None)` for empty data and `none`. Unknown commands are skipped
/// with a warning.
pub fn parse_path_data(d: &str) -> Result<Option<ShapePath>, NumberSyntaxError> {
    let d = d.trim();
    if d.is_empty() || d == "none" {
        return Ok(None);
    }

    let mut path = ShapePath::new();
    let mut cur = Cursor {
        point: Vec2::ZERO,
        control: Vec2::ZERO,
        first: Vec2::ZERO,
    };
    let mut is_first_point = true;

    for (command, data) in split_commands(d) {
        let set_first = is_first_point;
        is_first_point = false;

        match command {
            'M' | 'm' => {
                let numbers = parse_floats(data, None)?;
                for (j, pair) in numbers.chunks_exact(2).enumerate() {
                    let value = Vec2::new(pair[0], pair[1]);
                    cur.point = if command == 'M' { value } else { cur.point + value };
                    cur.control = cur.point;
                    if j == 0 {
                        path.move_to(cur.point);
                        cur.first = cur.point;
                    } else {
                        path.line_to(cur.point);
                    }
                }
            }
            'H' | 'h' => {
                let numbers = parse_floats(data, None)?;
                for (j, x) in numbers.iter().enumerate() {
                    cur.point.x = if command == 'H' { *x } else { cur.point.x + x };
                    cur.control = cur.point;
                    path.line_to(cur.point);
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'V' | 'v' => {
                let numbers = parse_floats(data, None)?;
                for (j, y) in numbers.iter().enumerate() {
                    cur.point.y = if command == 'V' { *y } else { cur.point.y + y };
                    cur.control = cur.point;
                    path.line_to(cur.point);
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'L' | 'l' => {
                let numbers = parse_floats(data, None)?;
                for (j, pair) in numbers.chunks_exact(2).enumerate() {
                    let value = Vec2::new(pair[0], pair[1]);
                    cur.point = if command == 'L' { value } else { cur.point + value };
                    cur.control = cur.point;
                    path.line_to(cur.point);
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'C' | 'c' => {
                let numbers = parse_floats(data, None)?;
                for (j, n) in numbers.chunks_exact(6).enumerate() {
                    let base = if command == 'C' { Vec2::ZERO } else { cur.point };
                    let c1 = base + Vec2::new(n[0], n[1]);
                    let c2 = base + Vec2::new(n[2], n[3]);
                    let end = base + Vec2::new(n[4], n[5]);
                    path.bezier_curve_to(c1, c2, end);
                    cur.control = c2;
                    cur.point = end;
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'S' | 's' => {
                let numbers = parse_floats(data, None)?;
                for (j, n) in numbers.chunks_exact(4).enumerate() {
                    let base = if command == 'S' { Vec2::ZERO } else { cur.point };
                    let c1 = reflect(cur.point, cur.control);
                    let c2 = base + Vec2::new(n[0], n[1]);
                    let end = base + Vec2::new(n[2], n[3]);
                    path.bezier_curve_to(c1, c2, end);
                    cur.control = c2;
                    cur.point = end;
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'Q' | 'q' => {
                let numbers = parse_floats(data, None)?;
                for (j, n) in numbers.chunks_exact(4).enumerate() {
                    let base = if command == 'Q' { Vec2::ZERO } else { cur.point };
                    let control = base + Vec2::new(n[0], n[1]);
                    let end = base + Vec2::new(n[2], n[3]);
                    path.quadratic_curve_to(control, end);
                    cur.control = control;
                    cur.point = end;
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'T' | 't' => {
                let numbers = parse_floats(data, None)?;
                for (j, n) in numbers.chunks_exact(2).enumerate() {
                    let base = if command == 'T' { Vec2::ZERO } else { cur.point };
                    let control = reflect(cur.point, cur.control);
                    let end = base + Vec2::new(n[0], n[1]);
                    path.quadratic_curve_to(control, end);
                    cur.control = control;
                    cur.point = end;
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'A' | 'a' => {
                let numbers = parse_floats(data, Some(ARC_FLAGS))?;
                for (j, n) in numbers.chunks_exact(7).enumerate() {
                    let target = Vec2::new(n[5], n[6]);
                    let end = if command == 'A' { target } else { cur.point + target };
                    // Zero-length arcs are dropped.
                    if end == cur.point {
                        continue;
                    }
                    let start = cur.point;
                    cur.point = end;
                    cur.control = end;
                    append_arc(
                        path.current_path(),
                        Vec2::new(n[0], n[1]),
                        n[2],
                        n[3] != 0.0,
                        n[4] != 0.0,
                        start,
                        end,
                    );
                    if j == 0 && set_first {
                        cur.first = cur.point;
                    }
                }
            }
            'Z' | 'z' => {
                let current = path.current_path();
                current.auto_close = true;
                if !current.curves.is_empty() {
                    cur.point = cur.first;
                    current.current_point = cur.point;
                    is_first_point = true;
                }
            }
            other => {
                tracing::warn!("Unsupported path command '{}', skipping", other);
            }
        }
    }

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::Curve;

    fn points(path: &ShapePath, index: usize) -> Vec<Vec2> {
        path.subpaths[index].points(12)
    }

    #[test]
    fn test_split_commands() {
        let commands = split_commands("M1e2 2L3,4 z");
        assert_eq!(commands, vec![('M', "1e2 2"), ('L', "3,4"), ('z', "")]);
    }

    #[test]
    fn test_empty_and_none() {
        assert!(parse_path_data("").unwrap().is_none());
        assert!(parse_path_data("none").unwrap().is_none());
    }

    #[test]
    fn test_absolute_and_relative_lines() {
        let path = parse_path_data("M10 10 h5 v5 H10 Z").unwrap().unwrap();
        assert_eq!(
            points(&path, 0),
            vec![
                Vec2::new(10.0, 10.0),
                Vec2::new(15.0, 10.0),
                Vec2::new(15.0, 15.0),
                Vec2::new(10.0, 15.0),
                Vec2::new(10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_extra_move_pairs_are_lines() {
        let path = parse_path_data("m1 1 2 0 0 2").unwrap().unwrap();
        assert_eq!(path.subpaths.len(), 1);
        assert_eq!(
            points(&path, 0),
            vec![Vec2::new(1.0, 1.0), Vec2::new(3.0, 1.0), Vec2::new(3.0, 3.0)]
        );
    }

    #[test]
    fn test_close_returns_to_subpath_start() {
        let path = parse_path_data("M0 0 L10 0 L10 10 z l5 0").unwrap().unwrap();
        let last = path.subpaths[0].curves.last().copied().unwrap();
        match last {
            Curve::Line(line) => {
                assert_eq!(line.from, Vec2::ZERO);
                assert_eq!(line.to, Vec2::new(5.0, 0.0));
            }
            other => panic!("expected a line, got {:?}", other),
        }
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let path = parse_path_data("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap().unwrap();
        match path.subpaths[0].curves[1] {
            Curve::Cubic(c) => {
                assert_eq!(c.from, Vec2::new(10.0, 0.0));
                assert_eq!(c.control1, Vec2::new(10.0, -10.0));
                assert_eq!(c.control2, Vec2::new(20.0, -10.0));
            }
            other => panic!("expected a cubic, got {:?}", other),
        }
    }

    #[test]
    fn test_smooth_quadratic_chain() {
        let path = parse_path_data("M0 0 Q5 5 10 0 t10 0").unwrap().unwrap();
        match path.subpaths[0].curves[1] {
            Curve::Quadratic(q) => {
                assert_eq!(q.control, Vec2::new(15.0, -5.0));
                assert_eq!(q.to, Vec2::new(20.0, 0.0));
            }
            other => panic!("expected a quadratic, got {:?}", other),
        }
    }

    #[test]
    fn test_arc_command() {
        let path = parse_path_data("M0 0 A5 5 0 0 1 10 0").unwrap().unwrap();
        let points = points(&path, 0);
        assert!(points.last().unwrap().distance(Vec2::new(10.0, 0.0)) < 1e-4);
        assert!(points.iter().all(|p| (p.distance(Vec2::new(5.0, 0.0)) - 5.0).abs() < 1e-3));
    }

    #[test]
    fn test_zero_length_arc_skipped() {
        let path = parse_path_data("M3 3 a5 5 0 0 1 0 0").unwrap().unwrap();
        assert!(path.subpaths[0].curves.is_empty());
    }

    #[test]
    fn test_commands_before_move_start_at_origin() {
        let path = parse_path_data("L4 0").unwrap().unwrap();
        assert_eq!(points(&path, 0), vec![Vec2::ZERO, Vec2::new(4.0, 0.0)]);
    }

    #[test]
    fn test_unknown_command_is_skipped() {
        let path = parse_path_data("M0 0 X 1 2 L3 3").unwrap().unwrap();
        assert_eq!(points(&path, 0), vec![Vec2::ZERO, Vec2::new(3.0, 3.0)]);
    }

    #[test]
    fn test_malformed_numbers_fail() {
        let err = parse_path_data("M1..2 3").unwrap_err();
        assert_eq!(err.character, '.');
        assert!(err.partial.is_empty());
    }
}
