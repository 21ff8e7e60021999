//! Pieces module - tetromino shapes and clockwise rotation with kicks
//!
//! Shapes live in a 4x4 box per rotation. Rotation tries a short fixed list of
//! offsets and keeps the first one where every mino fits.

use crate::types::Rgb;

/// The 7 tetromino kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::S => "S",
            PieceKind::Z => "Z",
            PieceKind::J => "J",
            PieceKind::L => "L",
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            PieceKind::I => Rgb::new(0, 240, 240),
            PieceKind::O => Rgb::new(240, 240, 0),
            PieceKind::T => Rgb::new(160, 0, 240),
            PieceKind::S => Rgb::new(0, 240, 0),
            PieceKind::Z => Rgb::new(240, 0, 0),
            PieceKind::J => Rgb::new(0, 80, 240),
            PieceKind::L => Rgb::new(240, 160, 0),
        }
    }
}

/// Rotation state, clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    pub fn rotate_cw(self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }
}

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Offsets tried in order when a rotation collides; `(0, -1)` nudges up one row.
pub const KICKS: [(i8, i8); 6] = [(0, 0), (-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1)];

/// Spawn position for new pieces (x, y)
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    use Rotation::*;
    match (kind, rotation) {
        (PieceKind::I, North) => [(0, 1), (1, 1), (2, 1), (3, 1)],
        (PieceKind::I, East) => [(2, 0), (2, 1), (2, 2), (2, 3)],
        (PieceKind::I, South) => [(0, 2), (1, 2), (2, 2), (3, 2)],
        (PieceKind::I, West) => [(1, 0), (1, 1), (1, 2), (1, 3)],

        (PieceKind::O, _) => [(1, 0), (2, 0), (1, 1), (2, 1)],

        (PieceKind::T, North) => [(1, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::T, East) => [(1, 0), (1, 1), (2, 1), (1, 2)],
        (PieceKind::T, South) => [(0, 1), (1, 1), (2, 1), (1, 2)],
        (PieceKind::T, West) => [(1, 0), (0, 1), (1, 1), (1, 2)],

        (PieceKind::S, North) => [(1, 0), (2, 0), (0, 1), (1, 1)],
        (PieceKind::S, East) => [(1, 0), (1, 1), (2, 1), (2, 2)],
        (PieceKind::S, South) => [(1, 1), (2, 1), (0, 2), (1, 2)],
        (PieceKind::S, West) => [(0, 0), (0, 1), (1, 1), (1, 2)],

        (PieceKind::Z, North) => [(0, 0), (1, 0), (1, 1), (2, 1)],
        (PieceKind::Z, East) => [(2, 0), (1, 1), (2, 1), (1, 2)],
        (PieceKind::Z, South) => [(0, 1), (1, 1), (1, 2), (2, 2)],
        (PieceKind::Z, West) => [(1, 0), (0, 1), (1, 1), (0, 2)],

        (PieceKind::J, North) => [(0, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::J, East) => [(1, 0), (2, 0), (1, 1), (1, 2)],
        (PieceKind::J, South) => [(0, 1), (1, 1), (2, 1), (2, 2)],
        (PieceKind::J, West) => [(1, 0), (1, 1), (0, 2), (1, 2)],

        (PieceKind::L, North) => [(2, 0), (0, 1), (1, 1), (2, 1)],
        (PieceKind::L, East) => [(1, 0), (1, 1), (1, 2), (2, 2)],
        (PieceKind::L, South) => [(0, 1), (1, 1), (2, 1), (0, 2)],
        (PieceKind::L, West) => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Try to rotate clockwise, searching [`KICKS`].
///
/// Returns the new rotation and the kick offset that fit, or `None` if every
/// offset collides.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    is_valid: impl Fn(i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let new_rotation = rotation.rotate_cw();
    let new_shape = shape(kind, new_rotation);

    KICKS
        .iter()
        .copied()
        .find(|&(dx, dy)| {
            new_shape
                .iter()
                .all(|&(mx, my)| is_valid(x + dx + mx, y + dy + my))
        })
        .map(|kick| (new_rotation, kick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_rotations_return_to_north() {
        let mut r = Rotation::North;
        for _ in 0..4 {
            r = r.rotate_cw();
        }
        assert_eq!(r, Rotation::North);
    }

    #[test]
    fn test_every_shape_has_four_distinct_minos_in_box() {
        for kind in PieceKind::ALL {
            let mut r = Rotation::North;
            for _ in 0..4 {
                let s = shape(kind, r);
                for (i, a) in s.iter().enumerate() {
                    assert!((0..4).contains(&a.0) && (0..4).contains(&a.1));
                    assert!(s[i + 1..].iter().all(|b| b != a));
                }
                r = r.rotate_cw();
            }
        }
    }

    #[test]
    fn test_rotation_uses_first_fitting_kick() {
        // Open field: no kick needed.
        let rotated = try_rotate(PieceKind::T, Rotation::North, 3, 0, |_, _| true);
        assert_eq!(rotated, Some((Rotation::East, (0, 0))));

        // Column 5 blocked: T East at x=3 uses columns 4..5, so the piece must shift left.
        let rotated = try_rotate(PieceKind::T, Rotation::North, 3, 5, |x, _| x != 5);
        assert_eq!(rotated, Some((Rotation::East, (-1, 0))));
    }

    #[test]
    fn test_rotation_fails_when_boxed_in() {
        assert_eq!(
            try_rotate(PieceKind::I, Rotation::North, 3, 0, |_, _| false),
            None
        );
    }
}
