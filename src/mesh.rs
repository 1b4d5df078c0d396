use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Floats per vertex: `position.xyz`, `normal.xyz`, `color.rgb`.
pub const FLOATS_PER_VERTEX: usize = 9;

/// GPU ready mesh with interleaved vertices and triangle indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / FLOATS_PER_VERTEX
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * FLOATS_PER_VERTEX;
        Vec3::from_slice(&self.vertices[base..base + 3])
    }
}

/// Face order used by [`cuboid`]: +z, -z, -x, +x, -y, +y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceColors {
    pub front: Vec3,
    pub back: Vec3,
    pub left: Vec3,
    pub right: Vec3,
    pub bottom: Vec3,
    pub top: Vec3,
}

impl FaceColors {
    pub const fn uniform(color: Vec3) -> Self {
        Self {
            front: color,
            back: color,
            left: color,
            right: color,
            bottom: color,
            top: color,
        }
    }

    fn in_order(&self) -> [Vec3; 6] {
        [
            self.front,
            self.back,
            self.left,
            self.right,
            self.bottom,
            self.top,
        ]
    }
}

// Unit cube corners and normals, four per face, in `FaceColors` order.
#[rustfmt::skip]
const UNIT_CUBE: [[f32; 6]; 24] = [
    [-0.5, -0.5,  0.5,  0.0,  0.0,  1.0], [ 0.5, -0.5,  0.5,  0.0,  0.0,  1.0],
    [ 0.5,  0.5,  0.5,  0.0,  0.0,  1.0], [-0.5,  0.5,  0.5,  0.0,  0.0,  1.0],
    [-0.5, -0.5, -0.5,  0.0,  0.0, -1.0], [ 0.5, -0.5, -0.5,  0.0,  0.0, -1.0],
    [ 0.5,  0.5, -0.5,  0.0,  0.0, -1.0], [-0.5,  0.5, -0.5,  0.0,  0.0, -1.0],
    [-0.5, -0.5, -0.5, -1.0,  0.0,  0.0], [-0.5, -0.5,  0.5, -1.0,  0.0,  0.0],
    [-0.5,  0.5,  0.5, -1.0,  0.0,  0.0], [-0.5,  0.5, -0.5, -1.0,  0.0,  0.0],
    [ 0.5, -0.5, -0.5,  1.0,  0.0,  0.0], [ 0.5, -0.5,  0.5,  1.0,  0.0,  0.0],
    [ 0.5,  0.5,  0.5,  1.0,  0.0,  0.0], [ 0.5,  0.5, -0.5,  1.0,  0.0,  0.0],
    [-0.5, -0.5, -0.5,  0.0, -1.0,  0.0], [ 0.5, -0.5, -0.5,  0.0, -1.0,  0.0],
    [ 0.5, -0.5,  0.5,  0.0, -1.0,  0.0], [-0.5, -0.5,  0.5,  0.0, -1.0,  0.0],
    [-0.5,  0.5, -0.5,  0.0,  1.0,  0.0], [ 0.5,  0.5, -0.5,  0.0,  1.0,  0.0],
    [ 0.5,  0.5,  0.5,  0.0,  1.0,  0.0], [-0.5,  0.5,  0.5,  0.0,  1.0,  0.0],
];

#[rustfmt::skip]
const UNIT_CUBE_INDICES: [u32; 36] = [
    0, 1, 2, 0, 2, 3, // front
    4, 6, 5, 4, 7, 6, // back
    8, 9, 10, 8, 10, 11, // left
    12, 14, 13, 12, 15, 14, // right
    16, 18, 17, 16, 19, 18, // bottom
    20, 21, 22, 20, 22, 23, // top
];

/// Builds a square-footed box with its top face at y = 0.
///
/// The footprint spans `[-half_width, half_width]` on x and z and the box
/// hangs down to `y = -height`.
pub fn cuboid(half_width: f32, height: f32, colors: FaceColors) -> Mesh {
    let faces = colors.in_order();
    let mut vertices = Vec::with_capacity(UNIT_CUBE.len() * FLOATS_PER_VERTEX);
    for (index, corner) in UNIT_CUBE.iter().enumerate() {
        let color = faces[index / 4];
        vertices.extend_from_slice(&[
            corner[0] * 2.0 * half_width,
            (corner[1] - 0.5) * height,
            corner[2] * 2.0 * half_width,
            corner[3],
            corner[4],
            corner[5],
            color.x,
            color.y,
            color.z,
        ]);
    }
    Mesh {
        vertices,
        indices: UNIT_CUBE_INDICES.to_vec(),
    }
}

/// The handful of meshes the game draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshKind {
    Tile,
    GoalTile,
    Obstacle,
    Player,
}

const TILE_SIDE: Vec3 = Vec3::new(0.3, 0.3, 0.3);
const TILE_BOTTOM: Vec3 = Vec3::new(0.15, 0.15, 0.15);

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Tile,
        MeshKind::GoalTile,
        MeshKind::Obstacle,
        MeshKind::Player,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MeshKind::Tile => "tile",
            MeshKind::GoalTile => "goal-tile",
            MeshKind::Obstacle => "obstacle",
            MeshKind::Player => "player",
        }
    }

    pub fn build(self) -> Mesh {
        match self {
            MeshKind::Tile => cuboid(
                0.5,
                2.0,
                FaceColors {
                    top: Vec3::new(0.8, 0.1, 0.1),
                    bottom: TILE_BOTTOM,
                    ..FaceColors::uniform(TILE_SIDE)
                },
            ),
            MeshKind::GoalTile => cuboid(
                0.5,
                2.0,
                FaceColors {
                    top: Vec3::new(0.6, 0.0, 0.6),
                    bottom: TILE_BOTTOM,
                    ..FaceColors::uniform(TILE_SIDE)
                },
            ),
            MeshKind::Obstacle => cuboid(0.25, 0.5, FaceColors::uniform(Vec3::ONE)),
            MeshKind::Player => cuboid(
                0.25,
                1.0,
                FaceColors {
                    right: Vec3::new(0.0, 0.2, 0.4),
                    bottom: Vec3::new(0.0, 0.2, 0.4),
                    ..FaceColors::uniform(Vec3::new(0.0, 1.0, 0.0))
                },
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(mesh: &Mesh) -> (Vec3, Vec3) {
        (0..mesh.vertex_count()).map(|i| mesh.position(i)).fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), p| (min.min(p), max.max(p)),
        )
    }

    #[test]
    fn cuboid_spans_requested_box() {
        let mesh = cuboid(0.25, 1.0, FaceColors::uniform(Vec3::ONE));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let (min, max) = extent(&mesh);
        assert_eq!(min, Vec3::new(-0.25, -1.0, -0.25));
        assert_eq!(max, Vec3::new(0.25, 0.0, 0.25));
    }

    #[test]
    fn indices_stay_in_range() {
        for kind in MeshKind::ALL {
            let mesh = kind.build();
            assert!(mesh
                .indices
                .iter()
                .all(|&index| (index as usize) < mesh.vertex_count()));
        }
    }

    #[test]
    fn top_face_carries_its_own_color() {
        let top = Vec3::new(0.1, 0.2, 0.3);
        let mesh = cuboid(
            0.5,
            2.0,
            FaceColors {
                top,
                ..FaceColors::uniform(Vec3::ZERO)
            },
        );
        for vertex in mesh.vertices.chunks(FLOATS_PER_VERTEX) {
            let normal = Vec3::from_slice(&vertex[3..6]);
            let color = Vec3::from_slice(&vertex[6..9]);
            if normal == Vec3::Y {
                assert_eq!(color, top);
                assert_eq!(vertex[1], 0.0);
            } else {
                assert_eq!(color, Vec3::ZERO);
            }
        }
    }

    #[test]
    fn tiles_are_one_unit_wide() {
        let (min, max) = extent(&MeshKind::Tile.build());
        assert_eq!(max.x - min.x, 1.0);
        assert_eq!(min.y, -2.0);
    }
}
