use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::input::LookIntent;

/// Camera configuration selected with the digit keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Fixed overview used before any view has been picked.
    #[default]
    Default,
    Adventure,
    FollowTop,
    Isometric,
    TopDown,
    FreeZoom,
}

impl ViewMode {
    pub fn from_digit(digit: u8) -> Option<Self> {
        Some(match digit {
            1 => ViewMode::Adventure,
            2 => ViewMode::FollowTop,
            3 => ViewMode::Isometric,
            4 => ViewMode::TopDown,
            5 => ViewMode::FreeZoom,
            _ => return None,
        })
    }

    /// Orthographic volume for this mode. Only the free camera honours `zoom`.
    pub fn bounds(self, zoom: f32) -> OrthoBounds {
        match self {
            ViewMode::Adventure | ViewMode::FollowTop => FOLLOW_BOUNDS,
            ViewMode::Isometric => ISOMETRIC_BOUNDS,
            ViewMode::TopDown | ViewMode::Default => BASE_BOUNDS,
            ViewMode::FreeZoom => BASE_BOUNDS.scaled(zoom),
        }
    }
}

/// Symmetric orthographic projection volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    pub half_width: f32,
    pub half_height: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBounds {
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            half_width: self.half_width * factor,
            half_height: self.half_height * factor,
            ..self
        }
    }

    pub fn projection(self) -> Mat4 {
        Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            self.near,
            self.far,
        )
    }
}

/// Whole-board volume; also what a window resize falls back to.
pub const BASE_BOUNDS: OrthoBounds = OrthoBounds {
    half_width: 16.0,
    half_height: 9.0,
    near: 0.1,
    far: 500.0,
};

const FOLLOW_BOUNDS: OrthoBounds = OrthoBounds {
    half_width: 4.0,
    half_height: 2.25,
    near: 0.0,
    far: 500.0,
};

const ISOMETRIC_BOUNDS: OrthoBounds = OrthoBounds {
    half_width: 12.0,
    half_height: 7.0,
    near: 0.1,
    far: 500.0,
};

/// Camera matrices for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    pub projection: Mat4,
    pub view: Mat4,
    pub position: Vec3,
}

impl CameraParams {
    pub fn view_proj(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Free-camera state that is not derived from the player.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    viewport: (u32, u32),
    /// Helicopter yaw in degrees, steered with W/E.
    pub angle_xz: f32,
    /// Helicopter height, steered with A/D.
    pub height: f32,
}

impl CameraRig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: (width.max(1), height.max(1)),
            angle_xz: 90.0,
            height: 5.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Applies the held look keys. The projection does not read these values.
    pub fn steer(&mut self, look: LookIntent) {
        if look.left {
            self.angle_xz += 1.0;
        }
        if look.right {
            self.angle_xz -= 1.0;
        }
        if look.down {
            self.height -= 0.2;
        }
        if look.up {
            self.height += 0.2;
        }
    }

    /// Maps a cursor pixel position onto the free camera's eye plane.
    pub fn cursor_to_eye(&self, cursor: Vec2) -> Vec2 {
        let (width, height) = self.viewport;
        let x = -77.0 + 154.0 / width as f32 * cursor.x;
        let y = -40.0 + 80.0 / height as f32 * cursor.y;
        Vec2::new(x, -y)
    }

    /// Derives the view and projection for `mode`.
    pub fn camera(&self, mode: ViewMode, player: Vec3, cursor: Vec2, zoom: f32) -> CameraParams {
        let (eye, target, up) = match mode {
            ViewMode::Adventure => (
                Vec3::new(player.x, 5.0, player.z),
                Vec3::new(player.x + 8.0, -2.0, player.z - 8.0),
                Vec3::Y,
            ),
            ViewMode::FollowTop => (
                Vec3::new(player.x, 2.0, player.z + 2.0),
                Vec3::new(player.x, 1.0, player.z),
                Vec3::Y,
            ),
            ViewMode::Isometric => (Vec3::new(6.0, 10.0, 6.0), Vec3::ZERO, Vec3::Y),
            ViewMode::TopDown => (Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO, Vec3::NEG_Z),
            ViewMode::FreeZoom => {
                let eye = self.cursor_to_eye(cursor);
                (eye.extend(10.0), Vec3::ZERO, Vec3::Y)
            }
            ViewMode::Default => (Vec3::new(10.0, 5.0, 10.0), Vec3::ZERO, Vec3::Y),
        };
        CameraParams {
            projection: mode.bounds(zoom).projection(),
            view: Mat4::look_at_rh(eye, target, up),
            position: eye,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finite(matrix: Mat4) -> bool {
        matrix.to_cols_array().iter().all(|v| v.is_finite())
    }

    #[test]
    fn every_mode_yields_finite_matrices() {
        let rig = CameraRig::new(1600, 900);
        let player = Vec3::new(-7.0, 2.0, 6.0);
        for mode in [
            ViewMode::Default,
            ViewMode::Adventure,
            ViewMode::FollowTop,
            ViewMode::Isometric,
            ViewMode::TopDown,
            ViewMode::FreeZoom,
        ] {
            let camera = rig.camera(mode, player, Vec2::new(800.0, 450.0), 1.0);
            assert!(finite(camera.view_proj()), "{mode:?}");
        }
    }

    #[test]
    fn follow_cameras_track_the_player() {
        let rig = CameraRig::new(1600, 900);
        let a = rig.camera(ViewMode::FollowTop, Vec3::new(0.0, 2.0, 0.0), Vec2::ZERO, 1.0);
        let b = rig.camera(ViewMode::FollowTop, Vec3::new(3.0, 2.0, -1.0), Vec2::ZERO, 1.0);
        assert_eq!(b.position - a.position, Vec3::new(3.0, 0.0, -1.0));

        let adventure = rig.camera(ViewMode::Adventure, Vec3::new(1.0, 2.0, 1.0), Vec2::ZERO, 1.0);
        assert_eq!(adventure.position, Vec3::new(1.0, 5.0, 1.0));
    }

    #[test]
    fn fixed_cameras_ignore_the_player() {
        let rig = CameraRig::new(1600, 900);
        for mode in [ViewMode::Isometric, ViewMode::TopDown, ViewMode::Default] {
            let a = rig.camera(mode, Vec3::new(-7.0, 2.0, 6.0), Vec2::ZERO, 1.0);
            let b = rig.camera(mode, Vec3::new(4.0, 2.0, -3.0), Vec2::ZERO, 1.0);
            assert_eq!(a, b, "{mode:?}");
        }
    }

    #[test]
    fn free_zoom_at_unit_zoom_matches_base_bounds() {
        assert_eq!(ViewMode::FreeZoom.bounds(1.0), BASE_BOUNDS);
        let zoomed = ViewMode::FreeZoom.bounds(2.0);
        assert_eq!(zoomed.half_width, 32.0);
        assert_eq!(zoomed.half_height, 18.0);
        assert_eq!(ViewMode::Isometric.bounds(2.0), ISOMETRIC_BOUNDS);
    }

    #[test]
    fn cursor_maps_window_corners_to_eye_plane() {
        let rig = CameraRig::new(1600, 900);
        let cases = [
            (Vec2::ZERO, Vec2::new(-77.0, 40.0)),
            (Vec2::new(800.0, 450.0), Vec2::ZERO),
            (Vec2::new(1600.0, 900.0), Vec2::new(77.0, -40.0)),
        ];
        for (cursor, expected) in cases {
            let eye = rig.cursor_to_eye(cursor);
            assert!(eye.abs_diff_eq(expected, 1e-3), "{cursor} -> {eye}");
        }
    }

    #[test]
    fn look_keys_steer_the_rig() {
        let mut rig = CameraRig::new(1600, 900);
        rig.steer(LookIntent {
            left: true,
            up: true,
            ..LookIntent::default()
        });
        assert_eq!(rig.angle_xz, 91.0);
        assert!((rig.height - 5.2).abs() < 1e-6);
    }

    #[test]
    fn digits_map_to_modes() {
        assert_eq!(ViewMode::from_digit(1), Some(ViewMode::Adventure));
        assert_eq!(ViewMode::from_digit(5), Some(ViewMode::FreeZoom));
        assert_eq!(ViewMode::from_digit(0), None);
    }
}
