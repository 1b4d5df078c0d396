use glam::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

/// Resting height of the player's reference point.
pub const GROUND_HEIGHT: f32 = 2.0;
/// Highest point of a jump.
pub const JUMP_PEAK: f32 = 2.8;
/// Vertical distance covered per tick while jumping.
pub const JUMP_STEP: f32 = 0.2;
/// Vertical distance lost per tick while falling into a pit.
pub const FALL_STEP: f32 = 0.5;

/// Spawn point in the south-west corner of the board.
pub const START_POSITION: Vec3 = Vec3::new(-7.0, GROUND_HEIGHT, 6.0);

/// Compass direction the player block faces. North is towards -z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// Absolute yaw, in degrees, of a block facing this way.
    pub fn heading_degrees(self) -> f32 {
        match self {
            Facing::East => 0.0,
            Facing::North => 90.0,
            Facing::West => 180.0,
            Facing::South => -90.0,
        }
    }

    /// Rotation, in degrees, needed to turn from `self` to `next`.
    ///
    /// Facing changes in every view. Only the adventure view used to turn the
    /// block, so the half-turns and the turns outside that view have no older
    /// behaviour to follow; they rotate by the shortest table entry here.
    pub fn turn_to(self, next: Facing) -> f32 {
        use Facing::*;
        match (self, next) {
            (East, North) | (North, West) | (West, South) | (South, East) => 90.0,
            (East, South) | (South, West) | (West, North) | (North, East) => -90.0,
            (East, West) | (West, East) | (North, South) | (South, North) => 180.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpState {
    Grounded,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Vec3,
    facing: Facing,
    heading: f32,
    jump: JumpState,
    falling: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::at(START_POSITION)
    }
}

impl Player {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            facing: Facing::East,
            heading: Facing::East.heading_degrees(),
            jump: JumpState::Grounded,
            falling: false,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Yaw used to rotate the player mesh, kept in (-180, 180].
    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn jump_state(&self) -> JumpState {
        self.jump
    }

    pub fn is_jumping(&self) -> bool {
        self.jump != JumpState::Grounded
    }

    pub fn is_falling(&self) -> bool {
        self.falling
    }

    pub fn face(&mut self, next: Facing) {
        if next == self.facing {
            return;
        }
        self.heading = normalize_degrees(self.heading + self.facing.turn_to(next));
        self.facing = next;
    }

    /// Starts a jump if the player stands on solid ground.
    pub fn start_jump(&mut self) -> bool {
        if self.jump != JumpState::Grounded || self.falling {
            return false;
        }
        debug!("jump from ({:.2}, {:.2})", self.position.x, self.position.z);
        self.jump = JumpState::Ascending;
        true
    }

    /// Advances the jump arc by one tick. No-op while grounded.
    pub fn advance_jump(&mut self) {
        match self.jump {
            JumpState::Grounded => {}
            JumpState::Ascending => {
                self.position.y = (self.position.y + JUMP_STEP).min(JUMP_PEAK);
                if self.position.y >= JUMP_PEAK {
                    self.jump = JumpState::Descending;
                }
            }
            JumpState::Descending => {
                self.position.y = (self.position.y - JUMP_STEP).max(GROUND_HEIGHT);
                if self.position.y <= GROUND_HEIGHT {
                    self.jump = JumpState::Grounded;
                }
            }
        }
    }

    /// Sinks one step into a pit and cancels any jump. Returns true once the
    /// player has dropped out of the world.
    pub fn sink(&mut self) -> bool {
        if !self.falling {
            debug!("fell into pit at ({:.2}, {:.2})", self.position.x, self.position.z);
        }
        self.falling = true;
        self.jump = JumpState::Grounded;
        self.position.y -= FALL_STEP;
        self.position.y <= 0.0
    }
}

fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_tracks_facing_through_turns() {
        let mut player = Player::default();
        let turns = [
            Facing::North,
            Facing::West,
            Facing::South,
            Facing::East,
            Facing::West,
            Facing::North,
            Facing::South,
        ];
        for facing in turns {
            player.face(facing);
            let expected = normalize_degrees(facing.heading_degrees());
            assert!(
                (player.heading() - expected).abs() < 1e-4,
                "{facing:?}: {} vs {expected}",
                player.heading()
            );
        }
    }

    #[test]
    fn half_turns_rotate_by_180() {
        assert_eq!(Facing::North.turn_to(Facing::South), 180.0);
        assert_eq!(Facing::West.turn_to(Facing::East), 180.0);
    }

    #[test]
    fn turning_to_same_facing_is_free() {
        for facing in [Facing::North, Facing::South, Facing::East, Facing::West] {
            assert_eq!(facing.turn_to(facing), 0.0);
        }
    }

    #[test]
    fn jump_rises_then_falls_back_to_ground() {
        let mut player = Player::default();
        assert!(player.start_jump());
        let mut previous = player.position.y;
        let mut ticks = 0;
        while player.jump_state() == JumpState::Ascending {
            player.advance_jump();
            assert!(player.position.y > previous);
            previous = player.position.y;
            ticks += 1;
            assert!(ticks < 10);
        }
        assert!((player.position.y - JUMP_PEAK).abs() < 1e-6);
        while player.jump_state() == JumpState::Descending {
            player.advance_jump();
            assert!(player.position.y < previous);
            previous = player.position.y;
            ticks += 1;
            assert!(ticks < 20);
        }
        assert_eq!(player.jump_state(), JumpState::Grounded);
        assert_eq!(player.position.y, GROUND_HEIGHT);
    }

    #[test]
    fn cannot_jump_twice_or_while_falling() {
        let mut player = Player::default();
        assert!(player.start_jump());
        assert!(!player.start_jump());

        let mut faller = Player::default();
        faller.sink();
        assert!(!faller.start_jump());
    }

    #[test]
    fn sinking_cancels_jump_and_eventually_drops_out() {
        let mut player = Player::default();
        player.start_jump();
        player.advance_jump();
        assert!(!player.sink());
        assert_eq!(player.jump_state(), JumpState::Grounded);
        let mut ticks = 1;
        while !player.sink() {
            ticks += 1;
            assert!(ticks < 10);
        }
        assert!(player.position.y <= 0.0);
    }
}
