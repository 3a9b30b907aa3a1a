//! Bounded back-and-forth motion of each flag's depth.

use crate::scene::flag::{Direction, Flag, FlagGroup};

/// Upper depth bound; a flag beyond it turns backward
pub const MAX_Z: f32 = 0.3;
/// Lower depth bound; a flag beyond it turns forward
pub const MIN_Z: f32 = 0.0;

/// Velocities below zero or NaN move nothing
pub fn clamp_velocity(velocity: f32) -> f32 {
    if velocity.is_nan() {
        0.0
    } else {
        velocity.max(0.0)
    }
}

fn turn_at_bounds(flag: &mut Flag) {
    let z = flag.position.z;
    if z > MAX_Z {
        flag.direction = Direction::Backward;
    } else if z < MIN_Z {
        flag.direction = Direction::Forward;
    }
}

/// Advance one flag by a single step.
///
/// Bounds are checked before the move only, so a flag that crosses a bound
/// is drawn beyond it for one frame and turns on the following step.
pub fn step_flag(flag: &mut Flag, velocity: f32) {
    turn_at_bounds(flag);
    flag.position.z += flag.direction.sign() * velocity;
}

/// Advance every flag of the group. Returns the number of flags moved.
pub fn step(group: &mut FlagGroup, velocity: f32) -> usize {
    let velocity = clamp_velocity(velocity);
    for flag in group.flags_mut() {
        step_flag(flag, velocity);
    }
    group.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::MeshData;
    use glam::Vec3;

    fn flag_at(z: f32) -> Flag {
        Flag::new("f".into(), MeshData::default(), Vec3::new(0.0, 0.0, z), z)
    }

    #[test]
    fn test_flip_is_seen_one_step_late() {
        let mut f = flag_at(0.29);
        step_flag(&mut f, 0.02);
        assert!((f.z() - 0.31).abs() < 1e-6);
        assert_eq!(f.direction, Direction::Forward);

        step_flag(&mut f, 0.02);
        assert!((f.z() - 0.29).abs() < 1e-6);
        assert_eq!(f.direction, Direction::Backward);
    }

    #[test]
    fn test_depth_set_between_steps_is_checked_on_next_step() {
        let mut f = flag_at(0.29);
        step_flag(&mut f, 0.02);

        // Layout switch lands before the pending flip
        f.position.z = 0.0;
        step_flag(&mut f, 0.02);
        assert!((f.z() - 0.02).abs() < 1e-6);
        assert_eq!(f.direction, Direction::Forward);
    }

    #[test]
    fn test_out_of_range_start_turns_before_moving() {
        let mut f = flag_at(0.4);
        step_flag(&mut f, 0.05);
        assert!((f.z() - 0.35).abs() < 1e-6);
        assert_eq!(f.direction, Direction::Backward);
    }

    #[test]
    fn test_turns_forward_below_min() {
        let mut f = flag_at(-0.01);
        f.direction = Direction::Backward;
        step_flag(&mut f, 0.02);
        assert_eq!(f.direction, Direction::Forward);
        assert!((f.z() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_stays_within_bounds_plus_velocity() {
        for &v in &[0.0_f32, 0.002, 0.013, 0.05, 0.29] {
            for start in [0.0_f32, 0.07, 0.15, 0.3] {
                let mut f = flag_at(start);
                for _ in 0..500 {
                    step_flag(&mut f, v);
                    assert!(f.z() >= MIN_Z - v - 1e-5, "z={} v={v}", f.z());
                    assert!(f.z() <= MAX_Z + v + 1e-5, "z={} v={v}", f.z());
                }
            }
        }
    }

    #[test]
    fn test_negative_and_nan_velocity_do_not_move() {
        let mut group = FlagGroup::new("img", vec![flag_at(0.1), flag_at(0.2)]);
        step(&mut group, -0.5);
        step(&mut group, f32::NAN);
        assert_eq!(group.depths(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_step_empty_group_is_noop() {
        let mut group = FlagGroup::new("img", vec![]);
        assert_eq!(step(&mut group, 0.01), 0);
    }

    #[test]
    fn test_directions_are_independent() {
        let mut group = FlagGroup::new("img", vec![flag_at(0.31), flag_at(0.1)]);
        step(&mut group, 0.01);
        assert_eq!(
            group.directions(),
            vec![Direction::Backward, Direction::Forward]
        );
    }
}
