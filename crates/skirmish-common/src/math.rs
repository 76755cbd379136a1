//! Angle and vector helpers for yaw-based steering.
//!
//! Yaw convention: radians, `0` faces `+Z`, positive turns toward `+X`
//! (so `forward = (sin yaw, 0, cos yaw)`).

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Wraps an angle into the `(-PI, PI]` range.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Returns the shortest signed difference from `from` to `to`.
#[must_use]
pub fn delta_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Interpolates between two angles along the shortest arc.
#[must_use]
pub fn lerp_angle(from: f32, to: f32, t: f32) -> f32 {
    from + delta_angle(from, to) * t
}

/// Smoothly damps an angle toward a target along the shortest arc.
///
/// Critically damped spring approximation; `velocity` carries the angular
/// rate between calls and must persist on the caller. Never overshoots.
#[must_use]
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

/// Smoothly damps a scalar toward a target without overshooting.
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // clamp to the target once crossed
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}

/// Returns the horizontal forward direction for a yaw angle.
#[must_use]
pub fn yaw_to_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Returns the yaw angle facing along a direction (Y ignored).
#[must_use]
pub fn forward_to_yaw(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Zeroes the vertical component of a vector.
#[must_use]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Squared horizontal (XZ-plane) distance between two points.
#[must_use]
pub fn horizontal_distance_squared(a: Vec3, b: Vec3) -> f32 {
    flatten(b - a).length_squared()
}
