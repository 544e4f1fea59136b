use nalgebra as na;

/// Exponential blend of `prev` towards `sample`, where `weight` is the share
/// kept from `prev`.
#[inline]
pub fn blend(prev: &na::Vector3<f32>, sample: &na::Vector3<f32>, weight: f32) -> na::Vector3<f32> {
    prev * weight + sample * (1.0 - weight)
}

/// Shortest-arc rotation taking direction `from` onto direction `to`.
///
/// Antiparallel inputs have no unique arc; a half turn around any axis
/// perpendicular to `from` is returned instead. Degenerate (zero) inputs give
/// the identity.
pub fn shortest_arc(from: &na::Vector3<f32>, to: &na::Vector3<f32>) -> na::UnitQuaternion<f32> {
    if let Some(rot) = na::UnitQuaternion::rotation_between(from, to) {
        return rot;
    }

    if from.norm_squared() < f32::EPSILON || to.norm_squared() < f32::EPSILON {
        return na::UnitQuaternion::identity();
    }

    let axis = if from.x.abs() < 0.9 {
        from.cross(&na::Vector3::x())
    } else {
        from.cross(&na::Vector3::y())
    };

    na::UnitQuaternion::from_axis_angle(&na::Unit::new_normalize(axis), std::f32::consts::PI)
}

/// Per-axis (roll, pitch, yaw) angles of `rot`, in radians.
#[inline]
pub fn euler_radians(rot: &na::UnitQuaternion<f32>) -> na::Vector3<f32> {
    let (roll, pitch, yaw) = rot.euler_angles();

    na::Vector3::new(roll, pitch, yaw)
}
