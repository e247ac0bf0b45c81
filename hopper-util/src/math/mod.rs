use vector3::Vector3;

pub mod number_range;
pub mod vector3;

pub fn wrap_degrees(degrees: f64) -> f64 {
    let mut var1 = degrees % 360.0;
    if var1 >= 180.0 {
        var1 -= 360.0;
    }

    if var1 < -180.0 {
        var1 += 360.0;
    }

    var1
}

/// Unit vector pointing along a yaw/pitch rotation given in degrees.
///
/// A pitch of `-90` points straight up, `90` straight down. A yaw of `0` faces +Z.
pub fn direction_from_rotation(yaw: f64, pitch: f64) -> Vector3<f64> {
    let yaw = wrap_degrees(yaw).to_radians();
    let pitch = pitch.to_radians();

    Vector3::new(
        -yaw.sin() * pitch.cos(),
        -pitch.sin(),
        yaw.cos() * pitch.cos(),
    )
}
