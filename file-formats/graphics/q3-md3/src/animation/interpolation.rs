//! Two-keyframe blending
//!
//! Transforms are blended by linearly interpolating their raw columns. This
//! does not keep the rotation part orthonormal; the slight shrink halfway
//! between two distant orientations is part of how MD3 models have always
//! looked, so no spherical interpolation is attempted.

use glam::{Mat4, Vec3};

use crate::mesh::Md3Vertex;
use crate::normals::NormalTable;

/// Column-wise linear blend of two transforms
pub fn blend_mat4(current: &Mat4, next: &Mat4, t: f32) -> Mat4 {
    Mat4::from_cols(
        current.x_axis.lerp(next.x_axis, t),
        current.y_axis.lerp(next.y_axis, t),
        current.z_axis.lerp(next.z_axis, t),
        current.w_axis.lerp(next.w_axis, t),
    )
}

/// A vertex placed in world space and blended between two keyframes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Place both keyframe copies of a vertex with their own transforms, then
/// blend the results.
///
/// Positions are scaled from fixed point here. Normals are looked up in
/// `normals` and transformed without translation.
pub fn blend_vertex(
    current: &Md3Vertex,
    next: &Md3Vertex,
    current_world: &Mat4,
    next_world: &Mat4,
    normals: &NormalTable,
    t: f32,
) -> BlendedVertex {
    let position_a = current_world.transform_point3(current.scaled_position());
    let position_b = next_world.transform_point3(next.scaled_position());

    let normal_a = current_world.transform_vector3(normals.decode(current.normal));
    let normal_b = next_world.transform_vector3(normals.decode(next.normal));

    BlendedVertex {
        position: position_a.lerp(position_b, t),
        normal: normal_a.lerp(normal_b, t),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normals;

    #[test]
    fn test_blend_mat4_endpoints() {
        let a = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let b = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert_eq!(blend_mat4(&a, &b, 0.0), a);
        assert_eq!(blend_mat4(&a, &b, 1.0), b);
    }

    #[test]
    fn test_blend_mat4_is_columnwise() {
        let a = Mat4::IDENTITY;
        let b = Mat4::from_translation(Vec3::new(10.0, 0.0, -4.0));
        let m = blend_mat4(&a, &b, 0.25);
        assert_eq!(m.w_axis.truncate(), Vec3::new(2.5, 0.0, -1.0));
        assert_eq!(m.x_axis, a.x_axis);
    }

    #[test]
    fn test_blend_mat4_does_not_renormalise() {
        let a = Mat4::IDENTITY;
        let b = Mat4::from_rotation_z(std::f32::consts::PI);
        let halfway = blend_mat4(&a, &b, 0.5);
        // Opposite orientations collapse the x axis
        assert!(halfway.x_axis.truncate().length() < 1e-6);
    }

    #[test]
    fn test_blend_vertex() {
        let table = normals::init();
        let a = Md3Vertex::new([64, 0, 0], [0, 0]);
        let b = Md3Vertex::new([128, 0, 0], [0, 0]);
        let lift = Mat4::from_translation(Vec3::Z * 2.0);

        let v = blend_vertex(&a, &b, &Mat4::IDENTITY, &lift, table, 0.5);
        assert!((v.position - Vec3::new(1.5, 0.0, 1.0)).length() < 1e-6);
        assert!((v.normal - Vec3::Z).length() < 1e-5);
    }
}
