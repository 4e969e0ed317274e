use glam::{Mat4, Quat, Vec3};

/// Translation / rotation / scale triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Default::default()
        }
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Local matrix `T * R * S`.
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Which of the three TRS fields a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformField {
    Translation,
    Rotation,
    Scale,
}

/// The authoritative local transform of a node.
///
/// The representation is chosen once when the node is created. A baked
/// matrix is never decomposed, so animation can only drive `Trs` nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalTransform {
    Trs(Transform),
    Matrix(Mat4),
}

impl Default for LocalTransform {
    fn default() -> Self {
        LocalTransform::Trs(Transform::default())
    }
}

impl LocalTransform {
    pub fn compute_matrix(&self) -> Mat4 {
        match self {
            LocalTransform::Trs(trs) => trs.compute_matrix(),
            LocalTransform::Matrix(matrix) => *matrix,
        }
    }

    pub fn as_trs(&self) -> Option<&Transform> {
        match self {
            LocalTransform::Trs(trs) => Some(trs),
            LocalTransform::Matrix(_) => None,
        }
    }

    pub fn as_trs_mut(&mut self) -> Option<&mut Transform> {
        match self {
            LocalTransform::Trs(trs) => Some(trs),
            LocalTransform::Matrix(_) => None,
        }
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, LocalTransform::Matrix(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trs_matrix_applies_scale_then_rotation_then_translation() {
        let trs = Transform::from_xyz(1.0, 2.0, 3.0)
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2))
            .with_scale(Vec3::new(2.0, 1.0, 1.0));

        let p = trs.compute_matrix().transform_point3(Vec3::X);
        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (1,4,3)
        assert!(p.abs_diff_eq(Vec3::new(1.0, 4.0, 3.0), 1e-5));
    }

    #[test]
    fn matrix_transform_is_returned_verbatim() {
        let m = Mat4::from_translation(Vec3::new(4.0, 5.0, 6.0));
        let local = LocalTransform::Matrix(m);
        assert_eq!(local.compute_matrix(), m);
        assert!(local.as_trs().is_none());
    }
}
