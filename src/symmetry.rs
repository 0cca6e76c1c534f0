//! Geometric symmetry of a scattering object.
//!
//! The descriptor is built fluently when a scattering problem is set up and
//! is frozen by convention once handed to a mapper (mappers keep their own
//! clone, and the registry deduplicates on structural equality).

use serde::Deserialize;

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_has_no_symmetry() {
        let sym = Symmetry::new();
        assert!(!sym.reflection_x && !sym.reflection_y && !sym.reflection_z);
        assert_eq!(sym.rotate_phi, 1);
        assert!(!sym.is_spherical());
        assert!(!sym.is_axial());
    }

    #[test]
    fn full_rotation_is_spherical() {
        let sym = Symmetry::new().rotate(Rotation::All, 0);
        assert!(sym.is_spherical());
        assert!(!sym.is_axial());
    }

    #[test]
    fn continuous_axis_rotation_is_axial() {
        let sym = Symmetry::new().rotate(Rotation::AxisZ, 0);
        assert!(sym.is_axial());
        assert!(!sym.is_spherical());
    }

    #[test]
    fn builder_composes() {
        let sym = Symmetry::new()
            .reflect(Plane::Y)
            .reflect(Plane::Z)
            .rotate(Rotation::AxisZ, 4);
        assert!(sym.reflection_y && sym.reflection_z && !sym.reflection_x);
        assert_eq!(sym.rotate_phi, 4);
        assert_eq!(sym.rotate_theta, 1);
    }

    #[test]
    fn equality_is_structural() {
        let a = Symmetry::new().reflect(Plane::Y);
        let b = Symmetry::new().reflect(Plane::Y);
        assert_eq!(a, b);
        assert_ne!(a, Symmetry::new());
    }
}

/// Coordinate plane for a reflection symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plane {
    X,
    Y,
    Z,
}

/// Axis selector for a rotation symmetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    /// Rotation by any angle about any axis maps the object onto itself.
    All,
    /// Rotation about the z axis maps the object onto itself.
    AxisZ,
}

/// Types of geometrical symmetry of a scatterer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symmetry {
    /// Reflection across the x plane yields the same object.
    pub reflection_x: bool,
    /// Reflection across the y plane yields the same object.
    pub reflection_y: bool,
    /// Reflection across the z plane yields the same object.
    pub reflection_z: bool,
    /// Rotation about the z axis by `2 pi / rotate_phi` yields the same
    /// object; 0 means the object is axially symmetric (continuous rotation).
    pub rotate_phi: i32,
    /// 0 means the object is spherical, any other value means no theta
    /// symmetry.
    pub rotate_theta: i32,
}

impl Default for Symmetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Symmetry {
    /// A descriptor with no reflection or rotation structure.
    pub fn new() -> Self {
        Self {
            reflection_x: false,
            reflection_y: false,
            reflection_z: false,
            rotate_phi: 1,
            rotate_theta: 1,
        }
    }

    /// Declares a reflection symmetry across the given coordinate plane.
    pub fn reflect(mut self, plane: Plane) -> Self {
        match plane {
            Plane::X => self.reflection_x = true,
            Plane::Y => self.reflection_y = true,
            Plane::Z => self.reflection_z = true,
        }
        self
    }

    /// Declares a rotation symmetry.
    ///
    /// `Rotation::All` makes the object spherical (`fold` is ignored);
    /// `Rotation::AxisZ` declares an `fold`-fold discrete rotation about z,
    /// or a continuous one when `fold` is 0.
    pub fn rotate(mut self, axis: Rotation, fold: i32) -> Self {
        match axis {
            Rotation::All => {
                self.rotate_phi = 0;
                self.rotate_theta = 0;
            }
            Rotation::AxisZ => self.rotate_phi = fold,
        }
        self
    }

    /// The object is mapped onto itself by every rotation.
    pub fn is_spherical(&self) -> bool {
        self.rotate_theta == 0 && self.rotate_phi == 0
    }

    /// The object is mapped onto itself by any rotation about z, but not by
    /// rotations moving the z axis.
    pub fn is_axial(&self) -> bool {
        self.rotate_theta != 0 && self.rotate_phi == 0
    }
}
