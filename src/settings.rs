//! Runtime configuration for a scattering problem.
//!
//! Truncation ranks, the geometric symmetry of the scatterer and the angular
//! quadrature resolution are read from a TOML file, with `TMAT_`-prefixed
//! environment variables overriding individual values. The loaded settings
//! are validated before being returned, so a mapper or mesh built from them
//! cannot fail on rank or count preconditions.

use std::f64::consts::PI;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::mesh::{MeshRect, RectRule};
use crate::symmetry::{Plane, Rotation, Symmetry};

#[cfg(test)]
mod tests {

    use super::*;

    fn from_toml(text: &str) -> Result<Settings> {
        let raw: Config = Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        let settings: Settings = raw.try_deserialize()?;
        validate(&settings)?;
        Ok(settings)
    }

    #[test]
    fn parses_a_full_problem() {
        let settings = from_toml(
            r#"
            nrank = 6
            mrank = 4

            [symmetry]
            reflections = ["y", "z"]
            rotation = { axis = "axisz", fold = 4 }

            [quadrature]
            points = 91
            rule = "simpson"
            "#,
        )
        .unwrap();

        assert_eq!(settings.nrank, 6);
        assert_eq!(settings.mrank, 4);
        let sym = settings.symmetry();
        assert!(sym.reflection_y && sym.reflection_z && !sym.reflection_x);
        assert_eq!(sym.rotate_phi, 4);
    }

    #[test]
    fn spherical_rotation_shorthand() {
        let settings = from_toml(
            r#"
            nrank = 4
            mrank = 4

            [symmetry]
            rotation = { axis = "all" }

            [quadrature]
            points = 5
            rule = "simpson"
            "#,
        )
        .unwrap();
        assert!(settings.symmetry().is_spherical());
    }

    #[test]
    fn rejects_inconsistent_ranks() {
        let err = from_toml(
            r#"
            nrank = 3
            mrank = 5

            [quadrature]
            points = 5
            rule = "simpson"
            "#,
        );
        assert!(err.is_err());
    }

    #[test]
    fn angular_mesh_spans_theta() {
        let settings = from_toml(
            r#"
            nrank = 4
            mrank = 4

            [quadrature]
            points = 7
            rule = "simpson38"
            "#,
        )
        .unwrap();
        let mesh = settings.angular_mesh().unwrap();
        use crate::mesh::Mesh;
        assert_eq!(mesh.left(), 0.0);
        assert!((mesh.right() - PI).abs() < 1e-12);
    }

    #[test]
    fn default_config_loads() {
        let settings = load_default_config().unwrap();
        assert!(settings.nrank >= 1);
    }
}

/// Symmetry of the scatterer as written in the configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct SymmetrySpec {
    /// Coordinate planes whose reflection maps the object onto itself.
    #[serde(default)]
    pub reflections: Vec<Plane>,
    /// Optional rotation symmetry.
    #[serde(default)]
    pub rotation: Option<RotationSpec>,
}

/// Rotation symmetry as written in the configuration file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RotationSpec {
    pub axis: Rotation,
    /// Fold count for a discrete rotation about z; 0 means continuous.
    #[serde(default)]
    pub fold: i32,
}

/// Angular quadrature used when assembling multipole coefficients.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct QuadratureSpec {
    /// Number of integration points over the polar angle.
    pub points: usize,
    /// Composite rule applied over the points.
    pub rule: RectRule,
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    /// Polar truncation rank of the SVWF expansion.
    pub nrank: i32,
    /// Azimuthal truncation rank of the SVWF expansion.
    pub mrank: i32,
    #[serde(default)]
    pub symmetry: SymmetrySpec,
    pub quadrature: QuadratureSpec,
}

impl Settings {
    /// Materializes the symmetry descriptor from the configured planes and
    /// rotation.
    pub fn symmetry(&self) -> Symmetry {
        let mut sym = Symmetry::new();
        for &plane in &self.symmetry.reflections {
            sym = sym.reflect(plane);
        }
        if let Some(rotation) = &self.symmetry.rotation {
            sym = sym.rotate(rotation.axis, rotation.fold);
        }
        sym
    }

    /// Builds the polar-angle integration mesh over `[0, pi]`.
    pub fn angular_mesh(&self) -> Result<MeshRect> {
        MeshRect::new(self.quadrature.points, 0.0, PI, self.quadrature.rule)
            .context("quadrature settings do not form a valid mesh")
    }
}

fn validate(settings: &Settings) -> Result<()> {
    if settings.nrank < 1 {
        bail!("nrank must be at least 1 (got {})", settings.nrank);
    }
    if settings.mrank < 0 || settings.mrank > settings.nrank {
        bail!(
            "mrank must lie in 0..=nrank (nrank = {}, mrank = {})",
            settings.nrank,
            settings.mrank
        );
    }
    if settings.quadrature.points < 2 {
        bail!(
            "at least two quadrature points are required (got {})",
            settings.quadrature.points
        );
    }
    Ok(())
}

/// Loads settings from the given TOML file, with `TMAT_`-prefixed
/// environment variables taking precedence over file values.
pub fn load_config(path: &Path) -> Result<Settings> {
    let raw: Config = Config::builder()
        .add_source(File::from(path.to_path_buf()).required(true))
        .add_source(Environment::with_prefix("tmat"))
        .build()
        .with_context(|| format!("error loading configuration from {:?}", path))?;

    let settings: Settings = raw
        .try_deserialize()
        .context("error deserializing configuration")?;

    validate(&settings)?;

    Ok(settings)
}

/// Loads the configuration shipped with the crate.
pub fn load_default_config() -> Result<Settings> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    load_config(&root.join("config/default.toml"))
}
