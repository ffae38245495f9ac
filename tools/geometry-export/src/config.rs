//! Shape config parsing
//!
//! A config file names one shape and optionally how to write it:
//!
//! ```toml
//! [shape]
//! kind = "rounded_cube"
//! sx = 2.0
//! radius = 0.3
//!
//! [output]
//! path = "rounded.obj"
//! triangulate = true
//! ```
//!
//! Every shape field is optional and falls back to the generator's default.

use anyhow::{Context, Result};
use primitive_geometry::{self as geometry, Geometry, GeometryError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub shape: ShapeConfig,
    #[serde(default)]
    pub output: OutputSection,
}

/// Output options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Output file; the CLI `-o` flag takes precedence.
    /// Default: `<kind>.obj`
    pub path: Option<PathBuf>,

    /// Write `vn` records when the shape has normals.
    /// Default: true
    pub normals: bool,

    /// Write `vt` records when the shape has UVs.
    /// Default: true
    pub uvs: bool,

    /// Split quad cells into triangles before writing.
    /// Default: false
    pub triangulate: bool,

    /// Check buffer invariants before writing.
    /// Default: true
    pub validate: bool,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: None,
            normals: true,
            uvs: true,
            triangulate: false,
            validate: true,
        }
    }
}

/// One shape and its generator options, tagged by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeConfig {
    Quad(geometry::QuadOptions),
    Plane(geometry::PlaneOptions),
    Box(geometry::BoxOptions),
    Cube(geometry::CubeOptions),
    RoundedRectangle(geometry::RoundedRectangleOptions),
    Stadium(geometry::StadiumOptions),
    RoundedCube(geometry::RoundedCubeOptions),
    Ellipse(geometry::EllipseOptions),
    Disc(geometry::DiscOptions),
    Superellipse(geometry::SuperellipseOptions),
    Squircle(geometry::SquircleOptions),
    Annulus(geometry::AnnulusOptions),
    Reuleux(geometry::ReuleuxOptions),
    Circle(geometry::CircleOptions),
    Ellipsoid(geometry::EllipsoidOptions),
    Sphere(geometry::SphereOptions),
    Icosphere(geometry::IcosphereOptions),
    Icosahedron(geometry::IcosahedronOptions),
    Cylinder(geometry::CylinderOptions),
    Cone(geometry::ConeOptions),
    Capsule(geometry::CapsuleOptions),
    Torus(geometry::TorusOptions),
}

impl ShapeConfig {
    /// Every accepted `kind` value.
    pub const KINDS: [&'static str; 22] = [
        "quad",
        "plane",
        "box",
        "cube",
        "rounded_rectangle",
        "stadium",
        "rounded_cube",
        "ellipse",
        "disc",
        "superellipse",
        "squircle",
        "annulus",
        "reuleux",
        "circle",
        "ellipsoid",
        "sphere",
        "icosphere",
        "icosahedron",
        "cylinder",
        "cone",
        "capsule",
        "torus",
    ];

    /// Default options for a shape kind
    pub fn with_defaults(kind: &str) -> Result<Self> {
        if !Self::KINDS.contains(&kind) {
            anyhow::bail!(
                "Unknown shape kind '{}' (expected one of: {})",
                kind,
                Self::KINDS.join(", ")
            );
        }
        toml::from_str(&format!("kind = \"{kind}\""))
            .with_context(|| format!("Failed to build default {kind} options"))
    }

    /// The `kind` tag of this shape
    pub fn kind(&self) -> &'static str {
        match self {
            ShapeConfig::Quad(_) => "quad",
            ShapeConfig::Plane(_) => "plane",
            ShapeConfig::Box(_) => "box",
            ShapeConfig::Cube(_) => "cube",
            ShapeConfig::RoundedRectangle(_) => "rounded_rectangle",
            ShapeConfig::Stadium(_) => "stadium",
            ShapeConfig::RoundedCube(_) => "rounded_cube",
            ShapeConfig::Ellipse(_) => "ellipse",
            ShapeConfig::Disc(_) => "disc",
            ShapeConfig::Superellipse(_) => "superellipse",
            ShapeConfig::Squircle(_) => "squircle",
            ShapeConfig::Annulus(_) => "annulus",
            ShapeConfig::Reuleux(_) => "reuleux",
            ShapeConfig::Circle(_) => "circle",
            ShapeConfig::Ellipsoid(_) => "ellipsoid",
            ShapeConfig::Sphere(_) => "sphere",
            ShapeConfig::Icosphere(_) => "icosphere",
            ShapeConfig::Icosahedron(_) => "icosahedron",
            ShapeConfig::Cylinder(_) => "cylinder",
            ShapeConfig::Cone(_) => "cone",
            ShapeConfig::Capsule(_) => "capsule",
            ShapeConfig::Torus(_) => "torus",
        }
    }

    /// Run the generator
    pub fn generate(&self) -> Result<Geometry, GeometryError> {
        let geometry = match self {
            ShapeConfig::Quad(o) => geometry::quad(o),
            ShapeConfig::Plane(o) => geometry::plane(o),
            ShapeConfig::Box(o) => geometry::box_geometry(o),
            ShapeConfig::Cube(o) => geometry::cube(o),
            ShapeConfig::RoundedRectangle(o) => geometry::rounded_rectangle(o),
            ShapeConfig::Stadium(o) => geometry::stadium(o),
            ShapeConfig::RoundedCube(o) => geometry::rounded_cube(o),
            ShapeConfig::Ellipse(o) => geometry::ellipse(o),
            ShapeConfig::Disc(o) => geometry::disc(o),
            ShapeConfig::Superellipse(o) => geometry::superellipse(o),
            ShapeConfig::Squircle(o) => geometry::squircle(o),
            ShapeConfig::Annulus(o) => geometry::annulus(o),
            ShapeConfig::Reuleux(o) => geometry::reuleux(o),
            ShapeConfig::Circle(o) => geometry::circle(o),
            ShapeConfig::Ellipsoid(o) => geometry::ellipsoid(o),
            ShapeConfig::Sphere(o) => geometry::sphere(o),
            ShapeConfig::Icosphere(o) => geometry::icosphere(o)?,
            ShapeConfig::Icosahedron(o) => geometry::icosahedron(o),
            ShapeConfig::Cylinder(o) => geometry::cylinder(o),
            ShapeConfig::Cone(o) => geometry::cone(o),
            ShapeConfig::Capsule(o) => geometry::capsule(o),
            ShapeConfig::Torus(o) => geometry::torus(o),
        };
        Ok(geometry)
    }
}

impl ExportConfig {
    /// Load config from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse config from string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid shape config")
    }

    /// Config for a shape kind with default options throughout
    pub fn for_shape(kind: &str) -> Result<Self> {
        Ok(Self {
            shape: ShapeConfig::with_defaults(kind)?,
            output: OutputSection::default(),
        })
    }

    /// Output path: explicit override, then the config's, then `<kind>.obj`
    pub fn output_path(&self, cli_output: Option<&Path>) -> PathBuf {
        cli_output
            .map(Path::to_path_buf)
            .or_else(|| self.output.path.clone())
            .unwrap_or_else(|| PathBuf::from(format!("{}.obj", self.shape.kind())))
    }

    /// Generate the shape and apply the output options
    pub fn build(&self) -> Result<Geometry> {
        let mut geometry = self
            .shape
            .generate()
            .with_context(|| format!("Failed to generate {}", self.shape.kind()))?;

        if self.output.triangulate {
            geometry = geometry.to_triangles();
        }
        if self.output.validate {
            geometry
                .validate()
                .with_context(|| format!("Generated {} is invalid", self.shape.kind()))?;
        }
        Ok(geometry)
    }
}
