//! Invariants every generator must uphold, swept across the whole library

use glam::Vec3;
use primitive_geometry::*;

/// Defaults of every generator plus a few non-default variants.
fn all_geometries() -> Vec<(&'static str, Geometry)> {
    vec![
        ("quad", quad(&QuadOptions::default())),
        ("plane", plane(&PlaneOptions::default())),
        (
            "plane_quads",
            plane(&PlaneOptions {
                nx: 3,
                ny: Some(2),
                direction: Direction::NegativeX,
                quads: true,
                ..Default::default()
            }),
        ),
        ("box", box_geometry(&BoxOptions::default())),
        ("cube", cube(&CubeOptions::default())),
        (
            "cube_subdivided",
            cube(&CubeOptions {
                nx: 3,
                ny: Some(2),
                nz: Some(4),
                ..Default::default()
            }),
        ),
        ("rounded_rectangle", rounded_rectangle(&RoundedRectangleOptions::default())),
        ("stadium", stadium(&StadiumOptions::default())),
        ("rounded_cube", rounded_cube(&RoundedCubeOptions::default())),
        ("ellipse", ellipse(&EllipseOptions::default())),
        ("disc", disc(&DiscOptions::default())),
        ("superellipse", superellipse(&SuperellipseOptions::default())),
        ("squircle", squircle(&SquircleOptions::default())),
        ("annulus", annulus(&AnnulusOptions::default())),
        ("reuleux", reuleux(&ReuleuxOptions::default())),
        ("circle", circle(&CircleOptions::default())),
        (
            "circle_closed",
            circle(&CircleOptions {
                closed: true,
                ..Default::default()
            }),
        ),
        ("ellipsoid", ellipsoid(&EllipsoidOptions::default())),
        ("sphere", sphere(&SphereOptions::default())),
        ("icosahedron", icosahedron(&IcosahedronOptions::default())),
        (
            "icosphere",
            icosphere(&IcosphereOptions::default()).expect("default icosphere is in range"),
        ),
        ("cylinder", cylinder(&CylinderOptions::default())),
        ("cone", cone(&ConeOptions::default())),
        ("capsule", capsule(&CapsuleOptions::default())),
        ("torus", torus(&TorusOptions::default())),
    ]
}

#[test]
fn test_every_generator_validates() {
    for (name, geometry) in all_geometries() {
        if let Err(err) = geometry.validate() {
            panic!("{name}: {err}");
        }
    }
}

#[test]
fn test_indices_in_bounds() {
    for (name, geometry) in all_geometries() {
        let max = geometry.cells.max().unwrap_or(0) as usize;
        assert!(max < geometry.vertex_count(), "{name}");
    }
}

#[test]
fn test_cell_stride() {
    for (name, geometry) in all_geometries() {
        let stride = match geometry.topology {
            Topology::Lines => 2,
            Topology::Triangles => 3,
            Topology::Quads => 4,
        };
        assert_eq!(geometry.cells.len() % stride, 0, "{name}");
    }
}

#[test]
fn test_normals_are_unit() {
    for (name, geometry) in all_geometries() {
        let Some(normals) = &geometry.normals else {
            continue;
        };
        for n in normals.chunks(3) {
            let length = Vec3::from_slice(n).length();
            assert!((length - 1.0).abs() < 1e-4, "{name}: normal length {length}");
        }
    }
}

#[test]
fn test_index_width_matches_vertex_count() {
    for (name, geometry) in all_geometries() {
        assert_eq!(
            geometry.cells.kind(),
            IndexKind::for_vertex_count(geometry.vertex_count()),
            "{name}"
        );
    }
    assert_eq!(IndexKind::for_vertex_count(255), IndexKind::U8);
    assert_eq!(IndexKind::for_vertex_count(256), IndexKind::U16);
    assert_eq!(IndexKind::for_vertex_count(65_535), IndexKind::U16);
    assert_eq!(IndexKind::for_vertex_count(65_536), IndexKind::U32);
}

#[test]
fn test_closed_solids_wind_with_normals() {
    let solids = [
        cube(&CubeOptions::default()),
        sphere(&SphereOptions::default()),
        icosphere(&IcosphereOptions::default()).expect("in range"),
        cylinder(&CylinderOptions::default()),
        cone(&ConeOptions::default()),
        capsule(&CapsuleOptions::default()),
        torus(&TorusOptions::default()),
        disc(&DiscOptions::default()),
    ];
    for geometry in solids {
        for tri in geometry.cell_indices() {
            let [p0, p1, p2] = [0, 1, 2].map(|k| Vec3::from(geometry.position(tri[k] as usize)));
            let cross = (p1 - p0).cross(p2 - p0);
            if cross.length() < 1e-7 {
                continue;
            }
            let normal: Vec3 = tri
                .iter()
                .filter_map(|&i| geometry.normal(i as usize))
                .map(Vec3::from)
                .sum();
            assert!(cross.dot(normal) > 0.0);
        }
    }
}

#[test]
fn test_box_scenario() {
    let geometry = box_geometry(&BoxOptions {
        sx: 2.0,
        sy: Some(1.0),
        sz: Some(1.0),
    });
    assert_eq!(geometry.positions.len(), 24);
    assert_eq!(geometry.cells.len(), 24);
    assert_eq!(geometry.topology, Topology::Quads);
}

#[test]
fn test_sphere_scenario() {
    let geometry = sphere(&SphereOptions {
        nx: 4,
        ny: 2,
        ..Default::default()
    });
    assert_eq!(geometry.vertex_count(), 15);
    assert_eq!(geometry.cells.len(), 48);
}

#[test]
fn test_merged_centroid_has_no_repeated_vertex() {
    for mapping in UvMapping::ALL {
        let geometry = ellipse(&EllipseOptions {
            mapping,
            ..Default::default()
        });
        for tri in geometry.cell_indices() {
            assert!(
                tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2],
                "{mapping:?}: {tri:?}"
            );
        }
    }
}

#[test]
fn test_mappings_finite_at_center() {
    let center = MappingInput::default();
    for mapping in UvMapping::ALL {
        let uv = mapping.map(&center);
        assert!(uv.is_finite(), "{mapping:?}: {uv}");
    }
}

#[test]
fn test_every_mapping_yields_finite_uvs() {
    for mapping in UvMapping::ALL {
        let geometry = ellipse(&EllipseOptions {
            mapping,
            segments: 24,
            inner_segments: 6,
            ..Default::default()
        });
        let uvs = geometry.uvs.as_deref().unwrap_or_default();
        assert!(uvs.iter().all(|c| c.is_finite()), "{mapping:?}");
    }
}

#[test]
fn test_icosphere_quadruples() {
    let mut previous = icosphere(&IcosphereOptions {
        subdivisions: 0,
        ..Default::default()
    })
    .expect("in range")
    .cell_count();
    assert_eq!(previous, 20);

    for subdivisions in 1..=5 {
        let count = icosphere(&IcosphereOptions {
            subdivisions,
            ..Default::default()
        })
        .expect("in range")
        .cell_count();
        assert_eq!(count, previous * 4, "level {subdivisions}");
        previous = count;
    }
}

#[test]
fn test_icosphere_base_vertices() {
    let geometry = icosahedron(&IcosahedronOptions { radius: 1.0 });
    // The 12 corners come first; anything after is a seam copy of one of them
    for i in 12..geometry.vertex_count() {
        let p = Vec3::from(geometry.position(i));
        let matches_corner = (0..12).any(|c| Vec3::from(geometry.position(c)).distance(p) < 1e-6);
        assert!(matches_corner, "vertex {i} is not a corner duplicate");
    }
}

#[test]
fn test_icosphere_seams_across_levels() {
    for subdivisions in 0..=5 {
        let geometry = icosphere(&IcosphereOptions {
            subdivisions,
            ..Default::default()
        })
        .expect("in range");

        for tri in geometry.cell_indices() {
            assert!(
                tri[0] != tri[1] && tri[1] != tri[2] && tri[0] != tri[2],
                "level {subdivisions}: repeated vertex in {tri:?}"
            );

            let us: Vec<f32> = tri
                .iter()
                .map(|&i| geometry.uv(i as usize).unwrap_or_default()[0])
                .collect();
            let span = us.iter().copied().fold(f32::MIN, f32::max)
                - us.iter().copied().fold(f32::MAX, f32::min);
            assert!(
                span <= 0.5 + 1e-3,
                "level {subdivisions}: triangle {tri:?} spans {span} of the texture"
            );
        }
    }
}

#[test]
fn test_icosphere_out_of_range() {
    let result = icosphere(&IcosphereOptions {
        subdivisions: MAX_SUBDIVISIONS + 1,
        ..Default::default()
    });
    assert!(matches!(
        result,
        Err(GeometryError::SubdivisionsOutOfRange { .. })
    ));
}

#[test]
fn test_quad_split() {
    let quads = plane(&PlaneOptions {
        nx: 2,
        quads: true,
        ..Default::default()
    });
    let triangles = quads.clone().to_triangles();
    assert_eq!(triangles.topology, Topology::Triangles);
    assert_eq!(triangles.cell_count(), quads.cell_count() * 2);
    assert_eq!(triangles.positions, quads.positions);
}

#[test]
fn test_generators_are_deterministic() {
    let a = all_geometries();
    let b = all_geometries();
    for ((name, x), (_, y)) in a.iter().zip(&b) {
        assert_eq!(x, y, "{name}");
    }
}
