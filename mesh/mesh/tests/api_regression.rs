//! API Regression Tests for the Mesh Crates
//!
//! These tests serve as a regression suite to ensure the public API remains
//! stable and consistent across the mesh crates. They are organized in
//! tiers of increasing scope:
//!
//! - Tier 1: Foundation (mesh-types, vertex table, welding)
//! - Tier 2: Strips (mesh-strip, grid, strategies, encoding)
//! - Tier 3: I/O (mesh-io, SML codec, format detection)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

// Allow test-specific patterns
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::uninlined_format_args)]

use mesh::{io, prelude::*, strip, types};

// =============================================================================
// TIER 1: Foundation - Basic Types and Primitives
// =============================================================================

mod tier1_foundation {
    use super::*;

    #[test]
    fn vertex_creation_and_access() {
        // Primary constructor
        let v = types::Vertex::from_coords(1.0, 2.0, 3.0);
        assert!((v.position.x - 1.0).abs() < f32::EPSILON);
        assert!((v.position.y - 2.0).abs() < f32::EPSILON);
        assert!((v.position.z - 3.0).abs() < f32::EPSILON);

        // From point
        let point = types::Point3::new(4.0, 5.0, 6.0);
        let v2 = types::Vertex::new(point);
        assert!((v2.position.x - 4.0).abs() < f32::EPSILON);

        // Narrowed from f64
        let v3 = types::Vertex::from_f64(0.5, 0.25, 0.125);
        assert_eq!(v3.to_array(), [0.5, 0.25, 0.125]);
    }

    #[test]
    fn mesh_construction() {
        // Empty mesh
        let mesh = Mesh::new();
        assert!(mesh.vertices().is_empty());
        assert!(mesh.triangles.is_empty());
        assert!(mesh.bounds().is_empty());

        // From parts
        let vertices = vec![
            Vertex::from_coords(0.0, 0.0, 0.0),
            Vertex::from_coords(1.0, 0.0, 0.0),
            Vertex::from_coords(0.0, 1.0, 0.0),
        ];
        let mesh = Mesh::from_parts(vertices, vec![Triangle::new(0, 1, 2)]);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(mesh.validate_indices().is_ok());
    }

    #[test]
    fn primitive_unit_cube() {
        let cube = types::unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12); // 6 faces × 2 triangles

        // Unit cube spans 0,0,0 to 1,1,1
        let bounds = cube.bounds();
        assert!((bounds.min.x - 0.0).abs() < f32::EPSILON);
        assert!((bounds.max.x - 1.0).abs() < f32::EPSILON);
        assert!((bounds.max.z - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn vertex_table_interns_exact_matches() {
        let mut mesh = Mesh::new();
        let mut table = VertexTable::new();

        let a = table.intern(&mut mesh, Vertex::from_coords(1.0, 2.0, 3.0));
        let b = table.intern(&mut mesh, Vertex::from_coords(1.0, 2.0, 3.0));
        let c = table.intern(&mut mesh, Vertex::from_coords(1.0, 2.0, 3.000_001));

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn invalid_index_is_reported() {
        let mut mesh = types::unit_cube();
        mesh.triangles.push(Triangle::new(0, 1, 99));
        let err = mesh.validate_indices().unwrap_err();
        assert_eq!(err.index(), 99);
        assert_eq!(err.vertex_count(), 8);
    }

    #[test]
    fn weld_merges_close_vertices() {
        let mut mesh = Mesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(1.000_01, 0.0, 0.0),
            ],
            vec![Triangle::new(0, 1, 2)],
        );
        assert_eq!(weld_vertices(&mut mesh, DEFAULT_WELD_TOLERANCE), 1);
        assert_eq!(mesh.vertex_count(), 2);
        assert!(mesh.validate_indices().is_ok());
    }
}

// =============================================================================
// TIER 2: Strips - Grid, Strategies, Encoding
// =============================================================================

mod tier2_strips {
    use super::*;

    #[test]
    fn strip_params_builder_pattern() {
        // Default params
        let params = StripParams::default();
        assert_eq!(params.window_size, 1000);
        assert!(params.seed_orientations >= 1);

        // Builder pattern
        let params = StripParams::default()
            .with_window_size(50)
            .with_seed_orientations(3)
            .with_compaction(100, std::time::Duration::from_millis(5));
        assert_eq!(params.window_size, 50);
        assert_eq!(params.seed_orientations, 3);
        assert_eq!(params.compact_threshold, 100);

        // Preset
        let eager = StripParams::eager_compaction();
        assert_eq!(eager.compact_interval, std::time::Duration::ZERO);
    }

    #[test]
    fn strategy_names_parse() {
        for strategy in StripStrategy::ALL {
            let parsed: StripStrategy = strategy.to_string().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert_eq!("next".parse::<StripStrategy>().unwrap(), StripStrategy::Window);
        assert!(matches!(
            "zigzag".parse::<StripStrategy>(),
            Err(strip::StripError::UnknownStrategy { .. })
        ));
    }

    #[test]
    fn spatial_grid_sizing() {
        assert_eq!(strip::SpatialGrid::size_for(0), strip::MIN_GRID_SIZE);
        assert_eq!(strip::SpatialGrid::size_for(10_000), 25);
        assert_eq!(strip::SpatialGrid::size_for(usize::MAX), strip::MAX_GRID_SIZE);

        let cube = types::unit_cube();
        let mut grid = strip::SpatialGrid::new(cube.vertex_count(), cube.bounds());
        assert!(!grid.is_built());
        grid.build(cube.vertices(), &cube.triangles);
        assert!(grid.is_built());
        assert!(strip::SpatialGrid::for_mesh(&cube).is_built());
    }

    #[test]
    fn find_strips_partitions_triangles() {
        let cube = types::unit_cube();
        for strategy in StripStrategy::ALL {
            let set = find_strips(&cube, strategy, &StripParams::default());
            assert!(set.is_partition(), "{strategy}");
            assert_eq!(
                set.stripped_triangle_count() + set.single_count(),
                cube.triangle_count()
            );
        }
    }

    #[test]
    fn strip_set_display() {
        let set = find_strips(&types::unit_cube(), StripStrategy::Link, &StripParams::default());
        let display = format!("{}", set);
        assert!(display.contains("link"));
        assert!(display.contains("singles"));
    }

    #[test]
    fn strip_words_decode() {
        let triangles = strip::decode_strip(&[0, 1, 2, 3, 4]).unwrap();
        assert_eq!(
            triangles,
            vec![
                Triangle::new(0, 1, 2),
                Triangle::new(0, 2, 3),
                Triangle::new(3, 2, 4),
            ]
        );
        assert!(matches!(
            strip::decode_strip(&[0, 1]),
            Err(strip::StripError::StripTooShort { words: 2 })
        ));
    }
}

// =============================================================================
// TIER 3: I/O - SML Codec and Format Detection
// =============================================================================

mod tier3_io {
    use super::*;

    #[test]
    fn io_format_detection() {
        // Format detection
        assert_eq!(MeshFormat::from_path("model.sml"), Some(MeshFormat::Sml));
        assert_eq!(MeshFormat::from_path("model.stl"), Some(MeshFormat::Stl));
        assert_eq!(MeshFormat::from_path("model.obj"), Some(MeshFormat::Obj));
        assert_eq!(MeshFormat::from_path("model.ply"), None);

        // Extensions
        assert_eq!(MeshFormat::Sml.extension(), "sml");
        assert_eq!(MeshFormat::Stl.extension(), "stl");
    }

    #[test]
    fn sml_write_options() {
        let plain = SmlWriteOptions::default();
        assert!(plain.strip.is_none());

        let stripped = SmlWriteOptions::with_strips(StripStrategy::Grid)
            .with_strip_params(StripParams::default().with_window_size(10));
        assert_eq!(stripped.strip, Some(StripStrategy::Grid));
        assert_eq!(stripped.strip_params.window_size, 10);
    }

    #[test]
    fn sml_encode_decode() {
        let mut cube = types::unit_cube();
        cube.comments.push("unit cube".to_string());

        let (bytes, summary) =
            io::encode_sml(&cube, &SmlWriteOptions::with_strips(StripStrategy::Link)).unwrap();
        assert_eq!(&bytes[..4], io::sml::MAGIC);
        assert_eq!(summary.bytes, bytes.len() as u64);
        assert_eq!(summary.vertices, 8);
        assert_eq!(summary.comments, 1);

        let display = format!("{}", summary);
        assert!(display.contains("crc"));

        let loaded = io::decode_sml(&bytes).unwrap();
        assert_eq!(loaded.vertices(), cube.vertices());
        assert_eq!(loaded.triangle_count(), 12);
        assert_eq!(loaded.comments, cube.comments);
    }

    #[test]
    fn sml_corruption_detected() {
        let (mut bytes, _) =
            io::encode_sml(&types::unit_cube(), &SmlWriteOptions::default()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;

        let err = io::decode_sml(&bytes).unwrap_err();
        assert!(err.is_corrupt());
        assert!(matches!(err, IoError::ChecksumMismatch { .. }));
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cube = types::unit_cube();

        for ext in ["sml", "stl", "obj"] {
            let path = dir.path().join(format!("cube.{ext}"));
            save_mesh(&cube, &path).unwrap();
            let loaded = load_mesh(&path).unwrap();
            assert_eq!(loaded.vertex_count(), 8, "{ext}");
            assert_eq!(loaded.triangle_count(), 12, "{ext}");
        }
    }
}
