//! Measures PLY decoding speed for the different encodings.

use criterion::{criterion_group, criterion_main, black_box, Criterion};
use cgmath::Point3;

use plymesh::{
    Error, Mesh,
    io::ply::{decode, Config, ElementDef, Encoding, RawSink, Reader, Record, Serializer},
};


// ===============================================================================================
// ===== Helper utilities
// ===============================================================================================

/// A raw sink that just puts all data into the `black_box`.
struct NullRawSink;

impl RawSink for NullRawSink {
    fn element_group_start(&mut self, def: &ElementDef) -> Result<(), Error> {
        black_box(def);
        Ok(())
    }
    fn element(&mut self, record: Record<'_>) -> Result<(), Error> {
        black_box(record);
        Ok(())
    }
}

/// A flat `n`×`n` grid of quads, split into triangles.
fn grid(n: u32) -> Mesh {
    let mut positions = Vec::new();
    for y in 0..=n {
        for x in 0..=n {
            positions.push(Point3::new(x as f32, y as f32, 0.0));
        }
    }

    let mut faces = Vec::new();
    let idx = |x: u32, y: u32| y * (n + 1) + x;
    for y in 0..n {
        for x in 0..n {
            faces.push([idx(x, y), idx(x + 1, y), idx(x, y + 1)]);
            faces.push([idx(x + 1, y), idx(x + 1, y + 1), idx(x, y + 1)]);
        }
    }

    Mesh { positions, faces, ..Mesh::default() }
}

fn encoded_grid(encoding: &str) -> Vec<u8> {
    // We do this string -> encoding stuff here so that the resulting
    // benchmark names are more useful (`/"ascii"` than `/2`).
    let encoding = match encoding {
        "ble" => Encoding::BinaryLittleEndian,
        "bbe" => Encoding::BinaryBigEndian,
        "ascii" => Encoding::Ascii,
        _ => unreachable!(),
    };

    Serializer::new(encoding).write_to_memory(&grid(200)).unwrap()
}


// ===============================================================================================
// ===== Benchmarks
// ===============================================================================================

/// Measures body reading via `RawSink`.
fn grid_raw(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "ply_grid_raw",
        |b, encoding| {
            let data = encoded_grid(encoding);
            let config = Config::new();
            let reader = Reader::new(&data, &config).unwrap();

            b.iter(|| reader.read_raw_into(&mut NullRawSink))
        },
        vec!["ble", "bbe", "ascii"],
    );
}

/// Measures full decoding into a `Mesh`, with and without normal
/// computation.
fn grid_mesh(c: &mut Criterion) {
    c.bench_function_over_inputs(
        "ply_grid_mesh",
        |b, encoding| {
            let data = encoded_grid(encoding);
            let config = Config::new();
            b.iter(|| decode(black_box(&data), &config))
        },
        vec!["ble", "bbe", "ascii"],
    );

    c.bench_function_over_inputs(
        "ply_grid_mesh_normals",
        |b, encoding| {
            let data = encoded_grid(encoding);
            let config = Config::new().compute_normals(true);
            b.iter(|| decode(black_box(&data), &config))
        },
        vec!["ble", "bbe", "ascii"],
    );
}


criterion_group!(benches, grid_raw, grid_mesh);
criterion_main!(benches);
