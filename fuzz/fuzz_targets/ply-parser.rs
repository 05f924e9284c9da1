#![no_main]

use libfuzzer_sys::fuzz_target;
use plymesh::io::ply::{decode, Config};

fuzz_target!(|data: &[u8]| {
    // We just pass the data to the decoder and ignore the result. We are only
    // interested in panics or other even worse crashes. An error saying "this
    // is not a valid PLY file" is perfectly fine.
    let _ = decode(data, &Config::new());
    let _ = decode(data, &Config::new().compute_normals(true).skip_unsupported_polygons(true));
});
