//! Builds `.vox` byte streams for tests.
//!
//! Shared by the integration tests and the decoder's unit tests.

#![allow(dead_code)]

/// One chunk: tag, lengths, content, children.
pub fn chunk(tag: &[u8; 4], content: &[u8], children: &[u8]) -> Vec<u8> {
    let mut out = tag.to_vec();
    out.extend_from_slice(&(content.len() as u32).to_le_bytes());
    out.extend_from_slice(&(children.len() as u32).to_le_bytes());
    out.extend_from_slice(content);
    out.extend_from_slice(children);
    out
}

/// File header plus a MAIN chunk holding `children`.
pub fn vox_file(children: &[Vec<u8>]) -> Vec<u8> {
    let mut out = b"VOX ".to_vec();
    out.extend_from_slice(&150u32.to_le_bytes());
    out.extend(chunk(b"MAIN", &[], &children.concat()));
    out
}

/// A SIZE chunk.
pub fn size_chunk(size: [u32; 3]) -> Vec<u8> {
    let content: Vec<u8> = size.iter().flat_map(|d| d.to_le_bytes()).collect();
    chunk(b"SIZE", &content, &[])
}

/// An XYZI chunk of `(x, y, z, colour)` records.
pub fn xyzi_chunk(voxels: &[[u8; 4]]) -> Vec<u8> {
    let mut content = (voxels.len() as u32).to_le_bytes().to_vec();
    content.extend(voxels.iter().flatten());
    chunk(b"XYZI", &content, &[])
}

/// A SIZE chunk followed by an XYZI chunk.
pub fn model_chunks(size: [u32; 3], voxels: &[[u8; 4]]) -> Vec<Vec<u8>> {
    vec![size_chunk(size), xyzi_chunk(voxels)]
}

/// An RGBA chunk where slot `i + 1` gets `colors[i]`, padded with zeroes to
/// the 256 records the editor writes.
pub fn rgba_chunk(colors: &[[u8; 4]]) -> Vec<u8> {
    let mut content: Vec<u8> = colors.iter().flatten().copied().collect();
    content.resize(256 * 4, 0);
    chunk(b"RGBA", &content, &[])
}

/// Every voxel of a solid `size` box with one colour.
pub fn solid_box(size: [u8; 3], color: u8) -> Vec<[u8; 4]> {
    let mut voxels = Vec::new();
    for x in 0..size[0] {
        for y in 0..size[1] {
            for z in 0..size[2] {
                voxels.push([x, y, z, color]);
            }
        }
    }
    voxels
}
