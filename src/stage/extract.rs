//! Line-pair extraction.
//!
//! Gathers the two endpoint vertices of each line into a packed
//! [`ExtractedLine`] record, removing one layer of index indirection before
//! widening. Idempotent: re-running over unchanged pools produces identical
//! output. Mirrors `EXTRACT_SHADER` in the pipeline module.

use crate::types::{ExtractedLine, MeshVertex};

/// One extraction invocation. Indices are absolute offsets into the shared
/// vertex pool; `line` addresses the index pair at `2 * line`. Out-of-range
/// invocations do no work and return `None` - the only defensive check this
/// core performs. In-range indices are trusted.
pub fn extract_line(
    vertices: &[MeshVertex],
    indices: &[u32],
    line: usize,
) -> Option<ExtractedLine> {
    if line >= indices.len() / 2 {
        return None;
    }
    let i0 = indices[line * 2] as usize;
    let i1 = indices[line * 2 + 1] as usize;
    Some(ExtractedLine {
        v0: vertices[i0],
        v1: vertices[i1],
    })
}

/// Run every extraction invocation, writing output position `i` for line
/// `i`. `out` may be larger than the line count; excess slots are left
/// untouched, matching the GPU dispatch's skipped invocations.
pub fn extract_lines(vertices: &[MeshVertex], indices: &[u32], out: &mut [ExtractedLine]) {
    for line in 0..indices.len() / 2 {
        if let Some(pair) = extract_line(vertices, indices, line) {
            out[line] = pair;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<MeshVertex> {
        (0..8)
            .map(|i| {
                MeshVertex::new(
                    (i as f32, 0.0, 0.0),
                    (0.0, 0.0, 0.0),
                    (1.0, 1.0, 1.0),
                    i as f32 * 0.5,
                    -1.0,
                )
            })
            .collect()
    }

    #[test]
    fn gathers_pairs_by_absolute_offset() {
        let vertices = pool();
        let indices = [2u32, 5, 7, 1];

        let first = extract_line(&vertices, &indices, 0).unwrap();
        assert_eq!(first.v0, vertices[2]);
        assert_eq!(first.v1, vertices[5]);

        let second = extract_line(&vertices, &indices, 1).unwrap();
        assert_eq!(second.v0, vertices[7]);
        assert_eq!(second.v1, vertices[1]);
    }

    #[test]
    fn out_of_range_invocation_is_a_no_op() {
        let vertices = pool();
        let indices = [2u32, 5, 7, 1];
        assert_eq!(extract_line(&vertices, &indices, 2), None);

        let sentinel = ExtractedLine {
            v0: MeshVertex::new((9.0, 9.0, 9.0), (0.0, 0.0, 0.0), (0.0, 0.0, 0.0), 9.0, 9.0),
            v1: MeshVertex::default(),
        };
        let mut out = [sentinel; 3];
        extract_lines(&vertices, &indices, &mut out);
        // Slot 2 has no line behind it and must be untouched.
        assert_eq!(out[2], sentinel);
        assert_eq!(out[0].v0, vertices[2]);
    }

    #[test]
    fn rerun_is_idempotent() {
        let vertices = pool();
        let indices = [0u32, 1, 2, 3];
        let mut a = [ExtractedLine::default(); 2];
        let mut b = [ExtractedLine::default(); 2];
        extract_lines(&vertices, &indices, &mut a);
        extract_lines(&vertices, &indices, &mut b);
        assert_eq!(a, b);
    }
}
