//! Splits oversized opaque payloads into ordered `chunk.delta`/`chunk.done` pairs.

use neuron_sse_types::ChunkEncoding;

/// One piece of a chunked transfer: either an intermediate `chunk.delta`
/// slice or the terminal `chunk.done` marker. The caller (a raw-event
/// handler) wraps each piece in an envelope and emits it as a [`neuron_sse_types::PublicEvent`].
pub enum ChunkPiece {
    /// An ordered slice of the payload.
    Delta {
        /// Position of this slice among its siblings, starting at 0.
        chunk_index: u32,
        /// The slice itself.
        data: String,
    },
    /// Marks that every slice for `target` has been sent.
    Done,
}

/// Splits `data` into ordered slices of at most `max_chunk_chars` characters
/// each, followed by a single `Done` marker. An empty input still produces
/// zero delta pieces plus one `Done`, matching the "exactly one chunk.done"
/// invariant regardless of payload size.
pub fn chunk(data: &str, max_chunk_chars: usize) -> Vec<ChunkPiece> {
    assert!(max_chunk_chars > 0, "max_chunk_chars must be positive");

    let chars: Vec<char> = data.chars().collect();
    let mut pieces = Vec::new();
    let mut chunk_index = 0u32;

    for slice in chars.chunks(max_chunk_chars) {
        pieces.push(ChunkPiece::Delta {
            chunk_index,
            data: slice.iter().collect(),
        });
        chunk_index += 1;
    }
    pieces.push(ChunkPiece::Done);
    pieces
}

/// The encoding the projector always uses for chunked fields today (raw
/// bytes arrive already base64-encoded from the provider).
#[must_use]
pub fn default_encoding() -> ChunkEncoding {
    ChunkEncoding::Base64
}
