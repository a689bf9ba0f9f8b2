use tracing::info;

/// Centers an RGBA image on a zero-filled `target_cols x target_rows` canvas.
///
/// Returns the canvas and the left/top padding applied. Images larger than the
/// canvas along an axis are not padded along it (the caller fits first).
pub fn pad_to_extent(
    rgba: &[u8],
    cols: usize,
    rows: usize,
    target_cols: usize,
    target_rows: usize,
) -> (Vec<u8>, usize, usize) {
    let out_cols = target_cols.max(cols);
    let out_rows = target_rows.max(rows);
    let pad_cols = (out_cols - cols) / 2;
    let pad_rows = (out_rows - rows) / 2;

    info!(
        "Adding padding: cols={}, rows={}, pad_cols={}, pad_rows={}",
        cols, rows, pad_cols, pad_rows
    );
    info!("Final dimensions: {}x{}", out_cols, out_rows);

    let mut padded = vec![0u8; out_cols * out_rows * 4];
    let row_bytes = cols * 4;
    // Copy per row using slice copies to minimize per-pixel indexing
    for row in 0..rows {
        let src_offset = row * row_bytes;
        let dst_offset = ((row + pad_rows) * out_cols + pad_cols) * 4;
        padded[dst_offset..dst_offset + row_bytes]
            .copy_from_slice(&rgba[src_offset..src_offset + row_bytes]);
    }
    (padded, pad_cols, pad_rows)
}
