//! RGB565 endpoint helpers shared by the BC colour blocks.

/// Pack 8-bit RGB into RGB565 (truncating the low bits).
pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = (r >> 3) as u16;
    let g6 = (g >> 2) as u16;
    let b5 = (b >> 3) as u16;
    (r5 << 11) | (g6 << 5) | b5
}

/// Expand RGB565 to 8-bit RGB, replicating the high bits into the low bits.
pub fn rgb565_to_rgb888(color: u16) -> [u8; 3] {
    let r5 = (color >> 11) & 0x1F;
    let g6 = (color >> 5) & 0x3F;
    let b5 = color & 0x1F;
    [
        ((r5 << 3) | (r5 >> 2)) as u8,
        ((g6 << 2) | (g6 >> 4)) as u8,
        ((b5 << 3) | (b5 >> 2)) as u8,
    ]
}

/// Perceptually weighted squared distance (R=3, G=6, B=1).
pub fn color_distance_squared(a: &[u8; 4], b: &[u8; 3]) -> u32 {
    let dr = (a[0] as i32 - b[0] as i32) * 3;
    let dg = (a[1] as i32 - b[1] as i32) * 6;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Weighted blend `(wa * a + wb * b) / (wa + wb)` per channel.
pub fn blend(a: [u8; 3], b: [u8; 3], wa: u16, wb: u16) -> [u8; 3] {
    let total = wa + wb;
    [
        ((wa * a[0] as u16 + wb * b[0] as u16) / total) as u8,
        ((wa * a[1] as u16 + wb * b[1] as u16) / total) as u8,
        ((wa * a[2] as u16 + wb * b[2] as u16) / total) as u8,
    ]
}
