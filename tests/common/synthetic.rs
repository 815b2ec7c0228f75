/// Generates a deterministic byte pattern for image payloads.
pub fn patterned_u8(len: usize, seed: u32) -> Vec<u8> {
    (0..len)
        .map(|i| {
            let h = (i as u32).wrapping_mul(2_654_435_761).wrapping_add(seed);
            (h >> 24) as u8
        })
        .collect()
}

/// Generates a checkerboard of 1.0 / 0.0 values.
pub fn checkerboard_f32(width: usize, height: usize) -> Vec<f32> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = vec![0.0f32; width * height];
    for y in 0..height {
        for x in 0..width {
            if (x + y) % 2 == 0 {
                img[y * width + x] = 1.0;
            }
        }
    }
    img
}

/// Mask covering every `period`-th texel with 255, the rest 0.
pub fn periodic_mask_u8(width: usize, height: usize, period: usize) -> Vec<u8> {
    (0..width * height)
        .map(|i| if i % period == 0 { 255 } else { 0 })
        .collect()
}
