//! Recursive median cut.

use crate::color::Color;

/// Recursion depth that yields roughly `4 * color_count` candidates.
///
/// `ceil(log2(color_count * 4))`.
pub fn depth_for(color_count: usize) -> u32 {
    let target = color_count.max(1) * 4;
    // ceil(log2(n)) for n >= 1
    usize::BITS - (target - 1).leading_zeros()
}

/// Split `pixels` along its widest channel `depth` times, appending one
/// representative per leaf to `out`.
///
/// Leaves are visited left half first, so the output order is determined
/// by the input order alone. Empty leaves contribute nothing.
pub fn median_cut(pixels: &mut [Color], depth: u32, out: &mut Vec<Color>) {
    if pixels.is_empty() {
        return;
    }
    if depth == 0 {
        out.push(representative(pixels));
        return;
    }

    let channel = widest_channel(pixels);
    // Stable, so equal keys keep their sampling order
    pixels.sort_by_key(|c| c.to_bytes()[channel]);

    let mid = pixels.len() / 2;
    let (low, high) = pixels.split_at_mut(mid);
    median_cut(low, depth - 1, out);
    median_cut(high, depth - 1, out);
}

/// Index of the channel (0 = R, 1 = G, 2 = B) with the largest value range.
///
/// Ties go to the earlier channel.
fn widest_channel(pixels: &[Color]) -> usize {
    let mut min = [u8::MAX; 3];
    let mut max = [u8::MIN; 3];
    for c in pixels {
        for (i, v) in c.to_bytes().into_iter().enumerate() {
            min[i] = min[i].min(v);
            max[i] = max[i].max(v);
        }
    }

    let mut best = 0;
    for i in 1..3 {
        if max[i] - min[i] > max[best] - min[best] {
            best = i;
        }
    }
    best
}

/// The member farthest from the subset's channel-wise mean.
///
/// Picks a chromatically extreme color rather than a washed-out average.
/// Ties go to the first member.
fn representative(pixels: &[Color]) -> Color {
    let n = pixels.len() as f64;
    let mut sum = [0.0f64; 3];
    for c in pixels {
        sum[0] += c.r as f64;
        sum[1] += c.g as f64;
        sum[2] += c.b as f64;
    }
    let mean = [sum[0] / n, sum[1] / n, sum[2] / n];

    let mut best = pixels[0];
    let mut best_dist = -1.0;
    for &c in pixels {
        let dr = c.r as f64 - mean[0];
        let dg = c.g as f64 - mean[1];
        let db = c.b as f64 - mean[2];
        let dist = (dr * dr + dg * dg + db * db).sqrt();
        if dist > best_dist {
            best = c;
            best_dist = dist;
        }
    }
    best
}
