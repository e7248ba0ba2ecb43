use glam::Vec2;

use super::{PingPong, Slot};

/// Saturation value of an accumulation texel.
pub const SNOW_MAX_DEPTH: f32 = 1.0;

/// Square single-channel field; the CPU counterpart of one R16Float texture.
///
/// Texel `(x, y)` covers uv `[(x)/n, (x+1)/n) × [(y)/n, (y+1)/n)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SnowField {
    size: usize,
    texels: Vec<f32>,
}

impl SnowField {
    pub fn new(size: usize) -> Self {
        Self { size, texels: vec![0.0; size * size] }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.texels[y * self.size + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        self.texels[y * self.size + x] = v;
    }

    /// Nearest-texel lookup with clamp-to-edge addressing.
    pub fn sample(&self, uv: Vec2) -> f32 {
        let n = self.size as f32;
        let x = (uv.x * n).floor().clamp(0.0, n - 1.0) as usize;
        let y = (uv.y * n).floor().clamp(0.0, n - 1.0) as usize;
        self.get(x, y)
    }

    pub fn clear(&mut self) {
        self.texels.fill(0.0);
    }

    pub fn is_zero(&self) -> bool {
        self.texels.iter().all(|&v| v == 0.0)
    }

    /// Writes `src + amount` (clamped to [`SNOW_MAX_DEPTH`]) into `self`
    /// wherever `open(x, y)` holds; elsewhere copies `src` unchanged.
    pub fn deposit_from(&mut self, src: &SnowField, amount: f32, open: impl Fn(usize, usize) -> bool) {
        debug_assert_eq!(self.size, src.size);
        let n = self.size;
        for y in 0..n {
            for x in 0..n {
                let v = src.get(x, y);
                let v = if open(x, y) { (v + amount).min(SNOW_MAX_DEPTH) } else { v };
                self.set(x, y, v);
            }
        }
    }

    /// 3×3 box blur of `src` into `self` (clamp-to-edge).
    pub fn blur_from(&mut self, src: &SnowField) {
        debug_assert_eq!(self.size, src.size);
        let n = self.size as isize;
        for y in 0..n {
            for x in 0..n {
                let mut sum = 0.0;
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        let sx = (x + dx).clamp(0, n - 1) as usize;
                        let sy = (y + dy).clamp(0, n - 1) as usize;
                        sum += src.get(sx, sy);
                    }
                }
                self.set(x as usize, y as usize, sum / 9.0);
            }
        }
    }

    /// Zeroes every texel whose center lies within `radius` (uv units) of `center`.
    pub fn erase_disc(&mut self, center: Vec2, radius: f32) {
        let n = self.size;
        let r2 = radius * radius;
        for y in 0..n {
            for x in 0..n {
                let c = Vec2::new((x as f32 + 0.5) / n as f32, (y as f32 + 0.5) / n as f32);
                if c.distance_squared(center) <= r2 {
                    self.set(x, y, 0.0);
                }
            }
        }
    }

    pub fn max(&self) -> f32 {
        self.texels.iter().copied().fold(0.0, f32::max)
    }
}

/// CPU model of the whole feedback loop: a [`PingPong`] pair plus the scratch
/// field the deposit writes into before blurring.
#[derive(Debug, Clone)]
pub struct SnowAccumulation {
    fields: PingPong<SnowField>,
    scratch: SnowField,
    /// Depth added per tick on open surfaces.
    pub deposit_amount: f32,
}

impl SnowAccumulation {
    pub fn new(size: usize, deposit_amount: f32) -> Self {
        Self {
            fields: PingPong::new(SnowField::new(size), SnowField::new(size)),
            scratch: SnowField::new(size),
            deposit_amount,
        }
    }

    pub fn read_slot(&self) -> Slot {
        self.fields.read_slot()
    }

    pub fn field(&self, slot: Slot) -> &SnowField {
        self.fields.get(slot)
    }

    /// Most recently completed state; what the lit pass samples.
    pub fn latest(&self) -> &SnowField {
        self.fields.write()
    }

    /// One quantum: swap roles, deposit `read` into scratch, blur into `write`.
    pub fn tick(&mut self, open: impl Fn(usize, usize) -> bool) {
        self.fields.swap();
        let (read, write) = self.fields.split_mut();
        self.scratch.deposit_from(read, self.deposit_amount, open);
        write.blur_from(&self.scratch);
    }

    /// Broom stroke into the latest field; does not consume a tick.
    pub fn sweep(&mut self, center: Vec2, radius: f32) {
        self.fields.write_mut().erase_disc(center, radius);
    }

    /// Zeroes both fields; the read slot is left as is.
    pub fn clear(&mut self) {
        for f in self.fields.both_mut() {
            f.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 16;

    fn open(_: usize, _: usize) -> bool {
        true
    }

    // ── field ops ─────────────────────────────────────────────────────────

    #[test]
    fn deposit_clamps_to_max() {
        let mut src = SnowField::new(4);
        src.set(1, 1, 0.95);
        let mut dst = SnowField::new(4);
        dst.deposit_from(&src, 0.1, open);
        assert_eq!(dst.get(1, 1), SNOW_MAX_DEPTH);
        assert!((dst.get(0, 0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn deposit_skips_covered_texels() {
        let src = SnowField::new(4);
        let mut dst = SnowField::new(4);
        dst.deposit_from(&src, 0.5, |x, _| x < 2);
        assert_eq!(dst.get(0, 3), 0.5);
        assert_eq!(dst.get(3, 3), 0.0);
    }

    #[test]
    fn blur_preserves_uniform_field() {
        let mut src = SnowField::new(8);
        src.texels.fill(0.4);
        let mut dst = SnowField::new(8);
        dst.blur_from(&src);
        assert!(dst.texels().iter().all(|v| (v - 0.4).abs() < 1e-6));
    }

    #[test]
    fn blur_spreads_a_spike() {
        let mut src = SnowField::new(8);
        src.set(4, 4, 0.9);
        let mut dst = SnowField::new(8);
        dst.blur_from(&src);
        assert!((dst.get(4, 4) - 0.1).abs() < 1e-6);
        assert!((dst.get(3, 5) - 0.1).abs() < 1e-6);
        assert_eq!(dst.get(6, 4), 0.0);
    }

    #[test]
    fn erase_disc_only_touches_disc() {
        let mut f = SnowField::new(N);
        f.texels.fill(1.0);
        f.erase_disc(Vec2::splat(0.5), 0.1);
        assert_eq!(f.sample(Vec2::splat(0.5)), 0.0);
        assert_eq!(f.sample(Vec2::new(0.05, 0.05)), 1.0);
    }

    #[test]
    fn sample_clamps_out_of_range_uv() {
        let mut f = SnowField::new(4);
        f.set(3, 0, 0.7);
        assert_eq!(f.sample(Vec2::new(1.5, -0.2)), 0.7);
    }

    // ── feedback loop ─────────────────────────────────────────────────────

    #[test]
    fn read_is_a_iff_tick_count_even() {
        let mut acc = SnowAccumulation::new(N, 0.01);
        assert_eq!(acc.read_slot(), Slot::A);
        for n in 1..=6 {
            acc.tick(open);
            assert_eq!(acc.read_slot() == Slot::A, n % 2 == 0);
        }
    }

    #[test]
    fn ticks_accumulate_monotonically() {
        let mut acc = SnowAccumulation::new(N, 0.05);
        let mut last = 0.0;
        for _ in 0..10 {
            acc.tick(open);
            let v = acc.latest().sample(Vec2::splat(0.5));
            assert!(v > last);
            last = v;
        }
        assert!((last - 0.5).abs() < 1e-4);
    }

    #[test]
    fn accumulation_saturates() {
        let mut acc = SnowAccumulation::new(N, 0.3);
        for _ in 0..10 {
            acc.tick(open);
        }
        assert!(acc.latest().max() <= SNOW_MAX_DEPTH);
        assert!((acc.latest().sample(Vec2::splat(0.5)) - SNOW_MAX_DEPTH).abs() < 1e-6);
    }

    #[test]
    fn clear_zeroes_both_and_keeps_read_slot() {
        let mut acc = SnowAccumulation::new(N, 0.1);
        for _ in 0..3 {
            acc.tick(open);
        }
        let slot = acc.read_slot();
        acc.clear();
        assert_eq!(acc.read_slot(), slot);
        assert!(acc.field(Slot::A).is_zero());
        assert!(acc.field(Slot::B).is_zero());
    }

    #[test]
    fn sweep_groove_survives_next_tick() {
        let mut acc = SnowAccumulation::new(N, 0.1);
        for _ in 0..4 {
            acc.tick(open);
        }
        let centre = Vec2::splat(0.5);
        acc.sweep(centre, 0.2);
        assert_eq!(acc.latest().sample(centre), 0.0);

        // The groove is read back by the next deposit, so it stays shallower
        // than its surroundings.
        acc.tick(open);
        let groove = acc.latest().sample(centre);
        let outside = acc.latest().sample(Vec2::new(0.05, 0.05));
        assert!(groove < outside, "{groove} vs {outside}");
    }
}
