//! Row-band work splitting for the per-row kernels.
//!
//! A kernel invocation over `row_count` rows is split into contiguous,
//! write-exclusive bands that run as scoped tasks on rayon's pool. Bands
//! never communicate and never reduce across their boundary, so the joined
//! output is bit-identical to a single-threaded run for any band count.
//!
//! The band count is data-size aware: one band per 4 KiB of output keeps
//! tiny images from fanning out across the machine, and `max_threads == 0`
//! defaults to half of the detected hardware threads on the assumption
//! that SMT siblings share the memory ports this workload saturates.
use log::debug;

/// Half-open row range `[start, end)` processed by one kernel call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowBand {
    pub start: usize,
    pub end: usize,
}

impl RowBand {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Band layout for one kernel invocation.
#[derive(Clone, Copy, Debug)]
pub struct BandPlan {
    pub row_count: usize,
    pub bands: usize,
}

impl BandPlan {
    /// Chooses the band count for a kernel writing `row_count` rows of
    /// `row_width × channel_stride` floats.
    pub fn new(
        row_width: usize,
        row_count: usize,
        channel_stride: usize,
        max_threads: usize,
    ) -> Self {
        let data_cap = row_width * row_count * channel_stride * std::mem::size_of::<f32>() / 4096;
        let hardware = if max_threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(2)
                / 2
        } else {
            max_threads
        };
        let bands = data_cap.min(hardware).clamp(1, row_count.max(1));
        Self { row_count, bands }
    }

    /// Contiguous bands covering `0..row_count`; the last band absorbs the
    /// division remainder.
    pub fn split(&self) -> Vec<RowBand> {
        let per_band = self.row_count / self.bands;
        (0..self.bands)
            .map(|i| RowBand {
                start: i * per_band,
                end: if i == self.bands - 1 {
                    self.row_count
                } else {
                    (i + 1) * per_band
                },
            })
            .collect()
    }

    /// Runs `kernel` over every band, handing each band its own disjoint
    /// slices of the two output buffers.
    ///
    /// `elems_a` / `elems_b` are the number of elements one band row owns
    /// in the respective buffer; an empty buffer with zero elements per
    /// row opts a kernel out of the second output.
    pub fn run_pair<A, B, F>(
        &self,
        out_a: &mut [A],
        elems_a: usize,
        out_b: &mut [B],
        elems_b: usize,
        kernel: F,
    ) where
        A: Send,
        B: Send,
        F: Fn(RowBand, &mut [A], &mut [B]) + Sync,
    {
        assert_eq!(out_a.len(), self.row_count * elems_a, "output A row layout");
        assert_eq!(out_b.len(), self.row_count * elems_b, "output B row layout");

        if self.bands == 1 {
            kernel(
                RowBand {
                    start: 0,
                    end: self.row_count,
                },
                out_a,
                out_b,
            );
            return;
        }

        debug!(
            "dispatching {} rows as {} bands",
            self.row_count, self.bands
        );

        let mut work = Vec::with_capacity(self.bands);
        let mut rest_a = out_a;
        let mut rest_b = out_b;
        for band in self.split() {
            let (slice_a, tail_a) = rest_a.split_at_mut(band.len() * elems_a);
            let (slice_b, tail_b) = rest_b.split_at_mut(band.len() * elems_b);
            rest_a = tail_a;
            rest_b = tail_b;
            work.push((band, slice_a, slice_b));
        }

        let kernel = &kernel;
        rayon::scope(|scope| {
            for (band, slice_a, slice_b) in work {
                scope.spawn(move |_| kernel(band, slice_a, slice_b));
            }
        });
    }

    /// Single-output variant of [`BandPlan::run_pair`].
    pub fn run_single<A, F>(&self, out: &mut [A], elems: usize, kernel: F)
    where
        A: Send,
        F: Fn(RowBand, &mut [A]) + Sync,
    {
        let mut empty: [u8; 0] = [];
        self.run_pair(out, elems, &mut empty[..], 0, |band, slice, _: &mut [u8]| {
            kernel(band, slice)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_images_run_on_one_band() {
        // 8x8x4 floats is 1 KiB, under the 4 KiB alignment unit
        let plan = BandPlan::new(8, 8, 4, 0);
        assert_eq!(plan.bands, 1);
    }

    #[test]
    fn data_cap_bounds_band_count() {
        // 64x64x4 floats is 64 KiB -> at most 16 bands before the thread cap
        let plan = BandPlan::new(64, 64, 4, 16);
        assert!(plan.bands <= 16);
        assert!(plan.bands >= 1);
    }

    #[test]
    fn explicit_max_threads_is_honored() {
        let plan = BandPlan::new(1024, 1024, 4, 3);
        assert_eq!(plan.bands, 3);
    }

    #[test]
    fn bands_never_exceed_rows() {
        let plan = BandPlan::new(4096, 2, 4, 8);
        assert!(plan.bands <= 2);
    }

    #[test]
    fn split_covers_rows_exactly_and_last_band_absorbs_remainder() {
        let plan = BandPlan {
            row_count: 10,
            bands: 3,
        };
        let bands = plan.split();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0], RowBand { start: 0, end: 3 });
        assert_eq!(bands[1], RowBand { start: 3, end: 6 });
        assert_eq!(bands[2], RowBand { start: 6, end: 10 });
    }

    #[test]
    fn run_pair_writes_disjoint_rows() {
        let plan = BandPlan {
            row_count: 9,
            bands: 4,
        };
        let mut image = vec![0u32; 9 * 5];
        let mut mask = vec![0u8; 9];
        plan.run_pair(&mut image, 5, &mut mask, 1, |band, img, msk| {
            for row in 0..band.len() {
                let y = band.start + row;
                for x in 0..5 {
                    img[row * 5 + x] = (y * 5 + x) as u32;
                }
                msk[row] = y as u8;
            }
        });
        let expect: Vec<u32> = (0..45).collect();
        assert_eq!(image, expect);
        let expect_mask: Vec<u8> = (0..9).collect();
        assert_eq!(mask, expect_mask);
    }

    #[test]
    fn run_single_matches_sequential() {
        let plan = BandPlan {
            row_count: 7,
            bands: 2,
        };
        let mut out = vec![0.0f32; 7 * 3];
        plan.run_single(&mut out, 3, |band, slice| {
            for (i, v) in slice.iter_mut().enumerate() {
                *v = (band.start * 3 + i) as f32;
            }
        });
        let expect: Vec<f32> = (0..21).map(|i| i as f32).collect();
        assert_eq!(out, expect);
    }
}
