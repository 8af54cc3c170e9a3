// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parallel-for over independent lines.
//!
//! The output is broken into `chunks_mut` bands of whole lines, and
//! each band goes to its own scoped thread, so every worker owns the
//! lines it writes and nothing unsafe is needed.  The scope is the
//! barrier: when `for_each_line` returns every line has been written.

/// Call `f(line_index, line)` for every `line_len`-sized line of
/// `cells`.  With the `threaded` feature the lines are split over at
/// most one worker per CPU.
pub(crate) fn for_each_line<T, F>(cells: &mut [T], line_len: usize, f: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    if line_len == 0 || cells.is_empty() {
        return;
    }

    #[cfg(feature = "threaded")]
    {
        let lines = cells.len() / line_len;
        let workers = num_cpus::get().min(lines).max(1);
        if workers > 1 {
            threaded_for_each_line(cells, line_len, workers, &f);
            return;
        }
    }

    cells
        .chunks_mut(line_len)
        .enumerate()
        .for_each(|(y, line)| f(y, line));
}

#[cfg(feature = "threaded")]
fn threaded_for_each_line<T, F>(cells: &mut [T], line_len: usize, workers: usize, f: &F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let lines = cells.len() / line_len;
    let band_lines = (lines + workers - 1) / workers;

    let joined = crossbeam::scope(|scope| {
        for (band, chunk) in cells.chunks_mut(band_lines * line_len).enumerate() {
            scope.spawn(move |_| {
                let first = band * band_lines;
                chunk
                    .chunks_mut(line_len)
                    .enumerate()
                    .for_each(|(i, line)| f(first + i, line));
            });
        }
    });

    // A panicking worker is a bug in `f`; surface it on this thread.
    if let Err(panic) = joined {
        std::panic::resume_unwind(panic);
    }
}
