use super::SEQ_THRESHOLD;
use num_cpus;
use std::ops::AddAssign;

// parallel prefix sum (in place)
pub fn parallel_scan_sum<T: Send>(array: &mut [T])
where
    for<'t> T: AddAssign<&'t T>,
{
    parallel_scan(array, &|a: &mut T, b: &T| {
        *a += b;
    });
}

// parallel inclusive scan (in place)
pub fn parallel_scan<T: Send, F: Fn(&mut T, &T) + Sync>(array: &mut [T], accumulate_fn: &F) {
    parallel_scan_tune(array, accumulate_fn, num_cpus::get(), SEQ_THRESHOLD);
}

// parallel inclusive scan (in place) with explicit tuning arguments; the slice
// is cut into one chunk per thread and scanned in three passes: per-chunk
// scans, a sequential carry across chunk ends, and a parallel distribution of
// each chunk's incoming total into its body
pub fn parallel_scan_tune<T: Send, F: Fn(&mut T, &T) + Sync>(
    array: &mut [T],
    accumulate_fn: &F,
    threads: usize,
    seq_threshold: usize,
) {
    if threads == 0 {
        panic!("threads cannot be zero!");
    }
    if seq_threshold == 0 {
        panic!("seq_threshold cannot be zero!");
    }

    let len = array.len();
    if threads == 1 || len <= seq_threshold {
        // sequential
        scan_chunk(array, accumulate_fn);
        return;
    }

    let chunk_len = (len + threads - 1) / threads;

    // pass 1: scan every chunk independently
    crossbeam::scope(|scope| {
        let mut chunks = array.chunks_mut(chunk_len);
        let head = chunks.next().unwrap();
        for chunk in chunks {
            scope.spawn(move |_| scan_chunk(chunk, accumulate_fn));
        }
        scan_chunk(head, accumulate_fn);
    })
    .unwrap();

    // pass 2: carry totals across chunk ends, left to right
    let mut boundary = chunk_len;
    while boundary < len {
        let end = usize::min(boundary + chunk_len, len);
        let (prev, tail) = array.split_at_mut(boundary);
        accumulate_fn(&mut tail[end - boundary - 1], &prev[boundary - 1]);
        boundary = end;
    }

    // pass 3: fold each chunk's incoming total into its body (every element
    // but the last, which pass 2 already finished); each segment starts at
    // the previous chunk's final element, which holds that total
    crossbeam::scope(|scope| {
        let mut rest = &mut array[chunk_len - 1..];
        while rest.len() > 1 {
            let take = usize::min(chunk_len, rest.len() - 1);
            let segment = rest;
            let (seg, tail) = segment.split_at_mut(take);
            if take > 1 {
                scope.spawn(move |_| {
                    let (carry, body) = seg.split_at_mut(1);
                    for t in body {
                        accumulate_fn(t, &carry[0]);
                    }
                });
            }
            rest = tail;
        }
    })
    .unwrap();
}

// sequential in-place scan over one chunk
fn scan_chunk<T, F: Fn(&mut T, &T)>(chunk: &mut [T], accumulate_fn: &F) {
    for i in 1..chunk.len() {
        let (prev, now) = chunk.split_at_mut(i);
        accumulate_fn(&mut now[0], &prev[i - 1]);
    }
}
