use crossbeam::channel;
use num_cpus;
use std::sync::atomic::{AtomicUsize, Ordering};

// message on the ready queue; None tells a worker to shut down
type Job = Option<(usize, usize)>;

// runs block_fn once for every block (r, c) with c <= r < num_blocks, in an
// order where (r, c) starts only after (r, c - 1) and (c, c) have finished;
// blocks with no dependency relation may run concurrently on different workers
pub fn wavefront<F: Fn(usize, usize) + Sync>(num_blocks: usize, block_fn: &F) {
    wavefront_tune(num_blocks, block_fn, num_cpus::get());
}

// runs the wavefront on an explicit number of worker threads (the calling
// thread acts as one of the workers)
pub fn wavefront_tune<F: Fn(usize, usize) + Sync>(num_blocks: usize, block_fn: &F, threads: usize) {
    if threads == 0 {
        panic!("threads cannot be zero!");
    }
    if num_blocks == 0 {
        return;
    }

    // per-block count of unfinished predecessors, lower triangle only:
    // (0, 0) has none, diagonal and column 0 blocks have one, interior two
    let mut counters: Vec<AtomicUsize> = Vec::with_capacity(tri(num_blocks, 0));
    for r in 0..num_blocks {
        for c in 0..=r {
            let preds = if r == 0 {
                0
            } else if c == 0 || c == r {
                1
            } else {
                2
            };
            counters.push(AtomicUsize::new(preds));
        }
    }

    let (tx, rx) = channel::unbounded::<Job>();
    tx.send(Some((0, 0))).unwrap();

    crossbeam::scope(|scope| {
        for _ in 1..threads {
            let tx = tx.clone();
            let rx = rx.clone();
            let counters = &counters;
            scope.spawn(move |_| {
                worker(&rx, &tx, counters, num_blocks, threads, block_fn);
            });
        }
        worker(&rx, &tx, &counters, num_blocks, threads, block_fn);
    })
    .unwrap();
}

fn worker<F: Fn(usize, usize) + Sync>(
    rx: &channel::Receiver<Job>,
    tx: &channel::Sender<Job>,
    counters: &[AtomicUsize],
    num_blocks: usize,
    threads: usize,
    block_fn: &F,
) {
    // exits on the None stop message (or a closed channel)
    while let Ok(Some((r, c))) = rx.recv() {
        block_fn(r, c);

        if c < r {
            release(tx, counters, r, c + 1);
        }
        if r + 1 < num_blocks {
            release(tx, counters, r + 1, c);
        }
        if r == num_blocks - 1 && c == num_blocks - 1 {
            // every block precedes this one transitively, so the queue holds
            // no further work; wake each worker once so it can shut down
            for _ in 0..threads {
                tx.send(None).unwrap();
            }
        }
    }
}

// drops one predecessor of (r, c); the drop that reaches zero publishes the block
fn release(tx: &channel::Sender<Job>, counters: &[AtomicUsize], r: usize, c: usize) {
    if counters[tri(r, c)].fetch_sub(1, Ordering::AcqRel) == 1 {
        tx.send(Some((r, c))).unwrap();
    }
}

// flat index of block (r, c) within the lower triangle
fn tri(r: usize, c: usize) -> usize {
    return r * (r + 1) / 2 + c;
}

// run some tests
#[cfg(test)]
mod tests {
    use crate::wavefront::{tri, wavefront, wavefront_tune};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NB: usize = 8;

    // every block runs exactly once, and never before its two predecessors
    #[test]
    fn test_wavefront_dependency_order() {
        let clock = AtomicUsize::new(1);
        let runs: Vec<AtomicUsize> = (0..tri(NB, 0)).map(|_| AtomicUsize::new(0)).collect();
        let stamps: Vec<AtomicUsize> = (0..tri(NB, 0)).map(|_| AtomicUsize::new(0)).collect();

        wavefront_tune(
            NB,
            &|r, c| {
                runs[tri(r, c)].fetch_add(1, Ordering::SeqCst);
                stamps[tri(r, c)].store(clock.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            },
            4,
        );

        for r in 0..NB {
            for c in 0..=r {
                assert_eq!(1, runs[tri(r, c)].load(Ordering::SeqCst));
                let stamp = stamps[tri(r, c)].load(Ordering::SeqCst);
                assert!(stamp > 0);
                if c > 0 {
                    assert!(stamp > stamps[tri(r, c - 1)].load(Ordering::SeqCst));
                }
                if r > c {
                    assert!(stamp > stamps[tri(c, c)].load(Ordering::SeqCst));
                }
            }
        }
    }

    // a single worker degenerates to a sequential topological order
    #[test]
    fn test_wavefront_single_thread() {
        let runs: Vec<AtomicUsize> = (0..tri(NB, 0)).map(|_| AtomicUsize::new(0)).collect();
        wavefront_tune(
            NB,
            &|r, c| {
                runs[tri(r, c)].fetch_add(1, Ordering::SeqCst);
            },
            1,
        );
        for counter in &runs {
            assert_eq!(1, counter.load(Ordering::SeqCst));
        }
    }

    // more workers than blocks
    #[test]
    fn test_wavefront_excess_threads() {
        let runs = AtomicUsize::new(0);
        wavefront_tune(
            2,
            &|_, _| {
                runs.fetch_add(1, Ordering::SeqCst);
            },
            16,
        );
        assert_eq!(3, runs.load(Ordering::SeqCst));
    }

    #[test]
    fn test_wavefront_single_block() {
        let runs = AtomicUsize::new(0);
        wavefront(1, &|r, c| {
            assert_eq!((0, 0), (r, c));
            runs.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(1, runs.load(Ordering::SeqCst));
    }

    // an empty grid is a no-op
    #[test]
    fn test_wavefront_empty() {
        wavefront(0, &|_, _| {
            panic!("no block should run");
        });
    }

    #[test]
    #[should_panic]
    fn test_wavefront_bad_args() {
        wavefront_tune(1, &|_, _| {}, 0);
    }
}
