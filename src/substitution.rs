use crate::utils::SharedSlice;
use crate::wavefront::wavefront_tune;
use num_cpus;
use num_traits::Float;

// sequential forward substitution, solving the lower triangular system
// a * x = b in place: a is n*n row major (entries above the diagonal are
// ignored), b is consumed as contributions are subtracted from it, and x
// receives the solution; the caller must provide a non-singular diagonal,
// a zero there silently yields non-finite results
pub fn forward_substitution<T: Float>(x: &mut [T], a: &[T], b: &mut [T]) {
    let n = x.len();
    check_system(n, a, b);

    for i in 0..n {
        for j in 0..i {
            b[i] = b[i] - a[i * n + j] * x[j];
        }
        x[i] = b[i] / a[i * n + i];
    }
}

// blocked forward substitution: the matrix is partitioned into square blocks
// of block_size rows/columns which execute as a wavefront, so blocks in
// different rows run concurrently once their dependencies clear; block_size
// must evenly divide x.len()
pub fn parallel_forward_substitution<T>(x: &mut [T], a: &[T], b: &mut [T], block_size: usize)
where
    T: Float + Send + Sync,
{
    parallel_forward_substitution_tune(x, a, b, block_size, num_cpus::get());
}

// blocked forward substitution on an explicit number of worker threads
pub fn parallel_forward_substitution_tune<T>(
    x: &mut [T],
    a: &[T],
    b: &mut [T],
    block_size: usize,
    threads: usize,
) where
    T: Float + Send + Sync,
{
    if threads == 0 {
        panic!("threads cannot be zero!");
    }
    if block_size == 0 {
        panic!("block_size cannot be zero!");
    }

    let n = x.len();
    check_system(n, a, b);
    if n % block_size != 0 {
        panic!(
            "block_size must evenly divide the system size! (size: {}, block_size: {})",
            n, block_size
        );
    }
    if n == 0 {
        return;
    }

    let num_blocks = n / block_size;
    let x_cell = SharedSlice::new(x);
    let b_cell = SharedSlice::new(b);

    wavefront_tune(
        num_blocks,
        &|r, c| {
            // the wavefront order serializes the blocks of a row left to
            // right and completes a diagonal block before anything below it
            // reads that column of x, so the views taken inside never overlap
            // a concurrently live one
            unsafe { solve_block(r, c, block_size, n, a, &b_cell, &x_cell) };
        },
        threads,
    );
}

fn check_system<T>(n: usize, a: &[T], b: &[T]) {
    if a.len() != n * n {
        panic!(
            "matrix length must be the square of the solution length! (expected: {}, found: {})",
            n * n,
            a.len()
        );
    }
    if b.len() != n {
        panic!(
            "right hand side length must match the solution length! (expected: {}, found: {})",
            n,
            b.len()
        );
    }
}

// applies block (r, c): subtracts this block's column span from b over the
// block's rows, finalizing x on the diagonal block; subtraction runs in
// ascending column order so the result is bit-identical to the sequential
// recurrence
// safety: the caller must guarantee exclusive access to the touched ranges
unsafe fn solve_block<T: Float>(
    r: usize,
    c: usize,
    block_size: usize,
    n: usize,
    a: &[T],
    b_cell: &SharedSlice<T>,
    x_cell: &SharedSlice<T>,
) {
    let row_start = r * block_size;
    let col_start = c * block_size;
    let b = b_cell.range_mut(row_start..row_start + block_size);

    if r == c {
        // the diagonal block reads and writes the same span of x
        let x = x_cell.range_mut(col_start..col_start + block_size);
        for bi in 0..block_size {
            let i = row_start + bi;
            for xj in 0..bi {
                b[bi] = b[bi] - a[i * n + col_start + xj] * x[xj];
            }
            x[bi] = b[bi] / a[i * n + i];
        }
    } else {
        let x = x_cell.range(col_start..col_start + block_size);
        for bi in 0..block_size {
            let i = row_start + bi;
            for xj in 0..block_size {
                b[bi] = b[bi] - a[i * n + col_start + xj] * x[xj];
            }
        }
    }
}
