//! Chunk planning for buffered output.
//!
//! A run of `n_vertex` points is cut into chunks of at most `buffer` points.
//! Chunk `i` is generated with seed `first_seed + i`, so a seeded run is
//! reproducible for a fixed buffer size (changing the buffer changes the output).

use crate::error::SamplingError;

/// One unit of work for a writer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub count: usize,
    pub seed: Option<u64>,
}

/// Chunk sizes: full buffers plus the remainder. Never empty; zero points give one empty chunk.
pub fn chunk_sizes(n_vertex: usize, buffer: usize) -> Result<Vec<usize>, SamplingError> {
    if buffer == 0 {
        return Err(SamplingError::invalid("buffer size must be > 0"));
    }
    let full = n_vertex / buffer;
    let rest = n_vertex % buffer;
    let mut sizes = vec![buffer; full];
    if rest > 0 || sizes.is_empty() {
        sizes.push(rest);
    }
    Ok(sizes)
}

#[inline]
pub fn chunk_seed(first_seed: Option<u64>, index: usize) -> Option<u64> {
    first_seed.map(|s| s.wrapping_add(index as u64))
}

/// Iterator over the chunks of a run.
#[derive(Clone, Debug)]
pub struct ChunkPlan {
    sizes: Vec<usize>,
    first_seed: Option<u64>,
    next: usize,
}

impl ChunkPlan {
    pub fn new(
        n_vertex: usize,
        buffer: usize,
        first_seed: Option<u64>,
    ) -> Result<Self, SamplingError> {
        Ok(Self {
            sizes: chunk_sizes(n_vertex, buffer)?,
            first_seed,
            next: 0,
        })
    }

    pub fn chunk_count(&self) -> usize {
        self.sizes.len()
    }
}

impl Iterator for ChunkPlan {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let count = *self.sizes.get(self.next)?;
        let chunk = Chunk {
            index: self.next,
            count,
            seed: chunk_seed(self.first_seed, self.next),
        };
        self.next += 1;
        Some(chunk)
    }
}
