// Fixed-size chunking for flat sequences.
//
// The sparse document-topics layout produced by the external tool lists a
// variable number of (topic, share) fields per line. Parsing those pairs is
// the one consumer of this utility, but it works on any iterator — including
// streamed input of unknown length.

/// Group an iterator's elements into `size`-length chunks, padding the final
/// chunk with clones of `fill` when the input length is not a multiple of
/// `size`.
///
/// The returned iterator is lazy: nothing is consumed until the caller asks
/// for a chunk. `size` must be at least 1.
pub fn chunked<I>(iter: I, size: usize, fill: I::Item) -> Chunked<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Clone,
{
    assert!(size >= 1, "chunk size must be at least 1");
    Chunked {
        iter: iter.into_iter(),
        size,
        fill,
    }
}

/// Iterator adapter produced by [`chunked`].
pub struct Chunked<I>
where
    I: Iterator,
{
    iter: I,
    size: usize,
    fill: I::Item,
}

impl<I> Iterator for Chunked<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Vec<I::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut chunk = Vec::with_capacity(self.size);
        for _ in 0..self.size {
            match self.iter.next() {
                Some(item) => chunk.push(item),
                None => break,
            }
        }
        if chunk.is_empty() {
            return None;
        }
        // Pad a short final chunk up to the full size
        while chunk.len() < self.size {
            chunk.push(self.fill.clone());
        }
        Some(chunk)
    }
}
