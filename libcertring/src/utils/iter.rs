use std::collections::VecDeque;
use std::iter::FromIterator;
use std::vec::IntoIter;

/// An iterator that supports arbitrary-length peeking.
///
/// rustlib's [`Peekable`] only peeks at the next item of an iterator. The scanner and parser need
/// to look a few items ahead to decide how to read a token (for example, whether `-` begins a
/// negative literal or a negation), so `PeekIter` keeps a lookahead buffer of any length.
///
/// [`Peekable`]: core::iter::Peekable
pub struct PeekIter<T>
where
    T: Clone,
{
    iter: IntoIter<T>,
    /// Items consumed from `iter` for peeking, but not yet yielded.
    lookahead: VecDeque<Option<T>>,
}

impl<T> PeekIter<T>
where
    T: Clone,
{
    pub fn new(iter: IntoIter<T>) -> Self {
        Self {
            iter,
            lookahead: VecDeque::with_capacity(4),
        }
    }

    /// Returns a reference to the next value in the iterator, without consuming it, or `None` if
    /// the iteration is complete.
    pub fn peek(&mut self) -> Option<&T> {
        if self.lookahead.is_empty() {
            let next = self.iter.next();
            self.lookahead.push_back(next);
        }
        self.lookahead[0].as_ref()
    }

    /// Returns a deque of up to `n` peeked items mapped over a function `f`.
    ///
    /// The length of the returned deque is `n` or the number of items remaining in the iteration,
    /// whichever is lower.
    pub fn peek_map_n<R>(&mut self, n: usize, f: fn(&T) -> R) -> VecDeque<R> {
        while self.lookahead.len() < n {
            let next = self.iter.next();
            self.lookahead.push_back(next);
        }
        self.lookahead
            .iter()
            .take(n)
            .filter_map(|o| o.as_ref())
            .map(f)
            .collect()
    }

    /// Consumes items while they satisfy `pred`, collecting them into `C`. The first item failing
    /// `pred` is not consumed.
    pub fn collect_while<P, C>(&mut self, pred: P) -> C
    where
        P: Fn(&T) -> bool,
        C: FromIterator<T>,
    {
        let mut collected = Vec::new();
        while let Some(item) = self.peek() {
            if !pred(item) {
                break;
            }
            if let Some(item) = self.next() {
                collected.push(item);
            }
        }
        collected.into_iter().collect()
    }
}

impl<T> Iterator for PeekIter<T>
where
    T: Clone,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.lookahead
            .pop_front()
            // `unwrap_or` would advance `iter` eagerly, before the lookahead is checked.
            .unwrap_or_else(|| self.iter.next())
    }
}

#[cfg(test)]
mod tests {
    use super::PeekIter;

    #[test]
    fn peek_does_not_consume() {
        let mut it = PeekIter::new(vec![1, 2, 3].into_iter());
        assert_eq!(it.peek(), Some(&1));
        assert_eq!(it.peek(), Some(&1));
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next(), Some(2));
    }

    #[test]
    fn peek_map_n() {
        let mut it = PeekIter::new(vec![1, 2, 3].into_iter());
        assert_eq!(
            it.peek_map_n(5, |n| n * 10).into_iter().collect::<Vec<_>>(),
            vec![10, 20, 30]
        );
        assert_eq!(it.collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn collect_while() {
        let mut it = PeekIter::new("12ab".chars().collect::<Vec<_>>().into_iter());
        let digits: String = it.collect_while(|c| c.is_ascii_digit());
        assert_eq!(digits, "12");
        assert_eq!(it.next(), Some('a'));
    }
}
