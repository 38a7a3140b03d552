// Memoized fixpoint. Every distinct argument is evaluated once per cache lifetime;
// recursive calls made by the body go through the same cache.
use std::{collections::HashMap, hash::Hash};

pub struct Memo<A, B, F> {
    f: F,
    cache: HashMap<A, B>,
}

impl<A, B, F> Memo<A, B, F>
where
    A: Eq + Hash + Clone,
    B: Clone,
    F: Fn(&mut dyn FnMut(A) -> B, A) -> B,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            cache: Default::default(),
        }
    }

    pub fn get(&mut self, x: A) -> B {
        memo_call(&self.f, &mut self.cache, x)
    }

    // number of cached arguments
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn memo_call<A, B, F>(f: &F, cache: &mut HashMap<A, B>, x: A) -> B
where
    A: Eq + Hash + Clone,
    B: Clone,
    F: Fn(&mut dyn FnMut(A) -> B, A) -> B,
{
    if let Some(res) = cache.get(&x) {
        return res.clone();
    }
    log::trace!("memo miss, {} cached", cache.len());

    let res = f(&mut |y| memo_call(f, cache, y), x.clone());
    cache.insert(x, res.clone());
    res
}

pub fn fix_memo<A, B, F>(f: F) -> impl FnMut(A) -> B
where
    A: Eq + Hash + Clone,
    B: Clone,
    F: Fn(&mut dyn FnMut(A) -> B, A) -> B,
{
    let mut memo = Memo::new(f);
    move |x| memo.get(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_fib_evaluated_once_per_argument() {
        let evals = Cell::new(0);
        let mut fib = Memo::new(|fib: &mut dyn FnMut(u32) -> u64, n: u32| {
            evals.set(evals.get() + 1);
            if n < 2 {
                n as u64
            } else {
                fib(n - 1) + fib(n - 2)
            }
        });

        assert_eq!(fib.get(90), 2880067194370816120);
        assert_eq!(evals.get(), 91);
        assert_eq!(fib.len(), 91);

        // fully cached now
        assert_eq!(fib.get(50), 12586269025);
        assert_eq!(evals.get(), 91);

        fib.clear();
        assert!(fib.is_empty());
        assert_eq!(fib.get(10), 55);
        assert_eq!(evals.get(), 102);
    }

    #[test]
    fn test_fix_memo_grid_paths() {
        // monotone lattice paths from (r, c) to (0, 0)
        let mut paths = fix_memo(|paths: &mut dyn FnMut((u32, u32)) -> u64, (r, c): (u32, u32)| {
            match (r, c) {
                (0, _) | (_, 0) => 1,
                _ => paths((r - 1, c)) + paths((r, c - 1)),
            }
        });
        assert_eq!(paths((2, 2)), 6);
        assert_eq!(paths((16, 16)), 601080390);
    }
}
