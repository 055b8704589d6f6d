//! Spaces describing what environments accept and what vector environments fan out.

pub mod space;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

pub use space::Space;

/// A discrete space of integers in [0, n).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discrete {
    n: u32,
}

impl Discrete {
    pub fn new(n: u32) -> Self {
        assert!(n > 0, "Discrete space requires n > 0");
        Self { n }
    }

    pub fn n(&self) -> u32 { self.n }
}

impl Space for Discrete {
    type Element = u32;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        if self.n == 1 { return 0; }
        Uniform::from(0..self.n).sample(rng)
    }

    fn contains(&self, elem: &Self::Element) -> bool { *elem < self.n }
}

/// A box with fixed compile-time length `N` and inclusive per-dimension bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct BoxSpace<T: Copy + PartialOrd, const N: usize> {
    low: [T; N],
    high: [T; N],
}

impl<T: Copy + PartialOrd, const N: usize> BoxSpace<T, N> {
    pub fn new(low: [T; N], high: [T; N]) -> Self {
        for i in 0..N {
            assert!(low[i] <= high[i], "low[{i}] > high[{i}]");
        }
        Self { low, high }
    }

    pub fn low(&self) -> &[T; N] { &self.low }
    pub fn high(&self) -> &[T; N] { &self.high }
}

impl<T, const N: usize> Space for BoxSpace<T, N>
where
    T: Copy + PartialOrd + rand::distributions::uniform::SampleUniform,
{
    type Element = [T; N];

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        let mut arr = self.low;
        for (i, slot) in arr.iter_mut().enumerate() {
            *slot = Uniform::new_inclusive(self.low[i], self.high[i]).sample(rng);
        }
        arr
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        (0..N).all(|i| self.low[i] <= elem[i] && elem[i] <= self.high[i])
    }
}

/// `n` copies of one space, sampled and checked positionally.
///
/// This is the action space of a vector environment: one sample is a
/// `Vec` with one action per instance, in instance order.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch<S> {
    space: S,
    n: usize,
}

impl<S: Space> Batch<S> {
    pub fn new(space: S, n: usize) -> Self {
        assert!(n > 0, "Batch requires n > 0");
        Self { space, n }
    }

    /// The per-instance space shared by every slot.
    pub fn single(&self) -> &S { &self.space }

    pub fn n(&self) -> usize { self.n }
}

impl<S: Space> Space for Batch<S> {
    type Element = Vec<S::Element>;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        (0..self.n).map(|_| self.space.sample(rng)).collect()
    }

    fn contains(&self, elem: &Self::Element) -> bool {
        elem.len() == self.n && elem.iter().all(|e| self.space.contains(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn batch_samples_one_element_per_slot() {
        let mut rng = StdRng::seed_from_u64(7);
        let batch = Batch::new(Discrete::new(3), 5);
        for _ in 0..50 {
            let v = batch.sample(&mut rng);
            assert_eq!(v.len(), 5);
            assert!(batch.contains(&v));
        }
    }

    #[test]
    fn batch_rejects_wrong_length_or_member() {
        let batch = Batch::new(Discrete::new(2), 3);
        assert!(!batch.contains(&vec![0, 1]));
        assert!(!batch.contains(&vec![0, 1, 2]));
        assert!(batch.contains(&vec![1, 1, 0]));
    }

    #[test]
    fn box_space_batch_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let batch = Batch::new(BoxSpace::new([-1.0f32, 0.0], [1.0, 2.0]), 4);
        let v = batch.sample(&mut rng);
        assert!(batch.contains(&v));
        assert!(v.iter().all(|a| a[0] >= -1.0 && a[0] <= 1.0 && a[1] >= 0.0 && a[1] <= 2.0));
    }
}
