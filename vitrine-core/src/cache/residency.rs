use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use vitrine_model::SlideNumber;

/// A slide whose decode has been started. Clones observe the same decode.
#[derive(Clone)]
pub struct ResidentImage<I> {
    slide: SlideNumber,
    location: PathBuf,
    ready: Shared<BoxFuture<'static, Option<I>>>,
}

impl<I> ResidentImage<I>
where
    I: Clone + Send + Sync + 'static,
{
    /// `ready` resolves to `None` when loading or decoding failed.
    pub fn new<F>(slide: SlideNumber, location: PathBuf, ready: F) -> Self
    where
        F: Future<Output = Option<I>> + Send + 'static,
    {
        Self {
            slide,
            location,
            ready: ready.boxed().shared(),
        }
    }

    pub fn slide(&self) -> SlideNumber {
        self.slide
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Waits for the decode to settle.
    pub fn ready(&self) -> impl Future<Output = Option<I>> + Send + 'static {
        self.ready.clone()
    }

    /// The decoded image, if the decode already finished successfully.
    pub fn peek(&self) -> Option<&I> {
        self.ready.peek().and_then(Option::as_ref)
    }
}

impl<I> fmt::Debug for ResidentImage<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResidentImage")
            .field("slide", &self.slide)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Bounded slide → value map with first-in-first-out eviction.
///
/// Reads never refresh an entry's position: the oldest insertion is always
/// the next one out, however recently it was looked up.
#[derive(Debug)]
pub struct ResidencyCache<V> {
    capacity: usize,
    entries: HashMap<SlideNumber, V>,
    order: VecDeque<SlideNumber>,
}

impl<V> ResidencyCache<V> {
    /// A zero capacity is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity + 1),
            order: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, slide: SlideNumber) -> bool {
        self.entries.contains_key(&slide)
    }

    pub fn get(&self, slide: SlideNumber) -> Option<&V> {
        self.entries.get(&slide)
    }

    /// Inserts `value` and returns the evicted entry, if the bound was hit.
    ///
    /// Re-inserting a present slide replaces its value in place without
    /// moving it in the eviction order.
    pub fn insert(
        &mut self,
        slide: SlideNumber,
        value: V,
    ) -> Option<(SlideNumber, V)> {
        if let Some(existing) = self.entries.get_mut(&slide) {
            *existing = value;
            return None;
        }

        self.entries.insert(slide, value);
        self.order.push_back(slide);

        if self.entries.len() > self.capacity {
            let oldest = self.order.pop_front()?;
            return self.entries.remove(&oldest).map(|evicted| (oldest, evicted));
        }
        None
    }

    /// Slides in insertion order, oldest first.
    pub fn slides(&self) -> impl Iterator<Item = SlideNumber> + '_ {
        self.order.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
