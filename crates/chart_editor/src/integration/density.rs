//! Note density: a per-object sample cache and a background sampler.
//!
//! Both read the chart's [`SharedHitObjects`]. The cache is updated by edit
//! actions on the editing thread; the sampler runs on its own thread and
//! takes the list lock for each sampling pass.

use std::collections::{BTreeMap, HashMap};
use std::thread::{self, JoinHandle};

use chart_core::{HitObject, HitObjectId, SharedHitObjects};
use crossbeam_channel::{unbounded, Receiver, Sender};

use super::{CollaboratorError, CollaboratorResult, DensityCache};

/// Note count per bin index. Empty bins are absent.
pub type DensityBins = BTreeMap<u32, u32>;

/// Count of note starts per bin of `bin_ms` milliseconds.
pub fn density_bins(start_times: impl IntoIterator<Item = i32>, bin_ms: u32) -> DensityBins {
    let bin_ms = bin_ms.max(1);
    let mut bins = DensityBins::new();
    for time in start_times {
        *bins.entry(time.max(0) as u32 / bin_ms).or_insert(0) += 1;
    }
    bins
}

/// Density cache keyed by hit object identity.
#[derive(Debug)]
pub struct NoteDensityCache {
    source: SharedHitObjects,
    bin_ms: u32,
    samples: HashMap<HitObjectId, i32>,
    bins: DensityBins,
    recache_count: usize,
}

impl NoteDensityCache {
    /// Build a cache over `source`, sampling every object it holds.
    pub fn new(source: SharedHitObjects, bin_ms: u32) -> Self {
        let samples = source
            .lock()
            .iter()
            .map(|h| (h.id, h.start_time))
            .collect();
        let mut cache = Self {
            source,
            bin_ms: bin_ms.max(1),
            samples,
            bins: DensityBins::new(),
            recache_count: 0,
        };
        cache.rebuild();
        cache
    }

    pub fn bin_ms(&self) -> u32 {
        self.bin_ms
    }

    pub fn bins(&self) -> &DensityBins {
        &self.bins
    }

    /// Notes starting in the bin that contains `time`.
    pub fn density_at(&self, time: i32) -> u32 {
        let bin = time.max(0) as u32 / self.bin_ms;
        self.bins.get(&bin).copied().unwrap_or(0)
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    pub fn max_density(&self) -> u32 {
        self.bins.values().copied().max().unwrap_or(0)
    }

    /// Number of aggregate rebuilds requested through [`DensityCache`].
    pub fn recache_count(&self) -> usize {
        self.recache_count
    }

    fn rebuild(&mut self) {
        self.bins = density_bins(self.samples.values().copied(), self.bin_ms);
    }
}

impl DensityCache for NoteDensityCache {
    fn refresh_sample(&mut self, hit_object: &HitObject) -> CollaboratorResult {
        match self.source.get(hit_object.id) {
            Some(current) => {
                self.samples.insert(current.id, current.start_time);
            }
            None => {
                self.samples.remove(&hit_object.id);
            }
        }
        Ok(())
    }

    fn force_recache(&mut self) -> CollaboratorResult {
        self.rebuild();
        self.recache_count += 1;
        Ok(())
    }
}

enum SamplerRequest {
    Sample,
    Shutdown,
}

/// Background density sampler.
///
/// Each request makes the worker lock the hit object list, bin the start
/// times and send the result back.
pub struct DensitySampler {
    requests: Sender<SamplerRequest>,
    results: Receiver<DensityBins>,
    handle: Option<JoinHandle<()>>,
}

impl DensitySampler {
    pub fn spawn(source: SharedHitObjects, bin_ms: u32) -> Result<Self, CollaboratorError> {
        let (requests, request_rx) = unbounded();
        let (result_tx, results) = unbounded();

        let handle = thread::Builder::new()
            .name("density-sampler".into())
            .spawn(move || {
                for request in request_rx {
                    match request {
                        SamplerRequest::Sample => {
                            let bins = {
                                let objects = source.lock();
                                density_bins(objects.iter().map(|h| h.start_time), bin_ms)
                            };
                            if result_tx.send(bins).is_err() {
                                break;
                            }
                        }
                        SamplerRequest::Shutdown => break,
                    }
                }
                log::debug!("Density sampler stopped");
            })
            .map_err(|e| CollaboratorError::new(format!("Failed to spawn density sampler: {}", e)))?;

        Ok(Self {
            requests,
            results,
            handle: Some(handle),
        })
    }

    /// Ask for a new sample without waiting.
    pub fn request(&self) {
        let _ = self.requests.send(SamplerRequest::Sample);
    }

    /// Most recent finished sample, discarding older ones.
    pub fn latest(&self) -> Option<DensityBins> {
        self.results.try_iter().last()
    }

    /// Request a sample and wait for it.
    pub fn sample_blocking(&self) -> Option<DensityBins> {
        self.request();
        self.results.recv().ok()
    }
}

impl Drop for DensitySampler {
    fn drop(&mut self) {
        let _ = self.requests.send(SamplerRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Density sampler thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chart_core::HitObjectList;

    fn note(id: u64, start: i32) -> HitObject {
        HitObject::new(HitObjectId::from_raw(id), start, 1)
    }

    #[test]
    fn test_density_bins() {
        assert_eq!(
            density_bins([0, 10, 999, 1000, 2500], 1000),
            DensityBins::from([(0, 3), (1, 1), (2, 1)])
        );
        assert!(density_bins(Vec::new(), 1000).is_empty());
    }

    #[test]
    fn test_narrow_bins_stay_sparse() {
        let bins = density_bins([5, 600_000, 600_000], 1);
        assert_eq!(bins, DensityBins::from([(5, 1), (600_000, 2)]));

        let source = SharedHitObjects::new(HitObjectList::from_vec(vec![note(1, 0), note(2, 5000)]));
        let cache = NoteDensityCache::new(source, 1000);
        assert_eq!(cache.bins().len(), 2);
        assert_eq!(cache.density_at(5999), 1);
        assert_eq!(cache.density_at(3000), 0);
        assert_eq!(cache.max_density(), 1);
    }

    #[test]
    fn test_refresh_follows_source() {
        let source = SharedHitObjects::new(HitObjectList::from_vec(vec![note(1, 100)]));
        let mut cache = NoteDensityCache::new(source.clone(), 1000);
        assert_eq!(cache.bins(), &DensityBins::from([(0, 1)]));

        let added = note(2, 1500);
        source.lock().push(added.clone());
        cache.refresh_sample(&added).unwrap();
        cache.force_recache().unwrap();
        assert_eq!(cache.bins(), &DensityBins::from([(0, 1), (1, 1)]));

        source.lock().remove(added.id);
        cache.refresh_sample(&added).unwrap();
        cache.force_recache().unwrap();
        assert_eq!(cache.bins(), &DensityBins::from([(0, 1)]));
        assert_eq!(cache.recache_count(), 2);
    }

    #[test]
    fn test_sampler_reads_shared_list() {
        let source = SharedHitObjects::default();
        let sampler = DensitySampler::spawn(source.clone(), 500).unwrap();

        assert_eq!(sampler.sample_blocking(), Some(DensityBins::new()));

        {
            let mut objects = source.lock();
            objects.push(note(1, 100));
            objects.push(note(2, 700));
            objects.sort();
        }
        assert_eq!(sampler.sample_blocking(), Some(DensityBins::from([(0, 1), (1, 1)])));
    }
}
