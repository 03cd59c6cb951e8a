use std::collections::BTreeMap;

use crate::shared::frame::Frame;

use super::face_geometry::FaceGeometry;

/// Identifies one face crop: the track it belongs to and its position
/// within that track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackKey {
    pub track_id: usize,
    pub position: usize,
}

impl TrackKey {
    pub fn new(track_id: usize, position: usize) -> Self {
        Self { track_id, position }
    }
}

#[derive(Clone, Debug)]
pub struct CropRecord {
    pub image: Frame,
    pub geometry: FaceGeometry,
    pub frame_index: usize,
}

/// Face crops for one video, keyed by track and position.
///
/// Filled once while crops are cut, then only read. Positions whose crop
/// was degenerate are never inserted, so a track may have gaps.
#[derive(Debug, Default)]
pub struct TrackStore {
    records: BTreeMap<TrackKey, CropRecord>,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: TrackKey, record: CropRecord) {
        self.records.insert(key, record);
    }

    pub fn get(&self, key: &TrackKey) -> Option<&CropRecord> {
        self.records.get(key)
    }

    pub fn image(&self, key: &TrackKey) -> Option<&Frame> {
        self.get(key).map(|r| &r.image)
    }

    pub fn geometry(&self, key: &TrackKey) -> Option<&FaceGeometry> {
        self.get(key).map(|r| &r.geometry)
    }

    pub fn frame_index(&self, key: &TrackKey) -> Option<usize> {
        self.get(key).map(|r| r.frame_index)
    }

    /// Stored positions of `track_id` in ascending order.
    pub fn positions(&self, track_id: usize) -> Vec<usize> {
        self.records
            .range(TrackKey::new(track_id, 0)..=TrackKey::new(track_id, usize::MAX))
            .map(|(key, _)| key.position)
            .collect()
    }

    /// Ids of tracks with at least one stored crop, ascending.
    pub fn track_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.records.keys().map(|k| k.track_id).collect();
        ids.dedup();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
