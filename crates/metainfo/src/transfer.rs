use std::collections::VecDeque;
use std::time::Duration;

use btcore_announce_list::AnnounceList;
use btcore_bencode::{BDecodeOpts, ParseMode};
use btcore_primitives::DurationSinceUnixEpoch;
use btcore_quarks::keys;
use btcore_variant::Variant;

use crate::error::MetainfoError;
use crate::hash::InfoHash;

pub const METADATA_PIECE_SIZE: usize = 16 * 1024;

const REQUEST_QUIET_PERIOD: Duration = Duration::from_secs(3);

/// Outer `.torrent` fields a caller already knows before metadata transfer
/// completes, typically lifted from the magnet link that started the
/// transfer. Wrapped around the validated info dict in [`MetadataTransfer::finish`].
#[derive(Debug, Clone, Default)]
pub struct KnownOuterFields {
    pub announce_list: AnnounceList,
    pub webseeds: Vec<String>,
    pub comment: Option<String>,
}

/// Drives a BEP-9 `ut_metadata` transfer: tracks which 16 KiB metadata
/// pieces are still missing and when each was last requested, so a caller
/// can avoid re-requesting a piece within the quiet period.
#[derive(Debug)]
pub struct MetadataTransfer {
    info_hash: InfoHash,
    total_size: u64,
    pieces: Vec<Option<Vec<u8>>>,
    /// indices not yet received, in request order; an index is moved to
    /// the back whenever it's handed out by `next_request`
    pending: VecDeque<usize>,
    last_requested: Vec<Option<DurationSinceUnixEpoch>>,
}

impl MetadataTransfer {
    #[must_use]
    pub fn new(info_hash: InfoHash, total_size: u64) -> Self {
        let piece_count = piece_count_for(total_size);
        Self {
            info_hash,
            total_size,
            pieces: vec![None; piece_count],
            pending: (0..piece_count).collect(),
            last_requested: vec![None; piece_count],
        }
    }

    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    #[must_use]
    pub fn piece_length(&self, index: usize) -> usize {
        piece_length_at(self.total_size, index)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Returns the next piece index to request, if the piece at the front
    /// of the queue hasn't been requested within the last 3 seconds.
    pub fn next_request(&mut self, now: DurationSinceUnixEpoch) -> Option<usize> {
        let index = *self.pending.front()?;
        let due = match self.last_requested[index] {
            None => true,
            Some(last) => now.saturating_sub(last) > REQUEST_QUIET_PERIOD,
        };
        if !due {
            return None;
        }
        self.pending.pop_front();
        self.pending.push_back(index);
        self.last_requested[index] = Some(now);
        Some(index)
    }

    /// Records a received piece. Ignores pieces that were already received
    /// or whose length doesn't match the expected length at that index.
    pub fn receive_piece(&mut self, index: usize, data: &[u8]) {
        if index >= self.pieces.len() || self.pieces[index].is_some() {
            return;
        }
        if data.len() != self.piece_length(index) {
            return;
        }
        self.pieces[index] = Some(data.to_vec());
        self.pending.retain(|&i| i != index);
        self.last_requested[index] = None;
    }

    /// Discards all received pieces and restarts the transfer from scratch.
    pub fn restart(&mut self) {
        let piece_count = self.pieces.len();
        self.pieces = vec![None; piece_count];
        self.pending = (0..piece_count).collect();
        self.last_requested = vec![None; piece_count];
    }

    /// Assembles the received pieces, validates them against `info_hash`,
    /// and wraps the validated info dict with `known` to produce a
    /// complete `.torrent` byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`MetainfoError::HashMismatch`] if the assembled bytes don't
    /// hash to `info_hash`, restarting the transfer so the caller can
    /// retry, or [`MetainfoError::ParseFailure`] if the transfer isn't
    /// complete yet or the assembled bytes aren't a valid bencoded dict.
    pub fn finish(&mut self, known: &KnownOuterFields) -> Result<Vec<u8>, MetainfoError> {
        let mut assembled = Vec::with_capacity(self.total_size as usize);
        for piece in &self.pieces {
            match piece {
                Some(bytes) => assembled.extend_from_slice(bytes),
                None => {
                    return Err(MetainfoError::ParseFailure("metadata transfer is not yet complete".to_string()));
                }
            }
        }

        let actual = InfoHash::of(&assembled);
        if actual != self.info_hash {
            self.restart();
            return Err(MetainfoError::HashMismatch {
                expected: self.info_hash.to_hex_string(),
                actual: actual.to_hex_string(),
            });
        }

        let (info, _) = btcore_bencode::decode(&assembled, BDecodeOpts::default(), ParseMode::Owned)
            .map_err(|e| MetainfoError::ParseFailure(e.to_string()))?;

        let mut top = Variant::new_map();
        for (key, value) in btcore_announce_list::to_entries(&known.announce_list) {
            top.try_emplace(key, value).unwrap();
        }
        if !known.webseeds.is_empty() {
            let urls = known.webseeds.iter().map(|w| Variant::raw_string(w.clone().into_bytes())).collect();
            top.try_emplace(keys::URL_LIST, Variant::Vector(urls)).unwrap();
        }
        if let Some(comment) = &known.comment {
            top.try_emplace(keys::COMMENT, Variant::raw_string(comment.clone().into_bytes())).unwrap();
        }
        top.try_emplace(keys::INFO, info).unwrap();

        Ok(btcore_bencode::encode(&Variant::Map(top)))
    }
}

#[must_use]
fn piece_count_for(total_size: u64) -> usize {
    if total_size == 0 {
        return 0;
    }
    ((total_size as usize) + METADATA_PIECE_SIZE - 1) / METADATA_PIECE_SIZE
}

#[must_use]
fn piece_length_at(total_size: u64, index: usize) -> usize {
    let start = index * METADATA_PIECE_SIZE;
    let remaining = total_size as usize - start;
    remaining.min(METADATA_PIECE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(bytes: &[u8]) -> InfoHash {
        InfoHash::of(bytes)
    }

    #[test]
    fn piece_count_rounds_up() {
        let transfer = MetadataTransfer::new(hash_of(b"x"), 16_384 * 2 + 1);
        assert_eq!(transfer.piece_count(), 3);
        assert_eq!(transfer.piece_length(2), 1);
    }

    #[test]
    fn next_request_respects_the_quiet_period() {
        let mut transfer = MetadataTransfer::new(hash_of(b"x"), 16_384);
        let t0 = Duration::from_secs(100);
        assert_eq!(transfer.next_request(t0), Some(0));
        assert_eq!(transfer.next_request(t0), None);
        let t1 = t0 + Duration::from_secs(4);
        assert_eq!(transfer.next_request(t1), Some(0));
    }

    #[test]
    fn next_request_is_not_due_at_exactly_the_quiet_period_boundary() {
        let mut transfer = MetadataTransfer::new(hash_of(b"x"), 16_384);
        let t0 = Duration::from_secs(100);
        assert_eq!(transfer.next_request(t0), Some(0));
        let boundary = t0 + REQUEST_QUIET_PERIOD;
        assert_eq!(transfer.next_request(boundary), None);
        let past_boundary = boundary + Duration::from_secs(1);
        assert_eq!(transfer.next_request(past_boundary), Some(0));
    }

    #[test]
    fn receive_piece_ignores_wrong_length_data() {
        let mut transfer = MetadataTransfer::new(hash_of(b"x"), 16_384);
        transfer.receive_piece(0, b"too short");
        assert!(!transfer.is_complete());
    }

    fn sample_info_dict_bytes() -> Vec<u8> {
        let files = vec![crate::types::FileEntry {
            path: "x.bin".into(),
            length: 16_384,
            md5sum: None,
        }];
        let info = crate::serialize::info_dict_variant("x.bin", 16_384, &[[0u8; 20]], &files, false, None);
        btcore_bencode::encode(&info)
    }

    #[test]
    fn finish_succeeds_when_the_hash_matches() {
        let data = sample_info_dict_bytes();
        let info_hash = InfoHash::of(&data);
        let mut transfer = MetadataTransfer::new(info_hash, data.len() as u64);
        let piece_count = transfer.piece_count();
        for index in 0..piece_count {
            let start = index * METADATA_PIECE_SIZE;
            let end = (start + transfer.piece_length(index)).min(data.len());
            transfer.receive_piece(index, &data[start..end]);
        }
        assert!(transfer.is_complete());

        let known = KnownOuterFields {
            announce_list: {
                let mut list = AnnounceList::new();
                list.add("http://tracker.example/announce").unwrap();
                list
            },
            webseeds: vec!["https://seed.example/x.bin".to_string()],
            comment: Some("assembled".to_string()),
        };
        let torrent = transfer.finish(&known).unwrap();

        let metainfo = crate::parse::parse(&torrent).unwrap();
        assert_eq!(metainfo.info_hash, info_hash);
        assert_eq!(metainfo.comment.as_deref(), Some("assembled"));
        assert_eq!(metainfo.webseeds, known.webseeds);
    }

    #[test]
    fn finish_restarts_the_transfer_on_hash_mismatch() {
        let data = vec![9u8; 16_384];
        let wrong_hash = InfoHash::of(b"not the real data");
        let mut transfer = MetadataTransfer::new(wrong_hash, data.len() as u64);
        transfer.receive_piece(0, &data);
        assert!(matches!(
            transfer.finish(&KnownOuterFields::default()),
            Err(MetainfoError::HashMismatch { .. })
        ));
        assert!(!transfer.is_complete());
        assert_eq!(transfer.next_request(Duration::from_secs(0)), Some(0));
    }
}
