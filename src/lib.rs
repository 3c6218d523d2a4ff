//! Core of a BitTorrent client library: the variant data model and its
//! bencode/JSON codecs, the torrent metainfo parser/builder, the
//! announce-list abstraction, and the primitives shared across them (the
//! quark interner, recent-history counters, and the item queue).
//!
//! This crate wires together the `btcore-*` sub-crates (each independently
//! usable) behind a single [`prelude`] module. It does not itself implement
//! a peer protocol, session, or RPC server: those are left to a consuming
//! application, the way the teacher crate's top-level binary consumes its
//! own `packages/*` libraries.

pub mod prelude {
    pub use btcore_announce_list::{
        from_variant, parse_from_text, serialize_to_text, to_entries, AnnounceEntry, AnnounceList, AnnounceListError,
    };
    pub use btcore_bencode::{self as bencode, BDecodeOpts, BencodeError, BencodeErrorKind};
    pub use btcore_clock::{self as clock, CurrentClock, Time};
    pub use btcore_configuration::{Limits, Settings};
    pub use btcore_json::{self as json, JsonError, JsonErrorKind};
    pub use btcore_located_error::{Located, LocatedError};
    pub use btcore_metainfo::{
        build_from_path, encode as encode_metainfo, is_portable, parse as parse_metainfo, parse_magnet, sanitize_subpath,
        to_magnet_uri, to_variant as metainfo_to_variant, BuildOptions, FileEntry, InfoHash, KnownOuterFields, MagnetLink,
        MetadataTransfer, Metainfo, MetainfoError,
    };
    pub use btcore_primitives::{DurationSinceUnixEpoch, ItemQueue, ItemQueueError, RecentHistory, StatsCounters, StatsError};
    pub use btcore_quarks::{intern, keys, lookup, resolve, InternError, Quark};
    pub use btcore_serializer::{
        from_variant_dynamic, get_value, kebab_to_snake, load, register_dynamic, save, set_if_changed, snake_to_kebab,
        to_variant_dynamic, tree_kebab_to_snake, tree_snake_to_kebab, Convert, Field,
    };
    pub use btcore_variant::{walk, VMap, Variant, VariantError, Visitor};
}

#[cfg(test)]
mod tests {
    use btcore_bencode::{decode, encode, BDecodeOpts, ParseMode};
    use btcore_quarks::keys;
    use btcore_variant::{VMap, Variant};

    #[test]
    fn integer_parse() {
        let (value, consumed) = decode(b"i64e", BDecodeOpts::default(), ParseMode::Owned).unwrap();
        assert_eq!(value.int(), Some(64));
        assert_eq!(consumed, 4);
    }

    #[test]
    fn nested_list_parse() {
        let bytes = b"li64ei32ei16ee";
        let (value, _) = decode(bytes, BDecodeOpts::default(), ParseMode::Owned).unwrap();
        let items = value.vector().unwrap();
        let ints: Vec<i64> = items.iter().map(|v| v.int().unwrap()).collect();
        assert_eq!(ints, vec![64, 32, 16]);
        assert_eq!(encode(&value), bytes);
    }

    #[test]
    fn key_sorting_on_serialize() {
        let bytes = b"lld1:bi32e1:ai64eeee";
        let (value, _) = decode(bytes, BDecodeOpts::default(), ParseMode::Owned).unwrap();
        assert_eq!(encode(&value), b"lld1:ai64e1:bi32eeee");
    }

    #[test]
    fn announce_list_sibling_tier_coalescing() {
        let mut list = btcore_announce_list::AnnounceList::new();
        list.add("https://a.example/announce").unwrap();
        list.add("http://a.example/announce").unwrap();
        list.add("udp://a.example:999/announce").unwrap();

        assert!(list.iter().all(|e| e.tier() == 0));
        // entries within a tier are kept sorted by announce URL, not insertion order
        let scrapes: Vec<String> = list.iter().map(|e| e.scrape().to_string()).collect();
        assert_eq!(
            scrapes,
            vec![
                "http://a.example/scrape".to_string(),
                "https://a.example/scrape".to_string(),
                "udp://a.example:999/announce".to_string(),
            ]
        );
    }

    #[test]
    fn magnet_parse_round_trips() {
        let uri = "magnet:?xt=urn:btih:14ffe5dd23188fd5cb53a1d47f1289db70abf31e&dn=name&tr=http%3A%2F%2Ft.example%2Fannounce";
        let link = btcore_metainfo::parse_magnet(uri).unwrap();
        assert_eq!(link.info_hash.to_hex_string(), "14ffe5dd23188fd5cb53a1d47f1289db70abf31e");
        assert_eq!(link.trackers, vec!["http://t.example/announce".to_string()]);
        assert_eq!(link.display_name.as_deref(), Some("name"));

        let rebuilt = btcore_metainfo::to_magnet_uri(&link);
        let reparsed = btcore_metainfo::parse_magnet(&rebuilt).unwrap();
        assert_eq!(reparsed, link);
    }

    #[test]
    fn recent_history_windowed_counts() {
        use std::time::Duration;

        let mut history = btcore_primitives::RecentHistory::<u32, 60>::new();
        history.add(Duration::from_secs(10_000), 1);
        history.add(Duration::from_secs(20_000), 1);
        assert_eq!(history.count(Duration::from_secs(22_000), Duration::from_secs(1_000)), 0);
        assert_eq!(history.count(Duration::from_secs(22_000), Duration::from_secs(3_000)), 1);
        assert_eq!(history.count(Duration::from_secs(22_000), Duration::from_secs(15_000)), 2);
    }

    #[test]
    fn variant_merge_identity_laws() {
        let mut a = Variant::new_map();
        a.try_emplace(keys::NAME, Variant::raw_string(b"a".to_vec())).unwrap();

        let mut merged_with_empty = a.clone();
        merged_with_empty.merge(Variant::new_map());
        assert_eq!(merged_with_empty, a);

        let mut empty = Variant::new_map();
        empty.merge(a.clone());
        assert_eq!(empty, a);
    }

    #[test]
    fn parsed_torrent_info_hash_matches_sha1_of_info_bytes() {
        let mut info = Variant::new_map();
        info.try_emplace(keys::NAME, Variant::raw_string(b"x.bin".to_vec())).unwrap();
        info.try_emplace(keys::PIECE_LENGTH, Variant::Int(16_384)).unwrap();
        info.try_emplace(keys::PIECES, Variant::raw_string(vec![0u8; 20])).unwrap();
        info.try_emplace(keys::LENGTH, Variant::Int(1)).unwrap();

        let mut top = VMap::new();
        top.try_emplace(keys::INFO, info.clone());
        let top = Variant::Map(top);
        let bytes = encode(&top);

        let metainfo = btcore_metainfo::parse(&bytes).unwrap();
        let expected = sha1_of(&encode(&info));
        assert_eq!(metainfo.info_hash.bytes(), expected);
    }

    fn sha1_of(bytes: &[u8]) -> [u8; 20] {
        use sha1::{Digest, Sha1};
        let mut hasher = Sha1::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; 20];
        out.copy_from_slice(&digest);
        out
    }
}
