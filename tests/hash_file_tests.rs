#[cfg(test)]
mod tests {

    use native_hash_file::{HashFile, HashFileError, HashFileOptions};
    use rand::{Rng, SeedableRng, rngs::StdRng};
    use std::collections::{BTreeSet, HashMap};
    use std::fs::{self, OpenOptions};
    use std::io::Write;
    use tempfile::tempdir;

    fn sorted_ids(hash_file: &HashFile, hash: i32) -> Vec<i32> {
        let mut ids = hash_file.lookup_ids(hash).expect("Lookup failed");
        ids.sort();
        ids
    }

    #[test]
    fn test_new_file_layout() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("layout.hash");

        let hash_file = HashFile::open(&path).expect("Failed to open hash file");

        assert_eq!(hash_file.bucket_count(), 64);
        assert_eq!(hash_file.bucket_size(), 8);
        assert_eq!(hash_file.item_count(), 0);
        assert_eq!(hash_file.record_size(), 68);
        assert_eq!(hash_file.overflow_bucket_count().unwrap(), 0);

        let bytes = fs::read(&path).expect("Failed to read hash file");
        assert_eq!(bytes.len(), 16 + 64 * 68);
        assert_eq!(&bytes[..16], b"nhf\x01\x00\x00\x00\x40\x00\x00\x00\x08\x00\x00\x00\x00");
        assert!(bytes[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("round_trip.hash")).unwrap();

        let pairs = [(7, 1), (-7, 2), (0, 3), (i32::MAX, 4), (i32::MIN, 5)];
        for (hash, id) in pairs {
            hash_file.store_id(hash, id).expect("Failed to store ID");
        }

        for (hash, id) in pairs {
            assert_eq!(
                hash_file.lookup_ids(hash).unwrap(),
                vec![id],
                "Unexpected IDs for hash {}",
                hash
            );
        }
        assert_eq!(hash_file.item_count(), pairs.len() as u32);
    }

    #[test]
    fn test_hash_collisions_yield_all_ids() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("collisions.hash")).unwrap();

        hash_file.store_id(1234, 10).unwrap();
        hash_file.store_id(1234, 11).unwrap();
        // Same bucket, different hash
        hash_file.store_id(1234 + 64, 12).unwrap();

        assert_eq!(sorted_ids(&hash_file, 1234), vec![10, 11]);
        assert_eq!(sorted_ids(&hash_file, 1234 + 64), vec![12]);
        assert!(hash_file.lookup_ids(99).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_of_hash_zero_skips_empty_slots() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("zero.hash")).unwrap();

        assert!(hash_file.lookup_ids(0).unwrap().is_empty());

        hash_file.store_id(0, 9).unwrap();
        assert_eq!(hash_file.lookup_ids(0).unwrap(), vec![9]);
    }

    #[test]
    fn test_overflow_chain_is_traversed() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("overflow.hash")).unwrap();

        for id in 1..=20 {
            hash_file.store_id(5, id).unwrap();
        }

        // 8 slots in the normal bucket, 8 + 4 in two overflow buckets
        assert_eq!(hash_file.overflow_bucket_count().unwrap(), 2);
        assert_eq!(hash_file.bucket_count(), 64);
        assert_eq!(sorted_ids(&hash_file, 5), (1..=20).collect::<Vec<_>>());

        // The iterator is lazy and yields one ID per call
        let mut iter = hash_file.lookup(5);
        assert_eq!(iter.query_hash(), 5);
        assert_eq!(iter.next().unwrap().unwrap(), 1);
        assert_eq!(iter.by_ref().count(), 19);
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_concrete_scenario_hundred_ids_under_one_hash() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("scenario.hash")).unwrap();

        for id in 1..=100 {
            hash_file.store_id(42, id).unwrap();
        }

        let ids: BTreeSet<i32> = hash_file.lookup(42).map(|id| id.unwrap()).collect();
        assert_eq!(ids, (1..=100).collect::<BTreeSet<_>>());
        assert_eq!(hash_file.lookup(42).count(), 100);
        assert_eq!(hash_file.item_count(), 100);
        assert_eq!(hash_file.lookup(43).count(), 0);
    }

    #[test]
    fn test_growth_preserves_contents() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("growth.hash")).unwrap();

        // 384 items trigger the first doubling, 768 the second
        for i in 0..1000 {
            hash_file.store_id(i * 31 - 500, i + 1).unwrap();
        }

        assert_eq!(hash_file.item_count(), 1000);
        assert_eq!(hash_file.bucket_count(), 256);

        for i in 0..1000 {
            assert_eq!(
                hash_file.lookup_ids(i * 31 - 500).unwrap(),
                vec![i + 1],
                "ID lost or duplicated for item {}",
                i
            );
        }
    }

    #[test]
    fn test_growth_rehashes_overflow_buckets() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("overflow_growth.hash");

        let mut hash_file = HashFileOptions::new()
            .initial_bucket_count(4)
            .initial_bucket_size(2)
            .open(&path)
            .unwrap();

        // Few distinct hashes keep long overflow chains alive across every doubling
        for id in 1..=200 {
            hash_file.store_id(id % 7 - 3, id).unwrap();
        }

        assert_eq!(hash_file.item_count(), 200);
        assert_eq!(hash_file.bucket_count(), 256);
        assert!(hash_file.overflow_bucket_count().unwrap() > 0);
        assert!(!dir.path().join("rehash_overflow_growth.hash").exists());

        let mut total = 0;
        for hash in -3..=3 {
            let ids = sorted_ids(&hash_file, hash);
            assert!(ids.iter().all(|id| id % 7 - 3 == hash));
            total += ids.len();
        }
        assert_eq!(total, 200);

        let all: BTreeSet<i32> = (-3..=3)
            .flat_map(|hash| hash_file.lookup_ids(hash).unwrap())
            .collect();
        assert_eq!(all, (1..=200).collect::<BTreeSet<_>>());
    }

    #[test]
    fn test_duplicate_pairs_are_not_deduplicated() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFile::open(&dir.path().join("dupes.hash")).unwrap();

        hash_file.store_id(3, 8).unwrap();
        hash_file.store_id(3, 8).unwrap();

        assert_eq!(hash_file.lookup_ids(3).unwrap(), vec![8, 8]);
        assert_eq!(hash_file.item_count(), 2);
    }

    #[test]
    fn test_store_rejects_reserved_id() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("reserved.hash");
        let mut hash_file = HashFile::open(&path).unwrap();

        let before = fs::read(&path).unwrap();
        let err = hash_file.store_id(1, 0).unwrap_err();

        assert!(matches!(err, HashFileError::ReservedId));
        assert!(!err.is_format_error());
        assert_eq!(hash_file.item_count(), 0);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_clear_resets_state() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("clear.hash");
        let mut hash_file = HashFile::open(&path).unwrap();

        for id in 1..=500 {
            hash_file.store_id(id % 3, id).unwrap();
        }
        let bucket_count = hash_file.bucket_count();
        assert_eq!(bucket_count, 128);
        assert!(hash_file.overflow_bucket_count().unwrap() > 0);

        hash_file.clear().unwrap();

        assert_eq!(hash_file.item_count(), 0);
        assert_eq!(hash_file.bucket_count(), bucket_count);
        assert_eq!(hash_file.overflow_bucket_count().unwrap(), 0);
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            16 + bucket_count as u64 * 68
        );
        for hash in 0..3 {
            assert!(hash_file.lookup_ids(hash).unwrap().is_empty());
        }

        // Still usable after clearing
        hash_file.store_id(1, 77).unwrap();
        assert_eq!(hash_file.lookup_ids(1).unwrap(), vec![77]);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("persistent.hash");

        {
            let mut hash_file = HashFile::open_with_sync(&path, true).unwrap();
            for id in 1..=400 {
                hash_file.store_id(id * 17, id).unwrap();
            }
            hash_file.sync().unwrap();
            hash_file.close().unwrap();
        }

        {
            let hash_file = HashFile::open_existing(&path).expect("Failed to reopen");
            assert_eq!(hash_file.item_count(), 400);
            assert_eq!(hash_file.bucket_count(), 128);
            assert_eq!(hash_file.bucket_size(), 8);

            for id in 1..=400 {
                assert_eq!(hash_file.lookup_ids(id * 17).unwrap(), vec![id]);
            }
        }
    }

    #[test]
    fn test_existing_header_overrides_options() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("geometry.hash");

        HashFileOptions::new()
            .initial_bucket_count(16)
            .initial_bucket_size(4)
            .open(&path)
            .unwrap()
            .close()
            .unwrap();

        let hash_file = HashFileOptions::new()
            .initial_bucket_count(1024)
            .initial_bucket_size(32)
            .open(&path)
            .unwrap();

        assert_eq!(hash_file.bucket_count(), 16);
        assert_eq!(hash_file.bucket_size(), 4);
        assert_eq!(hash_file.record_size(), 36);
    }

    #[test]
    fn test_open_existing_requires_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing.hash");

        match HashFile::open_existing(&path) {
            Err(HashFileError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            other => panic!("Expected NotFound, got {:?}", other),
        }
        assert!(!path.exists());
    }

    fn write_raw(path: &std::path::Path, bytes: &[u8]) {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .expect("Failed to create file");
        file.write_all(bytes).expect("Failed to write file");
    }

    #[test]
    fn test_open_rejects_corrupted_magic() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("magic.hash");

        let mut bytes = b"nhf\x01\x00\x00\x00\x40\x00\x00\x00\x08\x00\x00\x00\x00".to_vec();
        bytes[1] = b'X';
        bytes.extend(vec![0u8; 64 * 68]);
        write_raw(&path, &bytes);

        let err = HashFile::open(&path).unwrap_err();
        assert!(matches!(err, HashFileError::InvalidMagic));
        assert!(err.is_format_error());
        assert_eq!(fs::read(&path).unwrap(), bytes, "Failed open must not modify the file");
    }

    #[test]
    fn test_open_rejects_newer_version() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("version.hash");

        let bytes = b"nhf\x02\x00\x00\x00\x40\x00\x00\x00\x08\x00\x00\x00\x00".to_vec();
        write_raw(&path, &bytes);

        let err = HashFile::open(&path).unwrap_err();
        assert!(matches!(err, HashFileError::NewerVersion(2)));
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_open_rejects_short_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("short.hash");
        write_raw(&path, b"nhf\x01\x00");

        let err = HashFile::open(&path).unwrap_err();
        assert!(matches!(err, HashFileError::FileTooShort { len: 5 }));
    }

    #[test]
    fn test_open_rejects_negative_item_count() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("item_count.hash");

        let mut bytes = b"nhf\x01\x00\x00\x00\x40\x00\x00\x00\x08\xff\xff\xff\xff".to_vec();
        bytes.extend(vec![0u8; 64 * 68]);
        write_raw(&path, &bytes);

        let err = HashFile::open(&path).unwrap_err();
        assert!(matches!(err, HashFileError::InvalidItemCount(-1)));
        assert!(err.is_format_error());
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn test_open_rejects_bucket_table_beyond_file_end() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("oversized.hash");

        // Bucket size 0x7FFFFFFF declares far more data than 64 small records
        let mut bytes = b"nhf\x01\x00\x00\x00\x40\x7f\xff\xff\xff\x00\x00\x00\x00".to_vec();
        bytes.extend(vec![0u8; 64 * 68]);
        write_raw(&path, &bytes);

        let err = HashFile::open(&path).unwrap_err();
        assert!(matches!(
            err,
            HashFileError::TableTruncated {
                file_len: 4368,
                ..
            }
        ));
        assert!(err.is_format_error());
        assert_eq!(fs::read(&path).unwrap(), bytes);

        // A valid header whose bucket table was cut short
        let mut bytes = b"nhf\x01\x00\x00\x00\x40\x00\x00\x00\x08\x00\x00\x00\x00".to_vec();
        bytes.extend(vec![0u8; 10 * 68]);
        write_raw(&path, &bytes);

        let err = HashFile::open_existing(&path).unwrap_err();
        assert!(matches!(
            err,
            HashFileError::TableTruncated {
                table_size: 4368,
                file_len: 696
            }
        ));
    }

    #[test]
    fn test_dump_contents() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFileOptions::new()
            .initial_bucket_count(2)
            .initial_bucket_size(2)
            .open(&dir.path().join("dump.hash"))
            .unwrap();

        hash_file.store_id(1, 5).unwrap();
        hash_file.store_id(-1, 6).unwrap();

        let mut out = Vec::new();
        hash_file.dump_contents(&mut out).unwrap();
        let dump = String::from_utf8(out).unwrap();

        assert!(dump.contains("*** hash file contents ***"));
        assert!(dump.contains("bucket_count=2"));
        assert!(dump.contains("item_count=2"));
        assert!(dump.contains("Bucket 1: [00000000,0] [00000000,0]---> 0"));
        assert!(dump.contains("Bucket 2: [00000001,5] [ffffffff,6]---> 0"));
        assert!(dump.contains("---Overflow Buckets---\n*** end of hash file contents ***"));
    }

    #[test]
    fn test_randomized_workload_matches_model() {
        let dir = tempdir().expect("Failed to create temp dir");
        let mut hash_file = HashFileOptions::new()
            .initial_bucket_count(8)
            .initial_bucket_size(4)
            .open(&dir.path().join("random.hash"))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut model: HashMap<i32, Vec<i32>> = HashMap::new();

        // A narrow hash range forces collisions and overflow chains
        for id in 1..=3_000 {
            let hash = if rng.random_bool(0.3) {
                rng.random_range(-20..20)
            } else {
                rng.random()
            };
            hash_file.store_id(hash, id).unwrap();
            model.entry(hash).or_default().push(id);
        }

        assert_eq!(hash_file.item_count(), 3_000);

        for (hash, expected) in &model {
            assert_eq!(
                &sorted_ids(&hash_file, *hash),
                expected,
                "Mismatch for hash {}",
                hash
            );
        }
    }
}
