use oot_core::checksum;
use oot_core::container::{HEADER_TEMPLATE, SaveContainer};
use oot_core::core_api::{ChunkId, CoreErrorCode};
use oot_core::layout::{FILE_LEN, HEADER_LEN, PADDING_LEN, SLOT_LEN};
use oot_core::record::{self, NAME_OFFSET, RUPEES_OFFSET};
use oot_core::text;

fn populated_record(name: &str, rupees: u16) -> Vec<u8> {
    let mut record = vec![0u8; SLOT_LEN];
    let encoded = text::encode(name).expect("name should encode");
    record::write_bytes(&mut record, NAME_OFFSET, &encoded).expect("name fits");
    record::write_u16_be(&mut record, RUPEES_OFFSET, rupees).expect("rupees fit");
    checksum::refresh(&mut record).expect("record is long enough");
    record
}

#[test]
fn blank_container_has_template_header_and_zero_chunks() {
    let container = SaveContainer::blank();
    assert_eq!(container.header(), &HEADER_TEMPLATE[..]);
    for slot in 0..3 {
        let primary = container.slot(slot).expect("valid slot");
        let backup = container.backup(slot).expect("valid slot");
        assert_eq!(primary.len(), SLOT_LEN);
        assert!(primary.iter().all(|&b| b == 0));
        assert_eq!(primary, backup);
    }
    let padding = container.chunk(ChunkId::Padding).expect("valid chunk");
    assert_eq!(padding.len(), PADDING_LEN);
    assert!(padding.iter().all(|&b| b == 0));
}

#[test]
fn blank_container_decodes_without_warnings() {
    let encoded = SaveContainer::blank().encode().expect("blank should encode");
    assert_eq!(encoded.len(), FILE_LEN);

    let decoded = SaveContainer::decode(&encoded).expect("blank should decode");
    assert!(decoded.warnings.is_empty());
    assert_eq!(decoded.container, SaveContainer::blank());

    for slot in 0..3 {
        for id in [
            ChunkId::file(slot).expect("valid slot"),
            ChunkId::backup(slot).expect("valid slot"),
        ] {
            let bytes = decoded.container.chunk(id).expect("valid chunk");
            let computed = checksum::compute(bytes, checksum::CHECKSUM_SPAN)
                .expect("record covers the checksum span");
            assert_eq!(computed, 0);
            assert_eq!(checksum::stored(bytes).expect("record is long enough"), 0);
        }
    }
}

#[test]
fn encoded_header_is_word_swapped() {
    let encoded = SaveContainer::blank().encode().expect("blank should encode");
    assert_eq!(
        &encoded[..12],
        &[0x98, 0x00, 0x00, 0x00, 0x5A, 0x21, 0x10, 0x09, 0x41, 0x44, 0x4C, 0x45]
    );
}

#[test]
fn decode_then_encode_reproduces_input() {
    let mut input: Vec<u8> = (0..FILE_LEN).map(|i| (i * 7 % 251) as u8).collect();
    input[HEADER_LEN] ^= 0xFF;

    let decoded = SaveContainer::decode(&input).expect("correctly sized input should decode");
    let encoded = decoded.container.encode().expect("decoded container should encode");
    assert_eq!(encoded, input);
}

#[test]
fn edited_container_roundtrips() {
    let mut container = SaveContainer::blank();
    container
        .replace_slot_pair(0, &populated_record("Link", 99))
        .expect("slot 0 is valid");
    container
        .replace_slot_pair(2, &populated_record("Saria", 500))
        .expect("slot 2 is valid");
    container.header_mut()[0] = 3;

    let encoded = container.encode().expect("container should encode");
    let decoded = SaveContainer::decode(&encoded).expect("encoded container should decode");
    assert!(decoded.warnings.is_empty());
    assert_eq!(decoded.container, container);
}

#[test]
fn decode_rejects_wrong_length() {
    let err = SaveContainer::decode(&vec![0u8; FILE_LEN - 4]).expect_err("short file");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);

    let err = SaveContainer::decode(&vec![0u8; FILE_LEN + 1]).expect_err("long file");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);

    let err = SaveContainer::decode(&[]).expect_err("empty file");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);
}

#[test]
fn corrupted_slot_byte_reports_mismatch_and_still_decodes() {
    let mut encoded = SaveContainer::blank().encode().expect("blank should encode");
    // File-order byte 0x10 of slot 1 lands at record byte 0x13 after the swap.
    encoded[HEADER_LEN + 0x10] = 0x01;

    let decoded = SaveContainer::decode(&encoded).expect("corruption is not fatal");
    assert_eq!(decoded.warnings.len(), 1);

    let mismatch = decoded.warnings[0];
    assert_eq!(mismatch.chunk, ChunkId::File(1));
    assert_eq!(mismatch.computed, 1);
    assert_eq!(mismatch.expected, 0);
    assert_ne!(mismatch.computed, mismatch.expected);

    let slot = decoded.container.slot(0).expect("valid slot");
    assert_eq!(slot[0x13], 0x01);
}

#[test]
fn corrupted_backup_is_tagged_as_backup() {
    let mut encoded = SaveContainer::blank().encode().expect("blank should encode");
    let backup_three = HEADER_LEN + SLOT_LEN * 5;
    encoded[backup_three + 0x200] = 0x80;

    let decoded = SaveContainer::decode(&encoded).expect("corruption is not fatal");
    assert_eq!(decoded.warnings.len(), 1);
    assert_eq!(decoded.warnings[0].chunk, ChunkId::Backup(3));
    assert_eq!(decoded.warnings[0].to_string().split(' ').next(), Some("Backup"));
}

#[test]
fn verify_all_tracks_in_memory_corruption() {
    let mut container = SaveContainer::blank();
    container
        .replace_slot_pair(1, &populated_record("Ruto", 20))
        .expect("slot 1 is valid");
    assert!(container.verify_all().expect("records are full length").is_empty());

    let mut corrupted = container.slot(1).expect("valid slot").to_vec();
    corrupted[0x40] ^= 0x01;
    container
        .replace_slot_pair(1, &corrupted)
        .expect("slot 1 is valid");
    let mismatches = container.verify_all().expect("records are full length");
    let ids: Vec<ChunkId> = mismatches.iter().map(|m| m.chunk).collect();
    assert_eq!(ids, vec![ChunkId::File(2), ChunkId::Backup(2)]);
}

#[test]
fn replace_slot_pair_validates_before_writing() {
    let mut container = SaveContainer::blank();
    let err = container
        .replace_slot_pair(3, &populated_record("Link", 1))
        .expect_err("slot 3 does not exist");
    assert_eq!(err.code, CoreErrorCode::InvalidSelector);

    let err = container
        .replace_slot_pair(0, &[0u8; 10])
        .expect_err("record too short");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);
    assert_eq!(container, SaveContainer::blank());
}

#[test]
fn record_view_rejects_non_record_chunks() {
    let container = SaveContainer::blank();
    let err = container
        .record(ChunkId::Header)
        .expect_err("header is not a record");
    assert_eq!(err.code, CoreErrorCode::InvalidSelector);

    let view = container.record(ChunkId::Backup(1)).expect("backup is a record");
    assert!(view.is_blank());
}

#[test]
fn record_view_rejects_slot_numbers_outside_the_file() {
    let mut container = SaveContainer::blank();
    container
        .replace_slot_pair(0, &populated_record("Ruto", 0x0900))
        .expect("slot 0 exists");

    for id in [ChunkId::File(0), ChunkId::File(4), ChunkId::Backup(5)] {
        let err = container
            .record(id)
            .expect_err("slot number outside 1..=3");
        assert_eq!(err.code, CoreErrorCode::InvalidSelector, "{id}");

        let err = container.chunk(id).expect_err("slot number outside 1..=3");
        assert_eq!(err.code, CoreErrorCode::InvalidSelector, "{id}");
    }

    let view = container.record(ChunkId::Backup(1)).expect("backup 1 exists");
    assert_eq!(view.rupees().expect("rupees in range"), 0x0900);
}
