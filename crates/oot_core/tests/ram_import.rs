use oot_core::checksum::{self, CHECKSUM_OFFSET};
use oot_core::container::SaveContainer;
use oot_core::core_api::{ChunkId, ConsoleVersion, CoreErrorCode, ImportSource};
use oot_core::import::{self, extract_ram_record};
use oot_core::layout::SLOT_LEN;
use oot_core::record::{self, NAME_OFFSET, RUPEES_OFFSET, SLOT_INDEX_OFFSET};
use oot_core::text;

fn ram_snapshot(version: ConsoleVersion, name: &str, rupees: u16) -> Vec<u8> {
    let mut ram = vec![0u8; 0x11AC80 + SLOT_LEN];
    let offset = version.ram_offset();
    let context = &mut ram[offset..offset + SLOT_LEN];
    let encoded = text::encode(name).expect("name should encode");
    record::write_bytes(context, NAME_OFFSET, &encoded).expect("name fits");
    record::write_u16_be(context, RUPEES_OFFSET, rupees).expect("rupees fit");
    // A live context carries whatever checksum was last written; make it stale.
    record::write_u16_be(context, CHECKSUM_OFFSET, 0xBEEF).expect("checksum fits");
    ram
}

#[test]
fn console_offsets_match_known_revisions() {
    let offsets: Vec<usize> = ConsoleVersion::ALL.iter().map(|v| v.ram_offset()).collect();
    assert_eq!(
        offsets,
        vec![0x11A5D0, 0x11A790, 0x11AC80, 0x1183D0, 0x118410]
    );
}

#[test]
fn console_version_selectors_are_validated() {
    assert_eq!(
        ConsoleVersion::from_index(2).expect("index 2 exists"),
        ConsoleVersion::Ntsc12
    );
    let err = ConsoleVersion::from_index(5).expect_err("only five versions");
    assert_eq!(err.code, CoreErrorCode::InvalidSelector);

    assert_eq!(
        ConsoleVersion::from_name("PAL-1.1").expect("name should parse"),
        ConsoleVersion::Pal11
    );
    let err = ConsoleVersion::from_name("ntsc-2.0").expect_err("unknown revision");
    assert_eq!(err.code, CoreErrorCode::InvalidSelector);
}

#[test]
fn ram_import_writes_slot_and_backup() {
    let ram = ram_snapshot(ConsoleVersion::Ntsc10, "Link", 250);
    let mut container = SaveContainer::blank();

    let report = import::import(
        ImportSource::Ram {
            snapshot: &ram,
            version: ConsoleVersion::Ntsc10,
            slot: 1,
        },
        &mut container,
    )
    .expect("import should succeed");

    assert_eq!(report.touched, vec![ChunkId::File(2), ChunkId::Backup(2)]);
    assert!(report.warnings.is_empty());

    let primary = container.chunk(ChunkId::File(2)).expect("valid chunk");
    let backup = container.chunk(ChunkId::Backup(2)).expect("valid chunk");
    assert_eq!(primary, backup);
    assert_eq!(primary[SLOT_INDEX_OFFSET], 1);
    assert!(
        checksum::verify(primary, ChunkId::File(2))
            .expect("record is full length")
            .is_valid()
    );

    let view = container.record(ChunkId::File(2)).expect("slot 2 is a record");
    assert_eq!(view.name().expect("name in range"), "Link");
    assert_eq!(view.rupees().expect("rupees in range"), 250);

    let untouched = SaveContainer::blank();
    for id in [ChunkId::File(1), ChunkId::File(3), ChunkId::Backup(1), ChunkId::Backup(3)] {
        assert_eq!(
            container.chunk(id).expect("valid chunk"),
            untouched.chunk(id).expect("valid chunk")
        );
    }
}

#[test]
fn ram_import_reads_the_selected_revision_offset() {
    let ram = ram_snapshot(ConsoleVersion::Pal10, "Malon", 5);
    let record = extract_ram_record(&ram, ConsoleVersion::Pal10, 2).expect("snapshot covers PAL 1.0");
    assert_eq!(text::decode(&record[NAME_OFFSET..NAME_OFFSET + 8]), "Malon");
    assert_eq!(record[SLOT_INDEX_OFFSET], 2);

    let elsewhere =
        extract_ram_record(&ram, ConsoleVersion::Ntsc12, 2).expect("snapshot covers NTSC 1.2");
    assert_eq!(text::decode(&elsewhere[NAME_OFFSET..NAME_OFFSET + 8]), "");
}

#[test]
fn ram_import_replaces_stale_checksum() {
    let ram = ram_snapshot(ConsoleVersion::Ntsc11, "Nabooru", 1);
    let record = extract_ram_record(&ram, ConsoleVersion::Ntsc11, 0).expect("snapshot is large enough");
    let stored = checksum::stored(&record).expect("record is full length");
    assert_ne!(stored, 0xBEEF);
    let computed = checksum::compute(&record, checksum::CHECKSUM_SPAN)
        .expect("record covers the checksum span");
    assert_eq!(stored, computed);
}

#[test]
fn ram_import_rejects_bad_slot_without_mutation() {
    let ram = ram_snapshot(ConsoleVersion::Ntsc10, "Link", 1);
    let mut container = SaveContainer::blank();

    let err = import::import(
        ImportSource::Ram {
            snapshot: &ram,
            version: ConsoleVersion::Ntsc10,
            slot: 3,
        },
        &mut container,
    )
    .expect_err("slot 3 does not exist");
    assert_eq!(err.code, CoreErrorCode::InvalidSelector);
    assert_eq!(container, SaveContainer::blank());
}

#[test]
fn ram_import_rejects_short_snapshot_without_mutation() {
    let ram = vec![0xAAu8; 0x1000];
    let mut container = SaveContainer::blank();

    let err = import::import(
        ImportSource::Ram {
            snapshot: &ram,
            version: ConsoleVersion::Pal11,
            slot: 0,
        },
        &mut container,
    )
    .expect_err("snapshot is far too short");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);
    assert_eq!(container, SaveContainer::blank());
}

#[test]
fn sra_import_replaces_whole_container() {
    let mut source = SaveContainer::blank();
    let ram = ram_snapshot(ConsoleVersion::Ntsc12, "Impa", 42);
    import::import(
        ImportSource::Ram {
            snapshot: &ram,
            version: ConsoleVersion::Ntsc12,
            slot: 0,
        },
        &mut source,
    )
    .expect("ram import should succeed");
    let bytes = source.encode().expect("container should encode");

    let mut target = SaveContainer::blank();
    target.header_mut()[1] = 1;
    let report = import::import(ImportSource::Sra(&bytes), &mut target)
        .expect("sra import should succeed");

    assert_eq!(report.touched.len(), 8);
    assert!(report.warnings.is_empty());
    assert_eq!(target, source);
}

#[test]
fn sra_import_rejects_bad_file_without_mutation() {
    let mut target = SaveContainer::blank();
    target.header_mut()[0] = 2;
    let before = target.clone();

    let err = import::import(ImportSource::Sra(&[0u8; 64]), &mut target)
        .expect_err("64 bytes is not a save file");
    assert_eq!(err.code, CoreErrorCode::MalformedInput);
    assert_eq!(target, before);
}
