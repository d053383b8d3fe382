use oliva_core::{
    Cell, CellLocation, EditError, ModelError, Notebook, NotebookOptions, SectionKind,
    SectionLocation,
};

fn notebook() -> Notebook {
    Notebook::with_id("nb", "Ada", NotebookOptions::default()).unwrap()
}

fn ids(nb: &Notebook, page_index: usize, kind: SectionKind) -> Vec<String> {
    nb.page(page_index)
        .unwrap()
        .section(kind)
        .cells()
        .iter()
        .map(|cell| cell.id.clone())
        .collect()
}

fn page_ids(nb: &Notebook) -> Vec<String> {
    nb.pages().iter().map(|page| page.id.clone()).collect()
}

#[test]
fn add_page_appends_blank_page_with_count_derived_id() {
    let mut nb = notebook();
    assert_eq!(nb.add_page(), 1);
    assert_eq!(nb.add_page(), 2);

    assert_eq!(page_ids(&nb), vec!["page-0", "page-1", "page-2"]);
    assert_eq!(ids(&nb, 2, SectionKind::Cue), vec!["cue-cell-0"]);
}

#[test]
fn add_page_after_delete_never_reuses_an_existing_id() {
    let mut nb = notebook();
    nb.add_page();
    nb.add_page();
    nb.delete_page(0).unwrap();

    nb.add_page();
    assert_eq!(page_ids(&nb), vec!["page-1", "page-2", "page-3"]);
}

#[test]
fn move_page_reorders_and_validates_both_indices() {
    let mut nb = notebook();
    nb.add_page();
    nb.add_page();

    nb.move_page(2, 0).unwrap();
    assert_eq!(page_ids(&nb), vec!["page-2", "page-0", "page-1"]);

    let err = nb.move_page(0, 3).unwrap_err();
    assert_eq!(
        err,
        EditError::Model(ModelError::PageIndexOutOfRange { index: 3, len: 3 })
    );
    assert_eq!(page_ids(&nb), vec!["page-2", "page-0", "page-1"]);
}

#[test]
fn delete_page_rejects_bad_index_and_last_page() {
    let mut nb = notebook();
    assert_eq!(
        nb.delete_page(0).unwrap_err(),
        EditError::Model(ModelError::LastPage)
    );
    assert!(matches!(
        nb.delete_page(5).unwrap_err(),
        EditError::Model(ModelError::PageIndexOutOfRange { .. })
    ));

    nb.add_page();
    let removed = nb.delete_page(0).unwrap();
    assert_eq!(removed.id, "page-0");
    assert_eq!(page_ids(&nb), vec!["page-1"]);
}

#[test]
fn summary_accepts_seven_ten_mm_cells_and_rejects_the_eighth() {
    let mut nb = notebook();
    nb.delete_cell(0, SectionKind::Summary, 0).unwrap();
    assert_eq!(nb.capacity_mm(SectionKind::Summary), 74.25);

    for _ in 0..7 {
        nb.add_cell_to_page(0, SectionKind::Summary).unwrap();
    }
    let before = ids(&nb, 0, SectionKind::Summary);
    assert_eq!(before.len(), 7);

    let err = nb.add_cell_to_page(0, SectionKind::Summary).unwrap_err();
    match err {
        EditError::Capacity {
            kind,
            page_id,
            capacity_mm,
            required_mm,
        } => {
            assert_eq!(kind, SectionKind::Summary);
            assert_eq!(page_id, "page-0");
            assert_eq!(capacity_mm, 74.25);
            assert_eq!(required_mm, 80.0);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(ids(&nb, 0, SectionKind::Summary), before);
}

#[test]
fn add_cell_does_not_cascade_to_later_pages() {
    let mut nb = notebook();
    nb.add_page();
    nb.delete_cell(0, SectionKind::Summary, 0).unwrap();
    for _ in 0..7 {
        nb.add_cell_to_page(0, SectionKind::Summary).unwrap();
    }

    assert!(nb.add_cell_to_page(0, SectionKind::Summary).is_err());
    assert_eq!(ids(&nb, 1, SectionKind::Summary), vec!["summary-cell-0"]);
    assert_eq!(nb.page_count(), 2);
}

#[test]
fn add_cell_ids_are_scoped_to_section_kind() {
    let mut nb = notebook();
    let content_id = nb.add_cell_to_page(0, SectionKind::Content).unwrap();
    let cue_id = nb.add_cell_to_page(0, SectionKind::Cue).unwrap();

    assert_eq!(content_id, "content-cell-1");
    assert_eq!(cue_id, "cue-cell-1");
}

#[test]
fn add_cell_rejects_missing_page() {
    let mut nb = notebook();
    let err = nb.add_cell_to_page(3, SectionKind::Content).unwrap_err();
    assert_eq!(
        err,
        EditError::Model(ModelError::PageIndexOutOfRange { index: 3, len: 1 })
    );
}

#[test]
fn move_cell_in_section_reorders_only_that_section() {
    let mut nb = notebook();
    nb.add_cell_to_page(0, SectionKind::Content).unwrap();
    nb.add_cell_to_page(0, SectionKind::Content).unwrap();

    nb.move_cell_in_section(0, SectionKind::Content, 0, 2).unwrap();
    assert_eq!(
        ids(&nb, 0, SectionKind::Content),
        vec!["content-cell-1", "content-cell-2", "content-cell-0"]
    );

    let err = nb
        .move_cell_in_section(0, SectionKind::Content, 0, 3)
        .unwrap_err();
    assert!(matches!(
        err,
        EditError::Model(ModelError::CellIndexOutOfRange { index: 3, len: 3, .. })
    ));
}

#[test]
fn move_cell_to_another_section_appends_at_destination() {
    let mut nb = notebook();
    nb.add_cell_to_page(0, SectionKind::Content).unwrap();

    nb.move_cell_to_another_section(0, SectionKind::Content, SectionKind::Cue, 1)
        .unwrap();
    assert_eq!(ids(&nb, 0, SectionKind::Content), vec!["content-cell-0"]);
    assert_eq!(
        ids(&nb, 0, SectionKind::Cue),
        vec!["cue-cell-0", "content-cell-1"]
    );
}

#[test]
fn failed_cross_section_move_restores_source_order() {
    let mut nb = notebook();
    for _ in 0..6 {
        nb.add_cell_to_page(0, SectionKind::Summary).unwrap();
    }
    nb.add_cell_to_page(0, SectionKind::Content).unwrap();
    nb.add_cell_to_page(0, SectionKind::Content).unwrap();
    nb.resize_cell(0, SectionKind::Content, 1, 20.0).unwrap();
    let content_before = ids(&nb, 0, SectionKind::Content);
    let summary_before = ids(&nb, 0, SectionKind::Summary);

    let err = nb
        .move_cell_to_another_section(0, SectionKind::Content, SectionKind::Summary, 1)
        .unwrap_err();
    assert!(matches!(err, EditError::Capacity { kind: SectionKind::Summary, .. }));
    assert_eq!(ids(&nb, 0, SectionKind::Content), content_before);
    assert_eq!(ids(&nb, 0, SectionKind::Summary), summary_before);
    assert_eq!(nb.cell(0, SectionKind::Content, 1).unwrap().size, 20.0);
}

#[test]
fn move_cell_to_another_page_checks_destination_page() {
    let mut nb = notebook();
    nb.add_page();
    nb.add_cell_to_page(0, SectionKind::Summary).unwrap();

    nb.move_cell_to_another_page(0, 1, SectionKind::Summary, 1)
        .unwrap();
    assert_eq!(ids(&nb, 0, SectionKind::Summary), vec!["summary-cell-0"]);
    assert_eq!(
        ids(&nb, 1, SectionKind::Summary),
        vec!["summary-cell-0", "summary-cell-1"]
    );

    for _ in 0..5 {
        nb.add_cell_to_page(1, SectionKind::Summary).unwrap();
    }
    let source_before = ids(&nb, 0, SectionKind::Summary);
    let err = nb
        .move_cell_to_another_page(0, 1, SectionKind::Summary, 0)
        .unwrap_err();
    assert!(matches!(err, EditError::Capacity { .. }));
    assert_eq!(ids(&nb, 0, SectionKind::Summary), source_before);
}

#[test]
fn relocate_validates_before_removing() {
    let mut nb = notebook();
    let before = nb.clone();

    let missing_page = nb.relocate_cell(
        CellLocation::new(0, SectionKind::Cue, 0),
        SectionLocation::new(4, SectionKind::Cue),
    );
    assert!(matches!(
        missing_page.unwrap_err(),
        EditError::Model(ModelError::PageIndexOutOfRange { index: 4, .. })
    ));

    let missing_cell = nb.relocate_cell(
        CellLocation::new(0, SectionKind::Cue, 9),
        SectionLocation::new(0, SectionKind::Content),
    );
    assert!(matches!(
        missing_cell.unwrap_err(),
        EditError::Model(ModelError::CellIndexOutOfRange { index: 9, .. })
    ));
    assert_eq!(nb, before);
}

#[test]
fn relocated_cell_keeps_its_id_even_when_destination_has_it() {
    let mut nb = notebook();
    nb.add_page();

    nb.move_cell_to_another_page(0, 1, SectionKind::Summary, 0)
        .unwrap();
    assert_eq!(
        ids(&nb, 1, SectionKind::Summary),
        vec!["summary-cell-0", "summary-cell-0"]
    );

    let fresh = nb.add_cell_to_page(1, SectionKind::Summary).unwrap();
    assert_eq!(fresh, "summary-cell-2");
}

#[test]
fn add_page_after_shrinking_paper_stays_within_capacity() {
    let mut nb = notebook();
    nb.delete_cell(0, SectionKind::Summary, 0).unwrap();
    assert!(nb.change_dimensions(210.0, 30.0, None, None).is_err());

    nb.change_dimensions(210.0, 40.0, None, None).unwrap();
    assert_eq!(nb.capacity_mm(SectionKind::Summary), 10.0);
    nb.add_page();

    nb.validate().unwrap();
    assert!(nb.overfull_sections().is_empty());
    assert!(nb.reflow().unwrap().iter().all(|report| report.is_noop()));
}

#[test]
fn delete_cell_removes_and_returns_cell() {
    let mut nb = notebook();
    nb.add_cell_to_page(0, SectionKind::Cue).unwrap();
    let size_before = nb.page(0).unwrap().cue.total_size();

    let removed = nb.delete_cell(0, SectionKind::Cue, 0).unwrap();
    assert_eq!(removed.id, "cue-cell-0");
    assert_eq!(ids(&nb, 0, SectionKind::Cue), vec!["cue-cell-1"]);
    assert!(nb.page(0).unwrap().cue.total_size() < size_before);

    assert!(nb.delete_cell(0, SectionKind::Cue, 1).is_err());
}

#[test]
fn successful_edits_refresh_modified_timestamp() {
    let mut nb = notebook();
    nb.metadata.modified = "2000-01-01T00:00:00.000Z".to_string();

    nb.set_title("Chemistry");
    assert_ne!(nb.metadata.modified, "2000-01-01T00:00:00.000Z");
    assert_eq!(nb.metadata.title, "Chemistry");
}

#[test]
fn failed_edits_leave_modified_timestamp_alone() {
    let mut nb = notebook();
    nb.metadata.modified = "2000-01-01T00:00:00.000Z".to_string();

    assert!(nb.delete_cell(0, SectionKind::Content, 4).is_err());
    assert!(nb.move_page(0, 1).is_err());
    assert_eq!(nb.metadata.modified, "2000-01-01T00:00:00.000Z");
}

#[test]
fn conservation_holds_through_a_sequence_of_edits() {
    let mut nb = notebook();
    nb.add_page();
    let start: usize = SectionKind::ALL.iter().map(|kind| nb.cell_count(*kind)).sum();

    nb.add_cell_to_page(0, SectionKind::Content).unwrap();
    nb.add_cell_to_page(1, SectionKind::Cue).unwrap();
    nb.move_cell_to_another_section(0, SectionKind::Content, SectionKind::Summary, 0)
        .unwrap();
    nb.move_cell_to_another_page(1, 0, SectionKind::Cue, 1)
        .unwrap();
    nb.move_cell_in_section(0, SectionKind::Cue, 0, 1).unwrap();
    nb.delete_cell(1, SectionKind::Summary, 0).unwrap();
    nb.page_mut(1)
        .unwrap()
        .content
        .push_cell(Cell::blank("content-cell-9", 5.0));

    let end: usize = SectionKind::ALL.iter().map(|kind| nb.cell_count(*kind)).sum();
    assert_eq!(end, start + 2 - 1 + 1);
    assert!(nb.overfull_sections().is_empty());
}
