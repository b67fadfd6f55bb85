use notesphere_core::view::highlight::highlight_matches;
use notesphere_core::view::list::{filter_notes, list_view, matches_search, ListView};
use notesphere_core::view::table::{table_view, SortKey, TableSort};
use notesphere_core::{Note, NoteId};

fn note(id: &str, title: &str, objective: &str, body: &str, created_at: &str, pinned: bool) -> Note {
    Note {
        id: NoteId::new(id),
        title: title.to_string(),
        objective: objective.to_string(),
        notes_area: body.to_string(),
        created_at: created_at.to_string(),
        is_pinned: pinned,
        images: Vec::new(),
    }
}

fn sample() -> Vec<Note> {
    vec![
        note("25101701", "Rust ownership", "learn borrowing", "moves and copies", "2025-10-17T09:00:00.000Z", false),
        note("25101801", "Groceries", "weekly list", "milk, eggs", "2025-10-18T09:00:00.000Z", true),
        note("25101901", "kubectl", "", "", "2025-10-19T09:00:00.000Z", false),
        note("25101902", "Deploy", "ship v2", "use KUBECTL apply", "2025-10-19T10:00:00.000Z", false),
    ]
}

#[test]
fn every_search_result_matches_in_some_field() {
    let notes = sample();
    for term in ["kubectl", "LIST", "2510", "borrow", "zzz"] {
        let results = filter_notes(&notes, term);
        let needle = term.to_lowercase();
        for hit in &results {
            let fields = [
                hit.id.as_str(),
                hit.title.as_str(),
                hit.objective.as_str(),
                hit.notes_area.as_str(),
            ];
            assert!(fields.iter().any(|f| f.to_lowercase().contains(&needle)));
        }
        let expected = notes.iter().filter(|n| matches_search(n, term)).count();
        assert_eq!(results.len(), expected);
    }
}

#[test]
fn search_matches_body_case_insensitively() {
    let notes = sample();
    let ids = filter_notes(&notes, "kubectl")
        .iter()
        .map(|n| n.id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["25101902", "25101901"]);
}

#[test]
fn blank_search_lists_everything_pinned_first() {
    let notes = sample();
    let ListView::Notes(rows) = list_view(&notes, "   ") else {
        panic!("expected notes");
    };
    let ids = rows.iter().map(|n| n.id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["25101801", "25101902", "25101901", "25101701"]);
}

#[test]
fn list_view_distinguishes_empty_and_no_results() {
    assert_eq!(list_view(&[], "x"), ListView::Empty);
    let notes = sample();
    assert_eq!(
        list_view(&notes, " nothing "),
        ListView::NoResults {
            term: "nothing".to_string()
        }
    );
}

#[test]
fn table_filter_and_sort_compose() {
    let notes = sample();
    let rows = table_view(&notes, "kubectl", Some(TableSort::asc(SortKey::CreatedAt)));
    let ids = rows.iter().map(|n| n.id.to_string()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["25101901", "25101902"]);
}

#[test]
fn highlight_marks_literal_matches_only() {
    assert_eq!(
        highlight_matches("Use kubectl or KUBECTL", "kubectl"),
        "Use <mark>kubectl</mark> or <mark>KUBECTL</mark>"
    );
    assert_eq!(highlight_matches("a.b acb", "a.b"), "<mark>a.b</mark> acb");
    assert_eq!(highlight_matches("unchanged", ""), "unchanged");
}
