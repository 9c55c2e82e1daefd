//! Pure helpers behind the session dropdowns, search boxes and pagers.
//!
//! Everything here is total: records are plain JSON values and a missing or
//! oddly shaped field drops a record from the result instead of failing,
//! because these functions sit on the render path and must never take a page
//! down with them.

use serde_json::Value;

/// Borrow the element slice of a JSON array, treating anything else as empty.
pub fn records(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

/// Unique, lexicographically sorted session tags found across all records.
///
/// The field may hold an array of tags or a single scalar tag; records where
/// it is absent or some other shape are skipped individually.
pub fn extract_sessions(records: &[Value], session_field: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for record in records {
        match record.get(session_field) {
            Some(Value::Array(items)) => {
                tags.extend(items.iter().filter_map(Value::as_str).map(str::to_string));
            }
            Some(Value::String(tag)) => tags.push(tag.clone()),
            _ => {}
        }
    }

    tags.sort();
    tags.dedup();
    tags
}

/// One record collection and the field its session tags live in.
#[derive(Clone, Copy, Debug)]
pub struct SessionSource<'a> {
    pub records: &'a [Value],
    pub session_field: &'a str,
}

/// Deduplicated, sorted union of session tags across several collections,
/// e.g. faculty plus two student cohorts feeding one dropdown.
pub fn extract_sessions_from_sources(sources: &[SessionSource<'_>]) -> Vec<String> {
    let mut tags: Vec<String> = sources
        .iter()
        .flat_map(|source| extract_sessions(source.records, source.session_field))
        .collect();

    tags.sort();
    tags.dedup();
    tags
}

/// Two-stage filter: session membership, then case-insensitive substring
/// search over the listed fields. Relative order of survivors is preserved.
///
/// An empty `selected_session` keeps every record (the "all sessions"
/// dropdown state); a blank `search_term` skips the text stage.
pub fn filter_and_search(
    records: &[Value],
    selected_session: &str,
    search_term: &str,
    search_fields: &[&str],
    session_field: &str,
) -> Vec<Value> {
    let term = search_term.trim().to_lowercase();

    records
        .iter()
        .filter(|record| matches_session(record, selected_session, session_field))
        .filter(|record| term.is_empty() || matches_term(record, &term, search_fields))
        .cloned()
        .collect()
}

fn matches_session(record: &Value, selected: &str, session_field: &str) -> bool {
    if selected.is_empty() {
        return true;
    }

    match record.get(session_field) {
        Some(Value::Array(items)) => items.iter().any(|item| item.as_str() == Some(selected)),
        Some(Value::String(tag)) => tag == selected,
        _ => false,
    }
}

fn matches_term(record: &Value, term: &str, fields: &[&str]) -> bool {
    fields.iter().any(|field| match record.get(*field) {
        Some(Value::String(text)) => text.to_lowercase().contains(term),
        Some(Value::Number(number)) => number.to_string().contains(term),
        _ => false,
    })
}

/// One page cut out of a filtered record list.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSlice<T> {
    pub total_pages: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub items: Vec<T>,
}

/// Slice out the requested page. No bounds validation is performed: a page
/// past the end simply yields no items, and callers reset to page 1 whenever
/// the filter inputs change.
pub fn paginate<T: Clone>(
    records: &[T],
    current_page: usize,
    items_per_page: usize,
) -> PageSlice<T> {
    let total_pages = if items_per_page == 0 {
        0
    } else {
        records.len().div_ceil(items_per_page)
    };

    let start_index = current_page.saturating_sub(1).saturating_mul(items_per_page);
    let end_index = start_index.saturating_add(items_per_page);

    let items = if start_index >= records.len() {
        Vec::new()
    } else {
        records[start_index..end_index.min(records.len())].to_vec()
    };

    PageSlice {
        total_pages,
        start_index,
        end_index,
        items,
    }
}

/// An entry in the rendered pager row.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PagerItem {
    Button {
        key: String,
        label: String,
        page: usize,
        disabled: bool,
        current: bool,
    },
    Ellipsis {
        key: String,
    },
}

const PAGER_WINDOW: usize = 5;

/// Button model for a windowed pager: Previous, up to five numbered buttons
/// centered on the current page, first/last page anchors behind ellipses when
/// the window excludes them, and Next.
///
/// Zero or one total pages is valid input and produces a fully disabled pager
/// with the single current page.
pub fn pagination_buttons(current_page: usize, total_pages: usize) -> Vec<PagerItem> {
    let total = total_pages.max(1);
    let current = current_page.clamp(1, total);

    let mut items = Vec::new();

    items.push(PagerItem::Button {
        key: "prev".to_string(),
        label: "Previous".to_string(),
        page: current.saturating_sub(1).max(1),
        disabled: current == 1,
        current: false,
    });

    let (window_start, window_end) = if total <= PAGER_WINDOW {
        (1, total)
    } else {
        let start = current
            .saturating_sub(PAGER_WINDOW / 2)
            .min(total - PAGER_WINDOW + 1)
            .max(1);
        (start, start.saturating_add(PAGER_WINDOW - 1))
    };

    if window_start > 1 {
        items.push(numbered(1, current));
        if window_start > 2 {
            items.push(PagerItem::Ellipsis {
                key: "gap-low".to_string(),
            });
        }
    }

    for page in window_start..=window_end {
        items.push(numbered(page, current));
    }

    if window_end < total {
        if window_end < total - 1 {
            items.push(PagerItem::Ellipsis {
                key: "gap-high".to_string(),
            });
        }
        items.push(numbered(total, current));
    }

    items.push(PagerItem::Button {
        key: "next".to_string(),
        label: "Next".to_string(),
        page: current.saturating_add(1).min(total),
        disabled: current == total,
        current: false,
    });

    items
}

fn numbered(page: usize, current: usize) -> PagerItem {
    PagerItem::Button {
        key: format!("page-{page}"),
        label: page.to_string(),
        page,
        disabled: false,
        current: page == current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Vec<Value> {
        vec![
            json!({"name": "Ankit Singh", "scholarNumber": 211112001, "branch": "CSE", "session": ["2025-2026"]}),
            json!({"name": "Priya Sharma", "scholarNumber": 211112002, "branch": "ECE", "session": ["2024-2025", "2025-2026"]}),
            json!({"name": "Rahul Verma", "branch": "ME", "session": "2023-2024"}),
            json!({"name": "No Session"}),
        ]
    }

    #[test]
    fn extract_sessions_is_sorted_and_deduped() {
        let sessions = extract_sessions(&roster(), "session");
        assert_eq!(sessions, vec!["2023-2024", "2024-2025", "2025-2026"]);
    }

    #[test]
    fn extract_sessions_degrades_to_empty() {
        assert_eq!(extract_sessions(records(&Value::Null), "session"), Vec::<String>::new());
        assert_eq!(extract_sessions(&[], "session"), Vec::<String>::new());
        assert_eq!(extract_sessions(&[json!({})], "session"), Vec::<String>::new());
        assert_eq!(
            extract_sessions(&[json!({"session": 7})], "session"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn sources_union_is_deduplicated() {
        let faculty = vec![json!({"session": ["2022-2023", "2025-2026"]})];
        let students = roster();
        let sessions = extract_sessions_from_sources(&[
            SessionSource {
                records: &faculty,
                session_field: "session",
            },
            SessionSource {
                records: &students,
                session_field: "session",
            },
        ]);
        assert_eq!(
            sessions,
            vec!["2022-2023", "2023-2024", "2024-2025", "2025-2026"]
        );
    }

    #[test]
    fn filter_matches_array_and_scalar_session_forms() {
        let rows = roster();
        let kept = filter_and_search(&rows, "2025-2026", "", &["name"], "session");
        assert_eq!(kept.len(), 2);

        let scalar = filter_and_search(&rows, "2023-2024", "", &["name"], "session");
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar[0]["name"], "Rahul Verma");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = roster();
        let kept = filter_and_search(&rows, "2025-2026", "singh", &["name"], "session");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0]["name"], "Ankit Singh");
    }

    #[test]
    fn search_spans_multiple_fields_and_numbers() {
        let rows = roster();
        let by_branch = filter_and_search(&rows, "2025-2026", "ece", &["name", "branch"], "session");
        assert_eq!(by_branch.len(), 1);
        assert_eq!(by_branch[0]["name"], "Priya Sharma");

        let by_scholar = filter_and_search(
            &rows,
            "2025-2026",
            "211112001",
            &["name", "scholarNumber"],
            "session",
        );
        assert_eq!(by_scholar.len(), 1);
    }

    #[test]
    fn empty_session_selection_keeps_all_records() {
        let rows = roster();
        let kept = filter_and_search(&rows, "", "", &["name"], "session");
        assert_eq!(kept.len(), rows.len());
    }

    #[test]
    fn filter_is_idempotent() {
        let rows = roster();
        let once = filter_and_search(&rows, "2025-2026", "a", &["name"], "session");
        let twice = filter_and_search(&once, "2025-2026", "a", &["name"], "session");
        assert_eq!(once, twice);
    }

    #[test]
    fn paginate_empty_input() {
        let page = paginate(&Vec::<Value>::new(), 1, 10);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.start_index, 0);
        assert_eq!(page.end_index, 10);
        assert!(page.items.is_empty());
    }

    #[test]
    fn paginate_slices_and_clamps() {
        let rows: Vec<usize> = (0..23).collect();

        let first = paginate(&rows, 1, 10);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items, (0..10).collect::<Vec<_>>());

        let last = paginate(&rows, 3, 10);
        assert_eq!(last.items, (20..23).collect::<Vec<_>>());
        assert_eq!(last.start_index, 20);
        assert_eq!(last.end_index, 30);

        let beyond = paginate(&rows, 9, 10);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn paginate_tolerates_extreme_page_numbers() {
        let page = paginate(&[1, 2, 3], usize::MAX, 10);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());

        let buttons = pagination_buttons(usize::MAX, usize::MAX);
        let current: Vec<&PagerItem> = buttons
            .iter()
            .filter(|item| matches!(item, PagerItem::Button { current: true, .. }))
            .collect();
        assert_eq!(current.len(), 1);
        assert!(matches!(
            buttons.last().unwrap(),
            PagerItem::Button { label, disabled: true, .. } if label == "Next"
        ));
    }

    #[test]
    fn paginate_page_never_exceeds_size() {
        let rows: Vec<usize> = (0..57).collect();
        for page in 1..=10 {
            assert!(paginate(&rows, page, 7).items.len() <= 7);
        }
    }

    #[test]
    fn single_page_pager_is_fully_disabled() {
        let items = pagination_buttons(1, 1);
        assert_eq!(items.len(), 3);
        assert!(matches!(
            &items[0],
            PagerItem::Button { label, disabled: true, .. } if label == "Previous"
        ));
        assert!(matches!(
            &items[1],
            PagerItem::Button { label, current: true, disabled: false, .. } if label == "1"
        ));
        assert!(matches!(
            &items[2],
            PagerItem::Button { label, disabled: true, .. } if label == "Next"
        ));
    }

    #[test]
    fn small_page_counts_show_every_page() {
        let items = pagination_buttons(2, 4);
        let labels: Vec<&str> = items
            .iter()
            .map(|item| match item {
                PagerItem::Button { label, .. } => label.as_str(),
                PagerItem::Ellipsis { .. } => "…",
            })
            .collect();
        assert_eq!(labels, vec!["Previous", "1", "2", "3", "4", "Next"]);
    }

    #[test]
    fn middle_of_long_list_anchors_both_ends() {
        let items = pagination_buttons(10, 20);
        let labels: Vec<String> = items
            .iter()
            .map(|item| match item {
                PagerItem::Button { label, .. } => label.clone(),
                PagerItem::Ellipsis { .. } => "…".to_string(),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Previous", "1", "…", "8", "9", "10", "11", "12", "…", "20", "Next"]
        );

        let current: Vec<&PagerItem> = items
            .iter()
            .filter(|item| matches!(item, PagerItem::Button { current: true, .. }))
            .collect();
        assert_eq!(current.len(), 1);
    }

    #[test]
    fn window_pins_to_edges() {
        let first = pagination_buttons(1, 20);
        let labels: Vec<String> = first
            .iter()
            .map(|item| match item {
                PagerItem::Button { label, .. } => label.clone(),
                PagerItem::Ellipsis { .. } => "…".to_string(),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Previous", "1", "2", "3", "4", "5", "…", "20", "Next"]
        );

        let last = pagination_buttons(20, 20);
        let labels: Vec<String> = last
            .iter()
            .map(|item| match item {
                PagerItem::Button { label, .. } => label.clone(),
                PagerItem::Ellipsis { .. } => "…".to_string(),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Previous", "1", "…", "16", "17", "18", "19", "20", "Next"]
        );
    }

    #[test]
    fn near_edge_window_drops_redundant_ellipsis() {
        // Window [2..6]: page 1 is adjacent, so no low ellipsis.
        let items = pagination_buttons(4, 20);
        let labels: Vec<String> = items
            .iter()
            .map(|item| match item {
                PagerItem::Button { label, .. } => label.clone(),
                PagerItem::Ellipsis { .. } => "…".to_string(),
            })
            .collect();
        assert_eq!(
            labels,
            vec!["Previous", "1", "2", "3", "4", "5", "6", "…", "20", "Next"]
        );
    }
}
