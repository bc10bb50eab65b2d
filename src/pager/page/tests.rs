use super::*;
use proptest::prelude::*;
use serde_json::json;

fn posts(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"pk": i, "display_url": format!("https://cdn.example.com/{i}.jpg")}))
        .collect()
}

#[test]
fn test_ten_items_page_size_four() {
    let mut list = MediaList::new();
    assert_eq!(list.ingest(&posts(10)), 10);

    let sizes: Vec<usize> = (0..3).map(|i| list.page(4, i).items.len()).collect();
    assert_eq!(sizes, vec![4, 4, 2]);
    assert_eq!(list.page(4, 0).total_pages, 3);

    let clamped = list.page(4, 5);
    assert_eq!(clamped.index, 2);
    assert_eq!(clamped.items.len(), 2);
    assert!(clamped.is_last());
}

#[test]
fn test_negative_index_clamps_to_first() {
    let items = [1, 2, 3];
    let page = build_page(&items, 2, -4);
    assert_eq!(page.index, 0);
    assert!(page.is_first());
    assert_eq!(page.items, &[1, 2]);
    assert_eq!(page.label(), "1/2");
}

#[test]
fn test_empty_list_has_one_page() {
    let items: [u8; 0] = [];
    let page = build_page(&items, 4, 3);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.index, 0);
    assert!(page.items.is_empty());
    assert!(page.is_first() && page.is_last());
}

#[test]
fn test_zero_page_size_is_treated_as_one() {
    let items = [10, 20];
    let page = build_page(&items, 0, 1);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items, &[20]);
}

#[test]
fn test_ingest_dedups_urls_across_batches() {
    let mut list = MediaList::new();
    list.ingest(&posts(3));
    let again = list.ingest(&posts(5));
    assert_eq!(again, 2);
    assert_eq!(list.len(), 5);

    let urls: Vec<_> = list.items().iter().map(|i| i.url.clone().unwrap()).collect();
    assert_eq!(urls[0], "https://cdn.example.com/0.jpg");
    assert_eq!(urls[4], "https://cdn.example.com/4.jpg");
}

#[test]
fn test_ingest_skips_unresolvable_items() {
    let mut list = MediaList::new();
    let added = list.ingest(&[
        json!({"pk": 1, "caption": "no link here"}),
        json!({"pk": 2, "display_url": "https://cdn.example.com/ok.jpg"}),
    ]);
    assert_eq!(added, 1);
    assert_eq!(list.items()[0].owning_post_id.as_deref(), Some("2"));
}

#[test]
fn test_ingest_preserves_carousel_order_within_post() {
    let mut list = MediaList::new();
    list.ingest(&[
        json!({"pk": 1, "display_url": "https://cdn.example.com/a.jpg"}),
        json!({"pk": 2, "carousel_media": [
            {"thumbnail_url": "https://cdn.example.com/b1.jpg"},
            {"thumbnail_url": "https://cdn.example.com/b2.jpg"}
        ]}),
        json!({"pk": 3, "display_url": "https://cdn.example.com/c.jpg"}),
    ]);
    let urls: Vec<_> = list.items().iter().filter_map(|i| i.url.as_deref()).collect();
    assert_eq!(
        urls,
        vec![
            "https://cdn.example.com/a.jpg",
            "https://cdn.example.com/b1.jpg",
            "https://cdn.example.com/b2.jpg",
            "https://cdn.example.com/c.jpg"
        ]
    );
}

#[test]
fn test_clear_resets_dedup_state() {
    let mut list = MediaList::new();
    list.ingest(&posts(2));
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.ingest(&posts(2)), 2);
}

proptest! {
    #[test]
    fn prop_pages_partition_the_list(n in 0usize..200, size in 1usize..20) {
        let items: Vec<usize> = (0..n).collect();
        let total = build_page(&items, size, 0).total_pages;
        prop_assert_eq!(total, std::cmp::max(1, n.div_ceil(size)));

        let mut joined = Vec::new();
        for i in 0..total {
            let page = build_page(&items, size, i as i64);
            prop_assert_eq!(page.index, i);
            prop_assert!(page.items.len() <= size);
            joined.extend_from_slice(page.items);
        }
        prop_assert_eq!(joined, items);
    }

    #[test]
    fn prop_index_is_clamped_and_stable(
        n in 0usize..100,
        size in 0usize..12,
        requested in -50i64..200,
    ) {
        let items: Vec<usize> = (0..n).collect();
        let a = build_page(&items, size, requested);
        let b = build_page(&items, size, requested);
        prop_assert_eq!(a, b);
        prop_assert!(a.index < a.total_pages);
    }
}
