//! Property-based tests using proptest
//!
//! These tests verify URL construction for arbitrary identifiers and
//! lossless JSON round-trips of dataview documents.

use proptest::prelude::*;
use sds_dataviews::dataview::{DataviewPaths, Decodable};
use sds_dataviews::Dataview;
use serde_json::{json, Map, Value};
use url::Url;

const API_ROOT: &str = "https://sds.example/api/v1";

/// Identifiers mixing safe characters with ones that need escaping
fn arb_id() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 _./?#%-]{1,40}"
}

/// Generate an arbitrary dataview document
fn arb_dataview_doc() -> impl Strategy<Value = Value> {
    (
        "[a-zA-Z0-9_-]{1,30}",
        prop::option::of("[a-zA-Z ]{0,30}"),
        prop::collection::btree_map("[A-Z][a-zA-Z]{0,15}", any::<i64>(), 0..6),
    )
        .prop_map(|(id, name, extras)| {
            let mut doc = Map::new();
            doc.insert("Id".to_string(), json!(id));
            if let Some(name) = name {
                doc.insert("Name".to_string(), json!(name));
            }
            for (key, value) in extras {
                if key != "Id" && key != "Name" {
                    doc.insert(key, json!(value));
                }
            }
            Value::Object(doc)
        })
}

proptest! {
    /// Every path starts with the tenant prefix and has no raw reserved characters
    #[test]
    fn paths_are_rooted_and_escaped(
        tenant in arb_id(),
        ns in arb_id(),
        dv in arb_id(),
        group in arb_id(),
    ) {
        let paths = DataviewPaths::new(API_ROOT, &tenant);
        let prefix = format!("{}/Tenants/", API_ROOT);

        for url in [
            paths.dataviews(&ns),
            paths.dataview(&ns, &dv),
            paths.datagroups(&ns, &dv),
            paths.datagroup(&ns, &dv, &group),
            paths.preview_interpolated(&ns, &dv),
            paths.data_interpolated(&ns, &dv),
        ] {
            prop_assert!(url.starts_with(&prefix));
            let tail = &url[API_ROOT.len()..];
            prop_assert!(!tail.contains('?'));
            prop_assert!(!tail.contains('#'));
            prop_assert!(!tail.contains(' '));
        }
    }

    /// The path segment count is fixed regardless of identifier contents
    #[test]
    fn segment_count_is_stable(ns in arb_id(), dv in arb_id(), group in arb_id()) {
        let paths = DataviewPaths::new(API_ROOT, "tenant");
        let depth = |url: String| url[API_ROOT.len()..].matches('/').count();

        prop_assert_eq!(depth(paths.dataviews(&ns)), 5);
        prop_assert_eq!(depth(paths.dataview(&ns, &dv)), 6);
        prop_assert_eq!(depth(paths.datagroup(&ns, &dv, &group)), 8);
        prop_assert_eq!(depth(paths.data_interpolated(&ns, &dv)), 8);
    }

    /// After URL parsing every id is still exactly one path segment
    #[test]
    fn parsed_urls_keep_each_id_in_its_segment(
        ns in arb_id(),
        dv in arb_id(),
        group in arb_id(),
    ) {
        for id in [&ns, &dv, &group] {
            prop_assume!(id.as_str() != "." && id.as_str() != "..");
        }
        let paths = DataviewPaths::new(API_ROOT, "tenant");

        let url = Url::parse(&paths.datagroup(&ns, &dv, &group)).unwrap();
        let segments: Vec<String> = url
            .path_segments()
            .unwrap()
            .map(|s| urlencoding::decode(s).unwrap().into_owned())
            .collect();
        prop_assert_eq!(
            segments,
            vec![
                "api".to_string(), "v1".to_string(), "Tenants".to_string(), "tenant".to_string(),
                "Namespaces".to_string(), ns.clone(), "Dataviews".to_string(), dv.clone(),
                "Datagroups".to_string(), group.clone(),
            ]
        );
        prop_assert!(url.query().is_none());
        prop_assert!(url.fragment().is_none());

        let url = Url::parse(&paths.data_interpolated(&ns, &dv)).unwrap();
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        prop_assert_eq!(segments.len(), 10);
        prop_assert_eq!(&segments[8..], &["data", "interpolated"]);
    }

    /// Nested paths extend their parent
    #[test]
    fn nested_paths_extend_parent(ns in arb_id(), dv in arb_id(), group in arb_id()) {
        let paths = DataviewPaths::new(API_ROOT, "tenant");
        prop_assert!(paths.dataview(&ns, &dv).starts_with(&paths.dataviews(&ns)));
        prop_assert!(paths.datagroup(&ns, &dv, &group).starts_with(&paths.datagroups(&ns, &dv)));
    }

    /// Dataview documents survive decode and encode unchanged
    #[test]
    fn dataview_round_trip_is_lossless(doc in arb_dataview_doc()) {
        let dataview = Dataview::decode(doc.clone()).unwrap();
        prop_assert_eq!(dataview.to_json().unwrap(), doc);
    }
}
