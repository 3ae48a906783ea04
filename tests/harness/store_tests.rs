//! Macro-generated conformance suite for `TransactionStore` backends.
//!
//! The `transaction_store_tests!` macro generates a test module that runs the
//! full list and facet pipeline (`TransactionService`) against a backend, so
//! every backend is held to the same filtering, sorting and paging results.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod harness;
//!
//! use harness::*;
//! use salesdash::storage::InMemoryTransactionStore;
//!
//! transaction_store_tests!(InMemoryTransactionStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## Listing
//! - `test_no_filters_lists_everything_newest_first`
//! - `test_multi_select_stays_in_set`
//! - `test_age_range_is_inclusive` / `test_one_sided_age_bound`
//! - `test_bare_end_date_covers_whole_day` / `test_timestamp_bounds`
//! - `test_inverted_range_matches_nothing`
//! - `test_search_*`, `test_tags_match_any`
//! - `test_dimensions_combine_with_and`
//!
//! ## Sorting and paging
//! - `test_second_page_of_twenty_five`, `test_page_past_end_is_empty`
//! - `test_unknown_sort_key_falls_back_to_date`, `test_unknown_order_is_desc`
//! - `test_sort_by_quantity_breaks_ties_on_id`, `test_sort_by_name`
//!
//! ## Facets and concurrency
//! - `test_facets_are_sorted_distinct_values`, `test_facets_are_stable`
//! - `test_concurrent_lists_do_not_leak`

/// Generate a `TransactionStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an empty store
/// implementing `TransactionStore + 'static`. It is re-evaluated for each
/// test to ensure isolation.
#[macro_export]
macro_rules! transaction_store_tests {
    ($factory:expr) => {
        mod transaction_store_contract_tests {
            use super::*;
            use salesdash::core::predicate::Predicate;
            use salesdash::prelude::*;
            use std::sync::Arc;

            async fn seeded(records: Vec<Transaction>) -> TransactionService {
                let store: Arc<dyn TransactionStore> = Arc::new($factory);
                store.insert_many(records).await.unwrap();
                service_for(store)
            }

            async fn fixture_service() -> TransactionService {
                seeded(fixture_records()).await
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_no_filters_lists_everything_newest_first() {
                let service = fixture_service().await;
                let page = service.list(&params("")).await.unwrap();

                assert_eq!(page.meta.total, FIXTURE_LEN as u64);
                assert_eq!(page.meta.page, 1);
                assert_eq!(page.meta.limit, 10);
                assert_eq!(page.meta.total_pages, 4);
                assert_eq!(page.data.len(), 10);
                assert_eq!(names(&page)[..3], ["Early February", "Late January", "Customer 29"]);

                let dates: Vec<_> = page.data.iter().map(|t| t.meta.date).collect();
                assert!(dates.windows(2).all(|w| w[0] >= w[1]));
            }

            #[tokio::test]
            async fn test_empty_store_lists_nothing() {
                let service = seeded(Vec::new()).await;
                let page = service.list(&params("")).await.unwrap();
                assert!(page.data.is_empty());
                assert_eq!(page.meta.total, 0);
                assert_eq!(page.meta.total_pages, 0);
            }

            #[tokio::test]
            async fn test_multi_select_stays_in_set() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("region=North,South&limit=100"))
                    .await
                    .unwrap();

                let expected = fixture_records()
                    .iter()
                    .filter(|t| t.customer.region == "North" || t.customer.region == "South")
                    .count();
                assert_eq!(page.meta.total, expected as u64);
                assert_eq!(page.data.len(), expected);
                assert!(page
                    .data
                    .iter()
                    .all(|t| t.customer.region == "North" || t.customer.region == "South"));
            }

            #[tokio::test]
            async fn test_age_range_is_inclusive() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("minAge=26&maxAge=40&limit=100"))
                    .await
                    .unwrap();

                let ages: Vec<i64> = page.data.iter().map(|t| t.customer.age).collect();
                assert!(ages.iter().all(|a| (26..=40).contains(a)));
                assert!(ages.contains(&26), "lower bound is inclusive");
                assert!(ages.contains(&40), "upper bound is inclusive");
                assert_eq!(page.meta.total, 11);
            }

            #[tokio::test]
            async fn test_one_sided_age_bound() {
                let service = fixture_service().await;
                let page = service.list(&params("minAge=70&limit=100")).await.unwrap();
                let ages: Vec<i64> = page.data.iter().map(|t| t.customer.age).collect();
                assert_eq!(ages.len(), 4);
                assert!(ages.iter().all(|a| *a >= 70));
            }

            #[tokio::test]
            async fn test_malformed_age_is_ignored() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("minAge=abc&maxAge=19"))
                    .await
                    .unwrap();
                assert_eq!(names(&page), vec!["Asha Rao"]);
            }

            #[tokio::test]
            async fn test_bare_end_date_covers_whole_day() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("startDate=2024-01-01&endDate=2024-01-31&limit=100"))
                    .await
                    .unwrap();

                let found = names(&page);
                assert_eq!(page.meta.total, 31);
                assert!(found.contains(&"Late January".to_string()));
                assert!(!found.contains(&"Early February".to_string()));
                assert!(!found.contains(&"New Year's Eve".to_string()));
            }

            #[tokio::test]
            async fn test_timestamp_bounds() {
                let service = fixture_service().await;
                let page = service
                    .list(&params(
                        "startDate=2024-01-30T10:00:00Z&endDate=2024-02-01T00:00:00Z",
                    ))
                    .await
                    .unwrap();
                assert_eq!(
                    names(&page),
                    vec!["Early February", "Late January", "Customer 29"]
                );
            }

            #[tokio::test]
            async fn test_inverted_range_matches_nothing() {
                let service = fixture_service().await;
                let page = service.list(&params("minAge=50&maxAge=20")).await.unwrap();
                assert!(page.data.is_empty());
                assert_eq!(page.meta.total, 0);
            }

            #[tokio::test]
            async fn test_search_is_case_insensitive() {
                let service = fixture_service().await;
                let page = service.list(&params("search=RAO")).await.unwrap();
                assert_eq!(names(&page), vec!["Asha Rao"]);
            }

            #[tokio::test]
            async fn test_search_matches_phone() {
                let service = fixture_service().await;
                let page = service.list(&params("search=0000029")).await.unwrap();
                assert_eq!(names(&page), vec!["Customer 29"]);
            }

            #[tokio::test]
            async fn test_search_treats_metacharacters_literally() {
                let service = fixture_service().await;

                let page = service.list(&params("search=(vip)")).await.unwrap();
                assert_eq!(names(&page), vec!["Priya (VIP)"]);

                let page = service.list(&params("search=a%2BS")).await.unwrap();
                assert_eq!(names(&page), vec!["Neha+Sharma"]);

                let page = service.list(&params("search=.*")).await.unwrap();
                assert!(page.data.is_empty());
            }

            #[tokio::test]
            async fn test_tags_match_any() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("tags=new,organic&limit=100"))
                    .await
                    .unwrap();

                assert_eq!(page.meta.total, 12);
                assert!(page.data.iter().all(|t| t
                    .product
                    .tags
                    .iter()
                    .any(|tag| tag == "new" || tag == "organic")));
            }

            #[tokio::test]
            async fn test_dimensions_combine_with_and() {
                let service = fixture_service().await;
                let page = service
                    .list(&params(
                        "region=North&gender=Female&category=Clothing&paymentMethod=UPI&limit=100",
                    ))
                    .await
                    .unwrap();

                let expected = fixture_records()
                    .iter()
                    .filter(|t| {
                        t.customer.region == "North"
                            && t.customer.gender == "Female"
                            && t.product.category == "Clothing"
                            && t.meta.payment_method == "UPI"
                    })
                    .count();
                assert!(expected > 0);
                assert_eq!(page.meta.total, expected as u64);
            }

            // ==================================================================
            // Sorting and paging
            // ==================================================================

            #[tokio::test]
            async fn test_second_page_of_twenty_five() {
                let service = seeded(numbered_records(25)).await;
                let page = service.list(&params("page=2&limit=10")).await.unwrap();

                assert_eq!(page.meta.total, 25);
                assert_eq!(page.meta.total_pages, 3);
                assert_eq!(page.meta.page, 2);
                let expected: Vec<String> =
                    (5..=14).rev().map(|i| format!("Record {:02}", i)).collect();
                assert_eq!(names(&page), expected);
            }

            #[tokio::test]
            async fn test_page_past_end_is_empty() {
                let service = seeded(numbered_records(25)).await;
                let page = service.list(&params("page=9&limit=10")).await.unwrap();
                assert!(page.data.is_empty());
                assert_eq!(page.meta.total, 25);
                assert_eq!(page.meta.page, 9);
            }

            #[tokio::test]
            async fn test_unknown_sort_key_falls_back_to_date() {
                let service = fixture_service().await;
                let bogus = service.list(&params("sortBy=bogus&limit=100")).await.unwrap();
                let date = service.list(&params("sortBy=date&limit=100")).await.unwrap();
                assert_eq!(bogus, date);
            }

            #[tokio::test]
            async fn test_unknown_order_is_desc() {
                let service = fixture_service().await;
                let sideways = service
                    .list(&params("sortBy=quantity&order=sideways&limit=100"))
                    .await
                    .unwrap();
                let desc = service
                    .list(&params("sortBy=quantity&order=desc&limit=100"))
                    .await
                    .unwrap();
                assert_eq!(sideways, desc);
            }

            #[tokio::test]
            async fn test_sort_by_quantity_breaks_ties_on_id() {
                let service = fixture_service().await;
                let page = service
                    .list(&params("sortBy=quantity&order=asc&limit=100"))
                    .await
                    .unwrap();

                assert!(page.data.windows(2).all(|w| {
                    let (a, b) = (&w[0], &w[1]);
                    a.sales.quantity < b.sales.quantity
                        || (a.sales.quantity == b.sales.quantity && a.id < b.id)
                }));
            }

            #[tokio::test]
            async fn test_sort_by_name() {
                let service = fixture_service().await;
                let asc = service
                    .list(&params("sortBy=name&order=asc&limit=3"))
                    .await
                    .unwrap();
                assert_eq!(names(&asc), vec!["Asha Rao", "Customer 04", "Customer 05"]);

                let desc = service.list(&params("sortBy=name&limit=2")).await.unwrap();
                assert_eq!(names(&desc), vec!["Rahul Verma", "Priya (VIP)"]);
            }

            #[tokio::test]
            async fn test_reads_are_repeatable() {
                let service = fixture_service().await;
                let query = params("region=East&sortBy=quantity&page=2&limit=3");
                let first = service.list(&query).await.unwrap();
                let second = service.list(&query).await.unwrap();
                assert_eq!(first, second);
            }

            // ==================================================================
            // Store primitives
            // ==================================================================

            #[tokio::test]
            async fn test_clear_empties_store() {
                let store: Arc<dyn TransactionStore> = Arc::new($factory);
                store.insert_many(numbered_records(3)).await.unwrap();
                assert_eq!(store.count(&Predicate::match_all()).await.unwrap(), 3);

                store.clear().await.unwrap();
                assert_eq!(store.count(&Predicate::match_all()).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_insert_nothing() {
                let store: Arc<dyn TransactionStore> = Arc::new($factory);
                assert_eq!(store.insert_many(Vec::new()).await.unwrap(), 0);
            }

            // ==================================================================
            // Facets and concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_facets_are_sorted_distinct_values() {
                let service = fixture_service().await;
                let facets = service.facets().await.unwrap();

                assert_eq!(facets.regions, vec!["East", "North", "South", "West"]);
                assert_eq!(facets.categories, vec!["Beauty", "Clothing", "Electronics"]);
                assert_eq!(facets.payment_methods, vec!["Cash", "Credit Card", "UPI"]);
                assert_eq!(facets.tags, vec!["new", "organic", "sale"]);
            }

            #[tokio::test]
            async fn test_facets_of_empty_store() {
                let service = seeded(Vec::new()).await;
                let facets = service.facets().await.unwrap();
                assert!(facets.regions.is_empty());
                assert!(facets.tags.is_empty());
            }

            #[tokio::test]
            async fn test_facets_are_stable() {
                let service = fixture_service().await;
                let first = service.facets().await.unwrap();
                let second = service.facets().await.unwrap();
                assert_eq!(first, second);
            }

            #[tokio::test]
            async fn test_concurrent_lists_do_not_leak() {
                let service = Arc::new(fixture_service().await);

                let mut handles = Vec::new();
                for region in REGIONS {
                    for _ in 0..5 {
                        let service = service.clone();
                        handles.push(tokio::spawn(async move {
                            let query = params(&format!("region={}&limit=100", region));
                            let page = service.list(&query).await.unwrap();
                            (region, page)
                        }));
                    }
                }

                for handle in handles {
                    let (region, page) = handle.await.unwrap();
                    assert!(!page.data.is_empty());
                    assert!(
                        page.data.iter().all(|t| t.customer.region == region),
                        "results for {} contain another region",
                        region
                    );
                }
            }
        }
    };
}
