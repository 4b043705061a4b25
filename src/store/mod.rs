//! Product state reconciling the remote catalog with the local slot.
//!
//! The store is the only mutation surface consumers may depend on: it owns
//! the reconciled product list, the loading/error status, and the in-memory
//! image of the local persistence slot. Mutations edit that image and then
//! run one uniform persist step, so no operation ever performs its own
//! read-modify-write cycle against storage.

use chrono::Utc;

use crate::client::{CatalogApi, FetchError};
use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::domain::types::ProductId;
use crate::pagination::{Paginated, Pagination};
use crate::repository::{LocalProductReader, LocalProductWriter, PersistenceError};

/// User-facing message surfaced when the catalog cannot be loaded.
const FETCH_ERROR_MESSAGE: &str = "Failed to load products";

/// Filter over the like flag applied when listing products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductFilter {
    #[default]
    All,
    Liked,
}

/// Query parameters used when listing or searching the reconciled products.
#[derive(Debug, Clone, Default)]
pub struct ProductListQuery {
    /// Restrict to liked products.
    pub filter: ProductFilter,
    /// Case-insensitive substring search over title, description and price.
    pub search: Option<String>,
    /// Pagination parameters.
    pub pagination: Option<Pagination>,
}

impl ProductListQuery {
    pub fn liked(mut self) -> Self {
        self.filter = ProductFilter::Liked;
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }

    fn matches(&self, product: &Product) -> bool {
        if self.filter == ProductFilter::Liked && !product.is_liked {
            return false;
        }

        match &self.search {
            Some(search) if !search.trim().is_empty() => {
                let needle = search.trim().to_lowercase();
                product.title.as_str().to_lowercase().contains(&needle)
                    || product.description.to_lowercase().contains(&needle)
                    || product.price.get().to_string().contains(&needle)
            }
            _ => true,
        }
    }
}

/// State container reconciling remote catalog data with locally persisted
/// records.
///
/// Owned by the application root; generic over the catalog and persistence
/// seams so the reconciliation logic is testable without a network or a
/// filesystem.
pub struct ProductStore<C, R> {
    client: C,
    repo: R,
    products: Vec<Product>,
    /// In-memory image of the persistence slot. Holds locally created
    /// products plus local state retained for remote ids.
    local: Vec<Product>,
    is_loading: bool,
    error: Option<String>,
}

impl<C, R> ProductStore<C, R>
where
    C: CatalogApi,
    R: LocalProductReader + LocalProductWriter,
{
    /// Creates a store; the local slot is read up front.
    pub fn new(client: C, repo: R) -> Self {
        let local = repo.load_products();
        Self {
            client,
            repo,
            products: Vec::new(),
            local,
            is_loading: false,
            error: None,
        }
    }

    /// Reconciled products in presentation order: overlaid remote records
    /// first, purely local records after.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// User-facing message of the last failed fetch, cleared by the next one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches the remote catalog and reconciles it with the local slot.
    ///
    /// On failure the previous product list is left untouched and the error
    /// is surfaced through [`Self::error`]. Fetches are never retried
    /// automatically.
    pub async fn fetch_products(&mut self) {
        self.is_loading = true;
        self.error = None;

        match self.client.list_products().await {
            Ok(remote) => {
                self.local = self.repo.load_products();
                self.products = reconcile(remote, &self.local);
                self.is_loading = false;
            }
            Err(e) => {
                log::error!("Failed to fetch products: {e}");
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
                self.is_loading = false;
            }
        }
    }

    /// Fetches a single product, overlaying the like flag currently held in
    /// memory. Does not mutate store state.
    pub async fn load_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let mut product = self.client.get_product(id).await?;
        if let Some(existing) = self.products.iter().find(|p| p.id == *id) {
            product.is_liked = existing.is_liked;
        }
        Ok(product)
    }

    /// Creates a product, appends it to the reconciled list and persists it.
    pub fn add_product(&mut self, new: NewProduct) -> Result<Product, PersistenceError> {
        let product = Product::new_local(new, Utc::now());
        self.products.push(product.clone());
        self.local.push(product.clone());
        self.persist()?;
        Ok(product)
    }

    /// Removes a product from the reconciled list and the local slot.
    ///
    /// Unknown ids are a no-op reported as `Ok(None)`.
    pub fn remove_product(&mut self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
        let removed = self
            .products
            .iter()
            .position(|p| p.id == *id)
            .map(|index| self.products.remove(index));
        self.local.retain(|p| p.id != *id);
        self.persist()?;
        Ok(removed)
    }

    /// Flips the like flag on the matching record.
    ///
    /// The flip reaches the persistence slot only when the id already has a
    /// local record; a like on a remote-sourced product with no local
    /// counterpart lives in memory alone and will not survive the next fetch.
    pub fn toggle_like(&mut self, id: &ProductId) -> Result<Option<Product>, PersistenceError> {
        let toggled = self.products.iter_mut().find(|p| p.id == *id).map(|p| {
            p.is_liked = !p.is_liked;
            p.clone()
        });
        if let Some(local) = self.local.iter_mut().find(|p| p.id == *id) {
            local.is_liked = !local.is_liked;
        }
        self.persist()?;
        Ok(toggled)
    }

    /// Merges the patch into the matching record, under the same
    /// local-presence caveat as [`Self::toggle_like`].
    pub fn update_product(
        &mut self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Option<Product>, PersistenceError> {
        let updated = self.products.iter_mut().find(|p| p.id == *id).map(|p| {
            p.apply(&patch);
            p.clone()
        });
        if let Some(local) = self.local.iter_mut().find(|p| p.id == *id) {
            local.apply(&patch);
        }
        self.persist()?;
        Ok(updated)
    }

    /// Filters, searches and paginates the reconciled list.
    pub fn list_products(&self, query: &ProductListQuery) -> Paginated<Product> {
        let filtered: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| query.matches(p))
            .collect();

        match query.pagination {
            Some(Pagination { page, per_page }) => {
                let page = page.max(1);
                let per_page = per_page.max(1);
                let total_pages = filtered.len().div_ceil(per_page);
                let items = filtered
                    .into_iter()
                    .skip((page - 1) * per_page)
                    .take(per_page)
                    .cloned()
                    .collect();
                Paginated::new(items, page, total_pages)
            }
            None => Paginated::new(filtered.into_iter().cloned().collect(), 1, 1),
        }
    }

    /// Uniform persist step run after every mutation: the in-memory image of
    /// the local slot is written back as a whole.
    fn persist(&self) -> Result<(), PersistenceError> {
        self.repo.save_products(&self.local)
    }
}

/// Merges a freshly fetched remote list with the locally persisted one.
///
/// Remote records take any retained local state for the same id; local
/// records with no remote counterpart are appended untouched after the
/// remote block. Nothing is sorted and nothing is de-duplicated beyond id
/// matching.
fn reconcile(remote: Vec<Product>, local: &[Product]) -> Vec<Product> {
    let mut reconciled: Vec<Product> = remote
        .into_iter()
        .map(|product| match local.iter().find(|l| l.id == product.id) {
            Some(counterpart) => product.overlaid_with(counterpart),
            None => product,
        })
        .collect();

    let purely_local: Vec<Product> = local
        .iter()
        .filter(|l| !reconciled.iter().any(|p| p.id == l.id))
        .cloned()
        .collect();
    reconciled.extend(purely_local);

    reconciled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::DateTime;

    use super::*;
    use crate::client::test::TestCatalog;
    use crate::domain::types::{ImageUrl, ProductPrice, ProductTitle};
    use crate::repository::test::TestRepository;

    fn sample_product(id: &str, title: &str, price: f64) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            title: ProductTitle::new(title).unwrap(),
            description: format!("Description of {title}"),
            price: ProductPrice::new(price).unwrap(),
            image: ImageUrl::new("https://example.com/img/1.jpg").unwrap(),
            is_liked: false,
            created_at: DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    fn sample_new_product(title: &str, price: f64) -> NewProduct {
        NewProduct {
            title: ProductTitle::new(title).unwrap(),
            description: format!("Description of {title}"),
            price: ProductPrice::new(price).unwrap(),
            image: ImageUrl::new("https://example.com/img/1.jpg").unwrap(),
        }
    }

    fn liked(mut product: Product) -> Product {
        product.is_liked = true;
        product
    }

    #[tokio::test]
    async fn fetch_reconciles_remote_and_local_records() {
        let remote = vec![sample_product("1", "A", 10.0)];
        let local = vec![
            liked(sample_product("1", "A", 10.0)),
            sample_product("local1", "B", 5.0),
        ];
        let mut store = ProductStore::new(TestCatalog::new(remote), TestRepository::new(local));

        store.fetch_products().await;

        let products = store.products();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "1");
        assert!(products[0].is_liked);
        assert_eq!(products[1].id, "local1");
        assert_eq!(products[1].title, "B");
        assert_eq!(products[1].price, 5.0);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn reconciled_ids_are_unique() {
        let remote = vec![
            sample_product("1", "A", 10.0),
            sample_product("2", "B", 20.0),
        ];
        let local = vec![
            liked(sample_product("2", "B", 20.0)),
            sample_product("local1", "C", 5.0),
        ];
        let mut store = ProductStore::new(TestCatalog::new(remote), TestRepository::new(local));

        store.fetch_products().await;

        let ids: HashSet<&str> = store.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), store.products().len());
    }

    #[tokio::test]
    async fn purely_local_records_survive_reconciliation_unchanged() {
        let local = vec![liked(sample_product("local1", "B", 5.0))];
        let mut store = ProductStore::new(
            TestCatalog::new(vec![sample_product("1", "A", 10.0)]),
            TestRepository::new(local.clone()),
        );

        store.fetch_products().await;

        assert_eq!(store.products()[1], local[0]);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_products() {
        let remote = vec![
            sample_product("1", "A", 10.0),
            sample_product("2", "B", 20.0),
        ];
        let mut store = ProductStore::new(
            TestCatalog::ok_then_failing(remote),
            TestRepository::default(),
        );

        store.fetch_products().await;
        assert_eq!(store.products().len(), 2);

        store.fetch_products().await;

        assert_eq!(store.products().len(), 2);
        assert_eq!(store.error(), Some("Failed to load products"));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn fetch_clears_a_previous_error_on_success() {
        let mut store = ProductStore::new(
            TestCatalog::failing_then_ok(vec![sample_product("1", "A", 10.0)]),
            TestRepository::default(),
        );

        store.fetch_products().await;
        assert!(store.error().is_some());

        store.fetch_products().await;

        assert!(store.error().is_none());
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn added_products_appear_exactly_once_after_refetch() {
        let remote = vec![sample_product("1", "A", 10.0)];
        let mut store = ProductStore::new(TestCatalog::new(remote), TestRepository::default());

        store.fetch_products().await;
        let created = store
            .add_product(sample_new_product("Handmade mug", 15.0))
            .unwrap();
        store.fetch_products().await;

        let matches: Vec<&Product> = store
            .products()
            .iter()
            .filter(|p| p.id == created.id)
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Handmade mug");
    }

    #[tokio::test]
    async fn removed_products_disappear_from_memory_and_slot() {
        let repo = TestRepository::new(vec![sample_product("local1", "B", 5.0)]);
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), repo);

        store.fetch_products().await;
        let id = ProductId::new("local1").unwrap();
        let removed = store.remove_product(&id).unwrap();

        assert_eq!(removed.unwrap().id, "local1");
        assert!(store.products().iter().all(|p| p.id != id));

        store.fetch_products().await;
        assert!(store.products().is_empty());
    }

    #[tokio::test]
    async fn toggling_twice_restores_the_original_flag() {
        let repo = TestRepository::new(vec![sample_product("local1", "B", 5.0)]);
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), repo);
        store.fetch_products().await;
        let id = ProductId::new("local1").unwrap();

        let once = store.toggle_like(&id).unwrap().unwrap();
        assert!(once.is_liked);

        let twice = store.toggle_like(&id).unwrap().unwrap();
        assert!(!twice.is_liked);
    }

    #[tokio::test]
    async fn likes_on_local_records_survive_a_refetch() {
        let repo = TestRepository::new(vec![sample_product("local1", "B", 5.0)]);
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), repo);
        store.fetch_products().await;

        store
            .toggle_like(&ProductId::new("local1").unwrap())
            .unwrap();
        store.fetch_products().await;

        assert!(store.products()[0].is_liked);
    }

    #[tokio::test]
    async fn likes_on_remote_only_records_do_not_survive_a_refetch() {
        let remote = vec![sample_product("1", "A", 10.0)];
        let mut store = ProductStore::new(TestCatalog::new(remote), TestRepository::default());
        store.fetch_products().await;

        let toggled = store
            .toggle_like(&ProductId::new("1").unwrap())
            .unwrap()
            .unwrap();
        assert!(toggled.is_liked);

        store.fetch_products().await;

        assert!(!store.products()[0].is_liked);
    }

    #[tokio::test]
    async fn updates_merge_partial_fields() {
        let repo = TestRepository::new(vec![sample_product("local1", "B", 5.0)]);
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), repo);
        store.fetch_products().await;
        let id = ProductId::new("local1").unwrap();

        let updated = store
            .update_product(
                &id,
                ProductPatch {
                    price: Some(ProductPrice::new(7.5).unwrap()),
                    ..ProductPatch::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 7.5);
        assert_eq!(updated.title, "B");

        store.fetch_products().await;
        assert_eq!(store.products()[0].price, 7.5);
    }

    #[tokio::test]
    async fn mutations_against_unknown_ids_are_noops() {
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::default());
        store.fetch_products().await;
        let id = ProductId::new("ghost").unwrap();

        assert!(store.remove_product(&id).unwrap().is_none());
        assert!(store.toggle_like(&id).unwrap().is_none());
        assert!(
            store
                .update_product(&id, ProductPatch::default())
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn failed_saves_surface_but_keep_the_memory_mutation() {
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::failing());
        store.fetch_products().await;

        let result = store.add_product(sample_new_product("Handmade mug", 15.0));

        assert!(result.is_err());
        assert_eq!(store.products().len(), 1);
    }

    #[tokio::test]
    async fn load_product_overlays_the_in_memory_like_flag() {
        let remote = vec![sample_product("1", "A", 10.0)];
        let mut store = ProductStore::new(TestCatalog::new(remote), TestRepository::default());
        store.fetch_products().await;
        let id = ProductId::new("1").unwrap();
        store.toggle_like(&id).unwrap();

        let detail = store.load_product(&id).await.unwrap();

        assert!(detail.is_liked);
    }

    #[tokio::test]
    async fn load_product_propagates_not_found() {
        let store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::default());

        let err = store
            .load_product(&ProductId::new("1").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status(status) if status.as_u16() == 404));
    }

    #[tokio::test]
    async fn list_filters_liked_products() {
        let local = vec![
            liked(sample_product("local1", "B", 5.0)),
            sample_product("local2", "C", 6.0),
        ];
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::new(local));
        store.fetch_products().await;

        let page = store.list_products(&ProductListQuery::default().liked());

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, "local1");
    }

    #[tokio::test]
    async fn list_searches_title_description_and_price() {
        let local = vec![
            sample_product("local1", "Wool scarf", 25.0),
            sample_product("local2", "Ceramic mug", 12.5),
        ];
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::new(local));
        store.fetch_products().await;

        let by_title = store.list_products(&ProductListQuery::default().search("SCARF"));
        assert_eq!(by_title.items.len(), 1);
        assert_eq!(by_title.items[0].id, "local1");

        let by_description = store.list_products(&ProductListQuery::default().search("of ceramic"));
        assert_eq!(by_description.items.len(), 1);
        assert_eq!(by_description.items[0].id, "local2");

        let by_price = store.list_products(&ProductListQuery::default().search("12.5"));
        assert_eq!(by_price.items.len(), 1);
        assert_eq!(by_price.items[0].id, "local2");

        let blank = store.list_products(&ProductListQuery::default().search("   "));
        assert_eq!(blank.items.len(), 2);
    }

    #[tokio::test]
    async fn list_paginates_with_page_clamping() {
        let local: Vec<Product> = (1..=10)
            .map(|i| sample_product(&format!("local{i}"), &format!("P{i}"), i as f64))
            .collect();
        let mut store = ProductStore::new(TestCatalog::new(Vec::new()), TestRepository::new(local));
        store.fetch_products().await;

        let first = store.list_products(&ProductListQuery::default().paginate(0, 8));
        assert_eq!(first.page, 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), 8);
        assert_eq!(first.items[0].id, "local1");

        let second = store.list_products(&ProductListQuery::default().paginate(2, 8));
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.items[0].id, "local9");

        let past_the_end = store.list_products(&ProductListQuery::default().paginate(5, 8));
        assert!(past_the_end.items.is_empty());
    }
}
