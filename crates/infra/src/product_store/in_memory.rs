use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use catalog_core::ProductId;
use catalog_products::{NewProduct, Product};

use super::r#trait::{ProductStore, StoreError};

#[derive(Debug)]
struct State {
    next_id: i64,
    products: BTreeMap<ProductId, Product>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_id: 1,
            products: BTreeMap::new(),
        }
    }
}

/// In-memory product store.
///
/// Intended for tests/dev. Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    state: RwLock<State>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|s| s.products.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.products.values().cloned().collect())
    }

    async fn find_by_sku(&self, sku: &str) -> Result<Option<Product>, StoreError> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.products.values().find(|p| p.sku() == sku).cloned())
    }

    async fn insert(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        if state.products.values().any(|p| p.sku() == product.sku()) {
            return Err(StoreError::DuplicateSku(product.sku().to_string()));
        }

        let id = ProductId::new(state.next_id);
        state.next_id += 1;

        let stored = product.into_stored(id);
        state.products.insert(id, stored.clone());
        Ok(stored)
    }

    async fn delete_many(&self, ids: &[ProductId]) -> Result<Vec<ProductId>, StoreError> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let mut removed: Vec<ProductId> = ids
            .iter()
            .filter(|id| state.products.remove(*id).is_some())
            .copied()
            .collect();
        removed.sort();
        removed.dedup();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::Entity;
    use catalog_products::ProductVariant;
    use serde_json::json;

    fn dvd(sku: &str) -> NewProduct {
        let fields = json!({ "size": 700 });
        NewProduct::create(sku, "Movie", 9.99, ProductVariant::Dvd, fields.as_object().unwrap())
            .unwrap()
    }

    #[tokio::test]
    async fn assigns_increasing_ids() {
        let store = InMemoryProductStore::new();
        let a = store.insert(dvd("A")).await.unwrap();
        let b = store.insert(dvd("B")).await.unwrap();
        assert_eq!(a.id(), ProductId::new(1));
        assert_eq!(b.id(), ProductId::new(2));
    }

    #[tokio::test]
    async fn rejects_duplicate_sku_case_sensitively() {
        let store = InMemoryProductStore::new();
        store.insert(dvd("D1")).await.unwrap();
        assert!(matches!(
            store.insert(dvd("D1")).await,
            Err(StoreError::DuplicateSku(sku)) if sku == "D1"
        ));
        assert!(store.insert(dvd("d1")).await.is_ok());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() {
        let store = InMemoryProductStore::new();
        for sku in ["C", "A", "B"] {
            store.insert(dvd(sku)).await.unwrap();
        }
        let ids: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec![ProductId::new(1), ProductId::new(2), ProductId::new(3)]);
    }

    #[tokio::test]
    async fn delete_many_reports_only_removed_ids() {
        let store = InMemoryProductStore::new();
        let a = store.insert(dvd("A")).await.unwrap();
        let b = store.insert(dvd("B")).await.unwrap();

        let removed = store
            .delete_many(&[b.id(), ProductId::new(99), b.id()])
            .await
            .unwrap();
        assert_eq!(removed, vec![b.id()]);

        let remaining: Vec<_> = store.list().await.unwrap().iter().map(|p| p.id()).collect();
        assert_eq!(remaining, vec![a.id()]);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = InMemoryProductStore::new();
        let a = store.insert(dvd("A")).await.unwrap();
        store.delete_many(&[a.id()]).await.unwrap();
        let b = store.insert(dvd("A")).await.unwrap();
        assert_eq!(b.id(), ProductId::new(2));
    }

    #[tokio::test]
    async fn find_by_sku_is_exact() {
        let store = InMemoryProductStore::new();
        store.insert(dvd("SKU-1")).await.unwrap();
        assert!(store.find_by_sku("SKU-1").await.unwrap().is_some());
        assert!(store.find_by_sku("SKU").await.unwrap().is_none());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(u8),
            Delete(Vec<i64>),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0u8..8).prop_map(Op::Insert),
                prop::collection::vec(0i64..12, 0..4).prop_map(Op::Delete),
            ]
        }

        proptest! {
            #[test]
            fn listing_stays_ordered_and_skus_unique(ops in prop::collection::vec(op(), 0..40)) {
                let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
                rt.block_on(async {
                    let store = InMemoryProductStore::new();
                    for op in ops {
                        match op {
                            Op::Insert(n) => {
                                let _ = store.insert(dvd(&format!("S{n}"))).await;
                            }
                            Op::Delete(ids) => {
                                let ids: Vec<_> = ids.into_iter().map(ProductId::new).collect();
                                let removed = store.delete_many(&ids).await.unwrap();
                                prop_assert!(removed.iter().all(|id| ids.contains(id)));
                            }
                        }

                        let listed = store.list().await.unwrap();
                        prop_assert!(listed.windows(2).all(|w| w[0].id() < w[1].id()));
                        let mut skus: Vec<_> = listed.iter().map(|p| p.sku().to_string()).collect();
                        skus.sort();
                        skus.dedup();
                        prop_assert_eq!(skus.len(), listed.len());
                    }
                    Ok(())
                })?;
            }
        }
    }
}
