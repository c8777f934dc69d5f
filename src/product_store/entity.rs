use crate::domain::{parse_price, Product, ProductDraft};
use crate::store_framework::{InsertOrder, StoreEntity, StoreError};

impl StoreEntity for Product {
    type Id = String;
    type Draft = ProductDraft;

    const STORAGE_KEY: &'static str = "products";
    // The catalog lists oldest listings first.
    const INSERT_ORDER: InsertOrder = InsertOrder::Append;

    fn id(&self) -> &String {
        &self.id
    }

    fn from_draft(draft: ProductDraft) -> Result<Self, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::Validation(
                "product name is required".to_string(),
            ));
        }
        if draft.description.trim().is_empty() {
            return Err(StoreError::Validation(
                "product description is required".to_string(),
            ));
        }
        let price = parse_price(&draft.price).map_err(StoreError::Validation)?;
        Ok(Self {
            id: draft.id,
            name: draft.name,
            description: draft.description,
            price,
        })
    }
}
