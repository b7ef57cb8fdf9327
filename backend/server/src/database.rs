//! # Catalog
//!
//! RAM database.
//!
//! Holds every category and product for the lifetime of the process. Nothing is written to disk,
//! a restart starts over from the seed (or an empty catalog).
//!
//! ## Layout
//!
//! - Categories: ordered list of unique names, insertion order
//! - Products: ordered list of records, newest first (creates push to the front)
//! - Products point at categories by name only, the link is not enforced on write
//!
//! ## Category Deletion
//!
//! - Idempotent, deleting an unknown name is a no-op
//! - Every product filed under the deleted name moves to the fallback category `Drugo`
//! - `Drugo` is (re)created if missing, even if it was the category being deleted
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{FALLBACK_CATEGORY, NewProduct, Product, ProductPatch},
};

const SEED_CATEGORIES: [&str; 4] = ["Cevi", "Ventili", "Pipe", "Armature"];

#[derive(Default, Debug, Clone)]
pub struct Catalog {
    categories: Vec<String>,
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded() -> Self {
        Self {
            categories: SEED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            products: vec![Product {
                id: new_id(),
                name: "PVC Cev 20mm".to_string(),
                description: "Kvalitetna cev za vodovodne inštalacije.".to_string(),
                category: "Cevi".to_string(),
                price: 2.99,
                image: String::new(),
            }],
        }
    }

    pub fn list_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn add_category(&mut self, name: &str) -> Result<String, AppError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(AppError::Validation("Missing category name".to_string()));
        }

        if self.categories.iter().any(|c| c == name) {
            return Err(AppError::Duplicate(format!(
                "Category {name} already exists"
            )));
        }

        self.categories.push(name.to_string());
        info!("Added category {name}");

        Ok(name.to_string())
    }

    pub fn remove_category(&mut self, name: &str) {
        let name = name.trim();
        self.categories.retain(|c| c != name);

        let mut moved = 0;
        for product in self.products.iter_mut().filter(|p| p.category == name) {
            product.category = FALLBACK_CATEGORY.to_string();
            moved += 1;
        }

        if !self.categories.iter().any(|c| c == FALLBACK_CATEGORY) {
            self.categories.push(FALLBACK_CATEGORY.to_string());
        }

        info!("Removed category {name}, moved {moved} products to {FALLBACK_CATEGORY}");
    }

    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    pub fn get_product(&self, id: &str) -> Result<&Product, AppError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))
    }

    pub fn create_product(&mut self, fields: NewProduct) -> Result<Product, AppError> {
        let name = required("name", fields.name)?;
        let description = required("description", fields.description)?;
        let category = required("category", fields.category)?;
        let price = fields
            .price
            .ok_or_else(|| missing("price"))?
            .to_price()?;

        let product = Product {
            id: self.fresh_id(),
            name,
            description,
            category,
            price,
            image: fields.image.unwrap_or_default(),
        };

        self.products.insert(0, product.clone());
        info!("Created product {} ({})", product.id, product.name);

        Ok(product)
    }

    pub fn update_product(&mut self, id: &str, patch: ProductPatch) -> Result<Product, AppError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        let price = patch.price.as_ref().map(|p| p.to_price()).transpose()?;

        if let Some(name) = patch.name {
            product.name = name;
        }
        if let Some(description) = patch.description {
            product.description = description;
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(price) = price {
            product.price = price;
        }
        if let Some(image) = patch.image {
            product.image = image;
        }

        info!("Updated product {id}");

        Ok(product.clone())
    }

    pub fn delete_product(&mut self, id: &str) -> Result<(), AppError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| not_found(id))?;

        let removed = self.products.remove(index);
        info!("Deleted product {} ({})", removed.id, removed.name);

        Ok(())
    }

    fn fresh_id(&self) -> String {
        loop {
            let id = new_id();
            if !self.products.iter().any(|p| p.id == id) {
                return id;
            }
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn required(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(missing(field)),
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!(
        "Missing fields (name, description, category, price): {field}"
    ))
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Product {id} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::{
        error::AppError,
        models::{FALLBACK_CATEGORY, NewProduct, PriceInput, ProductPatch},
    };

    fn new_product(name: &str, category: &str, price: f64) -> NewProduct {
        NewProduct {
            name: Some(name.to_string()),
            description: Some(format!("{name} description")),
            category: Some(category.to_string()),
            price: Some(PriceInput::Number(price)),
            image: None,
        }
    }

    #[test]
    fn test_seeded_catalog() {
        let catalog = Catalog::seeded();

        assert_eq!(
            catalog.list_categories(),
            ["Cevi", "Ventili", "Pipe", "Armature"]
        );
        assert_eq!(catalog.list_products().len(), 1);
        assert_eq!(catalog.list_products()[0].category, "Cevi");
    }

    #[test]
    fn test_add_category() {
        let mut catalog = Catalog::new();

        assert_eq!(catalog.add_category("  Pumpe ").unwrap(), "Pumpe");
        assert_eq!(catalog.list_categories(), ["Pumpe"]);
    }

    #[test]
    fn test_add_category_duplicate() {
        let mut catalog = Catalog::seeded();
        let before = catalog.list_categories().to_vec();

        assert!(matches!(
            catalog.add_category("Cevi"),
            Err(AppError::Duplicate(_))
        ));
        assert_eq!(catalog.list_categories(), before);
    }

    #[test]
    fn test_add_category_empty() {
        let mut catalog = Catalog::new();

        assert!(matches!(
            catalog.add_category("   "),
            Err(AppError::Validation(_))
        ));
        assert!(catalog.list_categories().is_empty());
    }

    #[test]
    fn test_remove_category_reassigns_products() {
        let mut catalog = Catalog::seeded();
        let a = catalog
            .create_product(new_product("Ventil 1", "Ventili", 4.0))
            .unwrap();
        let b = catalog
            .create_product(new_product("Ventil 2", "Ventili", 6.0))
            .unwrap();

        catalog.remove_category("Ventili");

        assert!(!catalog.list_categories().iter().any(|c| c == "Ventili"));
        assert!(catalog.list_categories().iter().any(|c| c == FALLBACK_CATEGORY));
        assert_eq!(catalog.get_product(&a.id).unwrap().category, FALLBACK_CATEGORY);
        assert_eq!(catalog.get_product(&b.id).unwrap().category, FALLBACK_CATEGORY);
        assert_eq!(catalog.list_products().last().unwrap().category, "Cevi");
    }

    #[test]
    fn test_remove_category_is_idempotent() {
        let mut catalog = Catalog::seeded();

        catalog.remove_category("Nope");
        catalog.remove_category("Nope");

        assert_eq!(
            catalog.list_categories(),
            ["Cevi", "Ventili", "Pipe", "Armature", FALLBACK_CATEGORY]
        );
    }

    #[test]
    fn test_remove_category_trims_name() {
        let mut catalog = Catalog::new();
        catalog.add_category(" Cevi").unwrap();
        let pipe = catalog.create_product(new_product("Cev", "Cevi", 1.0)).unwrap();

        catalog.remove_category(" Cevi ");

        assert_eq!(catalog.list_categories(), [FALLBACK_CATEGORY]);
        assert_eq!(catalog.get_product(&pipe.id).unwrap().category, FALLBACK_CATEGORY);
    }

    #[test]
    fn test_remove_fallback_category_recreates_it() {
        let mut catalog = Catalog::new();
        catalog.add_category(FALLBACK_CATEGORY).unwrap();
        catalog.add_category("Pipe").unwrap();

        catalog.remove_category(FALLBACK_CATEGORY);

        assert_eq!(catalog.list_categories(), ["Pipe", FALLBACK_CATEGORY]);
    }

    #[test]
    fn test_create_product_newest_first() {
        let mut catalog = Catalog::new();
        let first = catalog.create_product(new_product("A", "Cevi", 1.0)).unwrap();
        let second = catalog.create_product(new_product("B", "Cevi", 2.0)).unwrap();

        let ids: Vec<_> = catalog.list_products().iter().map(|p| &p.id).collect();
        assert_eq!(ids, [&second.id, &first.id]);
        assert_ne!(first.id, second.id);
        assert_eq!(first.image, "");
    }

    #[test]
    fn test_create_product_missing_fields() {
        let mut catalog = Catalog::seeded();

        for strip in 0..4 {
            let mut fields = new_product("X", "Cevi", 1.0);
            match strip {
                0 => fields.name = None,
                1 => fields.description = Some(String::new()),
                2 => fields.category = None,
                _ => fields.price = None,
            }

            assert!(matches!(
                catalog.create_product(fields),
                Err(AppError::Validation(_))
            ));
        }

        assert_eq!(catalog.list_products().len(), 1);
    }

    #[test]
    fn test_create_product_coerces_text_price() {
        let mut catalog = Catalog::new();
        let mut fields = new_product("A", "Cevi", 0.0);
        fields.price = Some(PriceInput::Text("3.25".into()));

        assert_eq!(catalog.create_product(fields).unwrap().price, 3.25);
    }

    #[test]
    fn test_update_product_partial() {
        let mut catalog = Catalog::new();
        let mut fields = new_product("Pipa", "Pipe", 1.0);
        fields.image = Some("http://img/1.png".into());
        let created = catalog.create_product(fields).unwrap();

        let updated = catalog
            .update_product(
                &created.id,
                ProductPatch {
                    price: Some(PriceInput::Number(5.5)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price, 5.5);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.image, created.image);
        assert_eq!(updated.id, created.id);
        assert_eq!(catalog.get_product(&created.id).unwrap(), &updated);
    }

    #[test]
    fn test_update_product_invalid_price_leaves_record() {
        let mut catalog = Catalog::new();
        let created = catalog.create_product(new_product("A", "Cevi", 1.0)).unwrap();

        let result = catalog.update_product(
            &created.id,
            ProductPatch {
                name: Some("B".into()),
                price: Some(PriceInput::Text("cheap".into())),
                ..Default::default()
            },
        );

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(catalog.get_product(&created.id).unwrap(), &created);
    }

    #[test]
    fn test_update_product_not_found() {
        let mut catalog = Catalog::seeded();

        assert!(matches!(
            catalog.update_product("missing", ProductPatch::default()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_update_missing_product_with_invalid_price() {
        let mut catalog = Catalog::seeded();

        assert!(matches!(
            catalog.update_product(
                "missing",
                ProductPatch {
                    price: Some(PriceInput::Text("abc".into())),
                    ..Default::default()
                },
            ),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_product() {
        let mut catalog = Catalog::seeded();
        let created = catalog.create_product(new_product("A", "Cevi", 1.0)).unwrap();

        catalog.delete_product(&created.id).unwrap();

        assert!(matches!(
            catalog.get_product(&created.id),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(catalog.list_products().len(), 1);
    }

    #[test]
    fn test_delete_product_not_found() {
        let mut catalog = Catalog::seeded();
        let before = catalog.list_products().to_vec();

        assert!(matches!(
            catalog.delete_product("missing"),
            Err(AppError::NotFound(_))
        ));
        assert_eq!(catalog.list_products(), before);
    }
}
