//! Part Repository

use std::collections::HashMap;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Category, Part, PartCreate, PartFull, PartUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "part";

#[derive(Clone)]
pub struct PartRepository {
    base: BaseRepository,
}

impl PartRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all parts ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Part>> {
        let parts: Vec<Part> = self
            .base
            .db()
            .query("SELECT * FROM part ORDER BY name")
            .await?
            .take(0)?;
        Ok(parts)
    }

    /// Find all parts with category resolved
    pub async fn find_all_full(&self) -> RepoResult<Vec<PartFull>> {
        let parts = self.find_all().await?;
        self.resolve_categories(parts).await
    }

    /// Find part by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Part>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let part: Option<Part> = self.base.db().select(thing).await?;
        Ok(part)
    }

    /// Find part by id with category resolved
    pub async fn find_by_id_full(&self, id: &str) -> RepoResult<Option<PartFull>> {
        let Some(part) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut resolved = self.resolve_categories(vec![part]).await?;
        Ok(resolved.pop())
    }

    /// Find part by part_number
    pub async fn find_by_part_number(&self, part_number: &str) -> RepoResult<Option<Part>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM part WHERE part_number = $part_number LIMIT 1")
            .bind(("part_number", part_number.to_string()))
            .await?;
        let parts: Vec<Part> = result.take(0)?;
        Ok(parts.into_iter().next())
    }

    /// Substring search over name, description and part_number
    pub async fn search(&self, query: &str) -> RepoResult<Vec<PartFull>> {
        let needle = query.to_lowercase();
        let parts: Vec<Part> = self
            .base
            .db()
            .query(
                "SELECT * FROM part WHERE \
                 string::contains(string::lowercase(name), $q) \
                 OR string::contains(string::lowercase(part_number), $q) \
                 OR (description != NONE AND string::contains(string::lowercase(description), $q)) \
                 ORDER BY name",
            )
            .bind(("q", needle))
            .await?
            .take(0)?;
        self.resolve_categories(parts).await
    }

    /// Parts at or below their low-stock threshold
    pub async fn find_low_stock(&self) -> RepoResult<Vec<PartFull>> {
        let parts: Vec<Part> = self
            .base
            .db()
            .query("SELECT * FROM part WHERE quantity <= min_quantity ORDER BY quantity")
            .await?
            .take(0)?;
        self.resolve_categories(parts).await
    }

    /// Create a new part
    pub async fn create(&self, data: PartCreate) -> RepoResult<Part> {
        let category: RecordId = data
            .category
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid category ID: {}", data.category)))?;

        // Category must exist
        let cat: Option<Category> = self.base.db().select(category.clone()).await?;
        if cat.is_none() {
            return Err(RepoError::NotFound(format!(
                "Category {} not found",
                data.category
            )));
        }

        // Check duplicate part_number
        if self.find_by_part_number(&data.part_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Part number '{}' already exists",
                data.part_number
            )));
        }

        let now = now_millis();
        let part = Part {
            id: None,
            name: data.name,
            description: data.description,
            category,
            price: data.price,
            quantity: data.quantity,
            min_quantity: data.min_quantity.unwrap_or(5),
            manufacturer: data.manufacturer,
            part_number: data.part_number,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Part> = self.base.db().create(TABLE).content(part).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create part".to_string()))
    }

    /// Update a part
    pub async fn update(&self, id: &str, data: PartUpdate) -> RepoResult<Part> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Part {} not found", id)))?;

        if let Some(price) = data.price
            && price < 0.0
        {
            return Err(RepoError::Validation("price must be non-negative".into()));
        }
        if let Some(quantity) = data.quantity
            && quantity < 0
        {
            return Err(RepoError::Validation(
                "quantity must be non-negative".into(),
            ));
        }

        // Check duplicate part_number if changing
        if let Some(ref new_number) = data.part_number
            && new_number != &existing.part_number
            && self.find_by_part_number(new_number).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Part number '{}' already exists",
                new_number
            )));
        }

        // 手动合并，避免 category 链接被序列化为字符串
        let category = match data.category {
            Some(ref c) => c
                .parse()
                .map_err(|_| RepoError::Validation(format!("Invalid category ID: {}", c)))?,
            None => existing.category,
        };

        // id 留空：带字符串 id 的 content 会被目标记录更新拒绝
        let updated = Part {
            id: None,
            name: data.name.unwrap_or(existing.name),
            description: data.description.or(existing.description),
            category,
            price: data.price.unwrap_or(existing.price),
            quantity: data.quantity.unwrap_or(existing.quantity),
            min_quantity: data.min_quantity.unwrap_or(existing.min_quantity),
            manufacturer: data.manufacturer.or(existing.manufacturer),
            part_number: data.part_number.unwrap_or(existing.part_number),
            is_active: data.is_active.unwrap_or(existing.is_active),
            created_at: existing.created_at,
            updated_at: now_millis(),
        };

        let result: Option<Part> = self.base.db().update(thing).content(updated).await?;
        result.ok_or_else(|| RepoError::NotFound(format!("Part {} not found", id)))
    }

    /// Adjust stock by a delta (negative = consume)
    pub async fn adjust_quantity(&self, id: &RecordId, delta: i64) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $thing SET quantity += $delta, updated_at = $now")
            .bind(("thing", id.clone()))
            .bind(("delta", delta))
            .bind(("now", now_millis()))
            .await?;
        Ok(())
    }

    /// Hard delete a part
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if self.find_by_id(id).await?.is_none() {
            return Err(RepoError::NotFound(format!("Part {} not found", id)));
        }
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Join categories in one pass (one query, in-memory lookup)
    async fn resolve_categories(&self, parts: Vec<Part>) -> RepoResult<Vec<PartFull>> {
        let categories: Vec<Category> = self
            .base
            .db()
            .query("SELECT * FROM category")
            .await?
            .take(0)?;

        let by_id: HashMap<String, Category> = categories
            .into_iter()
            .filter_map(|c| c.id.as_ref().map(|id| (id.to_string(), c.clone())))
            .collect();

        Ok(parts
            .into_iter()
            .map(|p| {
                let category = by_id.get(&p.category.to_string()).cloned();
                PartFull::from_part(p, category)
            })
            .collect())
    }
}
